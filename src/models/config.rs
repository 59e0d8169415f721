//! Scheduling configuration.
//!
//! The plain in-memory input to every scheduling operation. Loaded and
//! saved by the surrounding application (camelCase JSON); read-only
//! while an operation runs.

use serde::{Deserialize, Serialize};

use super::{Break, ClassGroup, Constraint, Specialist, TimePeriod, WeekTemplate};

/// Default period length (minutes).
pub const DEFAULT_PERIOD_LENGTH_MINUTES: u32 = 30;

fn default_period_length() -> u32 {
    DEFAULT_PERIOD_LENGTH_MINUTES
}

/// Complete scheduler input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingConfig {
    /// Weekly period grid.
    #[serde(default)]
    pub periods: Vec<TimePeriod>,
    /// Day-independent break windows.
    #[serde(default)]
    pub breaks: Vec<Break>,
    /// Specialist subjects.
    #[serde(default)]
    pub specialists: Vec<Specialist>,
    /// Classes to schedule.
    #[serde(default)]
    pub classes: Vec<ClassGroup>,
    /// Year-level time-window policies.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Length of one period (minutes).
    #[serde(default = "default_period_length")]
    pub period_length_minutes: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulingConfig {
    /// Creates an empty configuration with 30-minute periods.
    pub fn new() -> Self {
        Self {
            periods: Vec::new(),
            breaks: Vec::new(),
            specialists: Vec::new(),
            classes: Vec::new(),
            constraints: Vec::new(),
            period_length_minutes: DEFAULT_PERIOD_LENGTH_MINUTES,
        }
    }

    /// Creates a configuration with the template's period grid.
    pub fn from_template(template: &WeekTemplate) -> Self {
        Self {
            periods: template.periods(),
            period_length_minutes: template.period_length_minutes,
            ..Self::new()
        }
    }

    /// Adds a period.
    pub fn with_period(mut self, period: TimePeriod) -> Self {
        self.periods.push(period);
        self
    }

    /// Adds a break.
    pub fn with_break(mut self, brk: Break) -> Self {
        self.breaks.push(brk);
        self
    }

    /// Adds a specialist.
    pub fn with_specialist(mut self, specialist: Specialist) -> Self {
        self.specialists.push(specialist);
        self
    }

    /// Adds a class.
    pub fn with_class(mut self, class: ClassGroup) -> Self {
        self.classes.push(class);
        self
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the period length.
    pub fn with_period_length(mut self, minutes: u32) -> Self {
        self.period_length_minutes = minutes;
        self
    }
}
