//! Year-level time-window policies.
//!
//! A constraint scopes a time window to one year level, on one day or
//! every day. `Avoid` windows are hard: nothing may be booked there.
//! `Minimize` windows are advisory and only lower a slot's preference.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{time_of_day, TimePeriod, YearLevel};

/// Policy strength of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    /// Hard rule: no booking may start a period inside the window.
    Avoid,
    /// Soft rule: bookings inside the window are discouraged.
    Minimize,
}

/// Which days a constraint covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayScope {
    /// Every day of the week.
    All,
    /// A single weekday.
    Day(Weekday),
}

impl DayScope {
    /// Whether the scope includes a weekday.
    #[inline]
    pub fn includes(&self, day: Weekday) -> bool {
        match self {
            DayScope::All => true,
            DayScope::Day(d) => *d == day,
        }
    }
}

impl fmt::Display for DayScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayScope::All => f.write_str("all"),
            DayScope::Day(day) => write!(f, "{day}"),
        }
    }
}

impl FromStr for DayScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(DayScope::All);
        }
        s.parse::<Weekday>()
            .map(DayScope::Day)
            .map_err(|_| format!("invalid day scope '{s}': expected 'all' or a weekday"))
    }
}

impl TryFrom<String> for DayScope {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayScope> for String {
    fn from(scope: DayScope) -> Self {
        scope.to_string()
    }
}

/// A scheduling policy rule for one year level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    /// Unique constraint identifier.
    pub id: String,
    /// Year level the rule applies to.
    pub year_level: YearLevel,
    /// Hard (`avoid`) or soft (`minimize`).
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    /// Window start (inclusive).
    #[serde(with = "time_of_day")]
    pub start_time: NaiveTime,
    /// Window end (exclusive).
    #[serde(with = "time_of_day")]
    pub end_time: NaiveTime,
    /// Covered days.
    pub day: DayScope,
}

impl Constraint {
    /// Creates a constraint covering every day.
    pub fn new(
        id: impl Into<String>,
        year_level: impl Into<YearLevel>,
        kind: ConstraintKind,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: id.into(),
            year_level: year_level.into(),
            kind,
            start_time,
            end_time,
            day: DayScope::All,
        }
    }

    /// Creates an `avoid` constraint.
    pub fn avoid(
        id: impl Into<String>,
        year_level: impl Into<YearLevel>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self::new(id, year_level, ConstraintKind::Avoid, start_time, end_time)
    }

    /// Creates a `minimize` constraint.
    pub fn minimize(
        id: impl Into<String>,
        year_level: impl Into<YearLevel>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self::new(id, year_level, ConstraintKind::Minimize, start_time, end_time)
    }

    /// Restricts the constraint to one day.
    pub fn on_day(mut self, day: Weekday) -> Self {
        self.day = DayScope::Day(day);
        self
    }

    /// Whether this is a hard rule.
    #[inline]
    pub fn is_hard(&self) -> bool {
        self.kind == ConstraintKind::Avoid
    }

    /// Whether the rule is scoped to this year level and the period's day.
    pub fn applies_to(&self, level: &YearLevel, period: &TimePeriod) -> bool {
        self.year_level.matches(level) && self.day.includes(period.day)
    }

    /// Whether the period's start falls in `[start_time, end_time)`.
    #[inline]
    pub fn covers(&self, period: &TimePeriod) -> bool {
        period.start >= self.start_time && period.start < self.end_time
    }

    /// Scope and window both match.
    pub fn matches(&self, level: &YearLevel, period: &TimePeriod) -> bool {
        self.applies_to(level, period) && self.covers(period)
    }
}
