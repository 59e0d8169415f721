//! Input validation for timetable configurations.
//!
//! Checks structural integrity of the period grid, breaks, specialists,
//! classes, and constraints before scheduling. Detects:
//! - Duplicate IDs
//! - Inverted or empty time ranges
//! - Periods outside Monday..Friday
//! - Periods whose length differs from the configured period length
//! - Same-day periods that overlap in time
//! - Durations that are zero or not a multiple of the period length
//! - Specialists using the reserved `NCT` id
//!
//! All issues are collected; validation never stops at the first one.

use std::collections::HashSet;
use std::fmt;

use crate::models::{SchedulingConfig, TimePeriod, NCT};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same type share an ID.
    DuplicateId,
    /// A period, break, or constraint ends at or before its start.
    InvalidTimeRange,
    /// A period falls on a weekend.
    InvalidDay,
    /// A specialist duration is zero or not a period multiple.
    InvalidDuration,
    /// The period length is zero.
    InvalidPeriodLength,
    /// A period's actual length differs from the period length.
    PeriodLengthMismatch,
    /// Two periods on the same day overlap.
    OverlappingPeriods,
    /// An ID collides with a reserved booking id.
    ReservedId,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

/// Validates a scheduling configuration.
///
/// Checks:
/// 1. Period length is positive
/// 2. No duplicate period, break, specialist, class, or constraint IDs
/// 3. Every period is on Monday..Friday, ends after it starts, and
///    lasts exactly the period length
/// 4. No two periods on the same day overlap
/// 5. Every break and constraint window ends after it starts
/// 6. Every specialist duration is a positive multiple of the period length
/// 7. No specialist uses the reserved `NCT` id
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &SchedulingConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let period_length = config.period_length_minutes;

    if period_length == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidPeriodLength,
            "Period length must be positive",
        ));
    }

    check_unique(config.periods.iter().map(|p| p.id.as_str()), "period", &mut errors);
    check_unique(config.breaks.iter().map(|b| b.id.as_str()), "break", &mut errors);
    check_unique(
        config.specialists.iter().map(|s| s.id.as_str()),
        "specialist",
        &mut errors,
    );
    check_unique(config.classes.iter().map(|c| c.id.as_str()), "class", &mut errors);
    check_unique(
        config.constraints.iter().map(|c| c.id.as_str()),
        "constraint",
        &mut errors,
    );

    for period in &config.periods {
        if !period.is_school_day() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDay,
                format!("Period '{}' falls on {}, not a school day", period.id, period.day),
            ));
        }
        if period.end <= period.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!("Period '{}' ends at or before its start", period.id),
            ));
        } else if period_length > 0 && period.duration_minutes() != i64::from(period_length) {
            errors.push(ValidationError::new(
                ValidationErrorKind::PeriodLengthMismatch,
                format!(
                    "Period '{}' lasts {} minutes, expected {}",
                    period.id,
                    period.duration_minutes(),
                    period_length
                ),
            ));
        }
    }

    check_overlaps(&config.periods, &mut errors);

    for brk in &config.breaks {
        if brk.end <= brk.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!("Break '{}' ends at or before its start", brk.name),
            ));
        }
    }

    for constraint in &config.constraints {
        if constraint.end_time <= constraint.start_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!("Constraint '{}' window is empty", constraint.id),
            ));
        }
    }

    for specialist in &config.specialists {
        if specialist.id == NCT {
            errors.push(ValidationError::new(
                ValidationErrorKind::ReservedId,
                format!("Specialist '{}' uses the reserved id '{NCT}'", specialist.name),
            ));
        }
        if specialist.duration_minutes == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Specialist '{}' has zero duration", specialist.id),
            ));
        } else if period_length > 0 && specialist.duration_minutes % period_length != 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Specialist '{}' duration {} is not a multiple of {} minutes",
                    specialist.id, specialist.duration_minutes, period_length
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Flags each period that starts before the previous one on its day ends.
fn check_overlaps(periods: &[TimePeriod], errors: &mut Vec<ValidationError>) {
    let mut ordered: Vec<&TimePeriod> = periods.iter().collect();
    ordered.sort_by(|a, b| {
        a.day
            .num_days_from_monday()
            .cmp(&b.day.num_days_from_monday())
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.id.cmp(&b.id))
    });

    for pair in ordered.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if prev.day == next.day && next.start < prev.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::OverlappingPeriods,
                format!(
                    "Period '{}' overlaps '{}' on {}",
                    next.id, prev.id, prev.day
                ),
            ));
        }
    }
}

fn check_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    entity: &str,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
}
