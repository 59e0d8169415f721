//! Scheduling error taxonomy.
//!
//! Every error is local and recoverable: the rejected operation leaves
//! the timetable untouched. The generator never returns these for
//! individual placements; it skips the pair and reports it instead.

use thiserror::Error;

use crate::models::{ClassId, PeriodId, SpecialistId, YearLevel};
use crate::scheduler::Violation;
use crate::validation::ValidationError;

/// Result alias for scheduling operations.
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Why a scheduling operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    /// A target period is held by a booking that cannot be replaced.
    #[error("class '{class_id}' is already booked at period '{period_id}' ({occupant})")]
    SlotConflict {
        class_id: ClassId,
        period_id: PeriodId,
        /// Booking id currently occupying the cell.
        occupant: String,
    },

    /// A target period starts inside a break.
    #[error("period '{period_id}' falls within break '{break_name}'")]
    BreakConflict {
        class_id: ClassId,
        period_id: PeriodId,
        break_id: String,
        break_name: String,
    },

    /// Not enough same-day periods remain from the start period.
    #[error(
        "only {available} consecutive period(s) remain from '{period_id}', {needed} needed"
    )]
    InsufficientConsecutiveBlocks {
        class_id: ClassId,
        period_id: PeriodId,
        needed: usize,
        available: usize,
    },

    /// The specialist does not teach the class's year level.
    #[error(
        "specialist '{specialist_id}' is not eligible for year level '{year_level}' (class '{class_id}')"
    )]
    Eligibility {
        specialist_id: SpecialistId,
        class_id: ClassId,
        year_level: YearLevel,
    },

    /// A target period is inside an avoid window for the class's year level.
    #[error(
        "period '{period_id}' is inside avoid window '{constraint_id}' for year level '{year_level}'"
    )]
    HardConstraintViolation {
        class_id: ClassId,
        period_id: PeriodId,
        constraint_id: String,
        year_level: YearLevel,
    },

    #[error("unknown class: {0}")]
    UnknownClass(ClassId),

    #[error("unknown period: {0}")]
    UnknownPeriod(PeriodId),

    #[error("unknown specialist: {0}")]
    UnknownSpecialist(SpecialistId),

    /// Unassign targeted an empty cell.
    #[error("class '{class_id}' has no booking at period '{period_id}'")]
    NotAssigned {
        class_id: ClassId,
        period_id: PeriodId,
    },

    /// A generation run is already in flight.
    #[error("a timetable generation run is already in progress")]
    GenerationInProgress,

    /// A timetable handed to the engine breaks its block structure.
    #[error("inconsistent timetable: {} structural violation(s)", .0.len())]
    InconsistentTimetable(Vec<Violation>),

    /// The configuration failed validation.
    #[error("invalid scheduling configuration: {}", summarize(.0))]
    InvalidConfig(Vec<ValidationError>),
}

impl SchedulingError {
    /// Whether the error stems from the target slots themselves
    /// (conflict, break, or run length) rather than from policy.
    pub fn is_availability(&self) -> bool {
        matches!(
            self,
            SchedulingError::SlotConflict { .. }
                | SchedulingError::BreakConflict { .. }
                | SchedulingError::InsufficientConsecutiveBlocks { .. }
        )
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (+{} more)", first.message, rest.len()),
    }
}
