//! Cascade removal of one booking.

use log::debug;

use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{Assignment, ClassId, PeriodId, Timetable};

/// Remove the booking occupying a cell, whichever slot of the block it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnassignCommand {
    pub class_id: ClassId,
    pub period_id: PeriodId,
}

impl UnassignCommand {
    /// Creates the command.
    pub fn new(class_id: impl Into<String>, period_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            period_id: period_id.into(),
        }
    }

    /// Fails with [`SchedulingError::NotAssigned`] on an empty cell.
    pub fn validate(&self, timetable: &Timetable) -> SchedulingResult<()> {
        if timetable.is_occupied(&self.class_id, &self.period_id) {
            Ok(())
        } else {
            Err(SchedulingError::NotAssigned {
                class_id: self.class_id.clone(),
                period_id: self.period_id.clone(),
            })
        }
    }

    /// Validates, then removes every record of the block.
    pub fn execute(&self, timetable: &mut Timetable) -> SchedulingResult<Vec<Assignment>> {
        self.validate(timetable)?;
        let removed = timetable.remove_block(&self.class_id, &self.period_id);
        debug!(
            "Removed {} record(s) for class {} via {}",
            removed.len(),
            self.class_id,
            self.period_id
        );
        Ok(removed)
    }
}
