//! Manual single-booking placement.
//!
//! Validation order: references, eligibility, availability (run length,
//! breaks, conflicts), avoid windows. The first failure rejects the
//! command and the timetable is left untouched.
//!
//! NCT bookings occupy one period and skip eligibility and constraint
//! checks; break and conflict checks still apply.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::availability::{check_availability, slot_ids, ReplacePolicy};
use crate::context::SchedulingContext;
use crate::error::{SchedulingError, SchedulingResult};
use crate::evaluator::{check_constraints, check_eligibility};
use crate::models::{Assignment, Booking, ClassId, PeriodId, Timetable};

/// Which policy checks a manual assignment enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignOptions {
    /// Reject specialists outside their eligible year levels.
    pub enforce_eligibility: bool,
    /// Reject blocks touching an avoid window.
    pub enforce_constraints: bool,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            enforce_eligibility: true,
            enforce_constraints: true,
        }
    }
}

impl AssignOptions {
    /// Availability checks only.
    pub fn permissive() -> Self {
        Self {
            enforce_eligibility: false,
            enforce_constraints: false,
        }
    }
}

/// Place one booking starting at a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignCommand {
    pub class_id: ClassId,
    pub period_id: PeriodId,
    pub booking: Booking,
    pub options: AssignOptions,
}

/// A validated assignment, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignPlan {
    class_id: ClassId,
    booking: Booking,
    slots: Vec<PeriodId>,
}

impl AssignCommand {
    /// Creates an assignment; `"NCT"` selects a non-contact placeholder.
    pub fn new(
        class_id: impl Into<String>,
        period_id: impl Into<String>,
        booking: impl Into<Booking>,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            period_id: period_id.into(),
            booking: booking.into(),
            options: AssignOptions::default(),
        }
    }

    /// Creates an NCT placeholder assignment.
    pub fn nct(class_id: impl Into<String>, period_id: impl Into<String>) -> Self {
        Self::new(class_id, period_id, Booking::Nct)
    }

    /// Sets the enforcement options.
    pub fn with_options(mut self, options: AssignOptions) -> Self {
        self.options = options;
        self
    }

    /// Checks the command without touching the timetable.
    pub fn validate(
        &self,
        ctx: &SchedulingContext<'_>,
        timetable: &Timetable,
    ) -> SchedulingResult<AssignPlan> {
        let class = ctx
            .class(&self.class_id)
            .ok_or_else(|| SchedulingError::UnknownClass(self.class_id.clone()))?;
        if ctx.period(&self.period_id).is_none() {
            return Err(SchedulingError::UnknownPeriod(self.period_id.clone()));
        }

        let specialist = match &self.booking {
            Booking::Nct => None,
            Booking::Specialist(id) => Some(
                ctx.specialist(id)
                    .ok_or_else(|| SchedulingError::UnknownSpecialist(id.clone()))?,
            ),
        };

        if let (Some(specialist), true) = (specialist, self.options.enforce_eligibility) {
            check_eligibility(specialist, class)?;
        }

        let blocks = specialist.map_or(1, |s| ctx.blocks_needed(s));
        let periods = check_availability(
            ctx,
            &self.class_id,
            &self.period_id,
            blocks,
            timetable,
            ReplacePolicy::WholeBlocks,
        )?;

        if specialist.is_some() && self.options.enforce_constraints {
            check_constraints(class, &periods, &ctx.config().constraints)?;
        }

        Ok(AssignPlan {
            class_id: self.class_id.clone(),
            booking: self.booking.clone(),
            slots: slot_ids(&periods),
        })
    }

    /// Validates, then commits. Returns the written records.
    pub fn execute(
        &self,
        ctx: &SchedulingContext<'_>,
        timetable: &mut Timetable,
    ) -> SchedulingResult<Vec<Assignment>> {
        let plan = self.validate(ctx, timetable)?;
        Ok(plan.commit(timetable))
    }
}

impl AssignPlan {
    /// Target periods in block order.
    pub fn slots(&self) -> &[PeriodId] {
        &self.slots
    }

    /// Writes the block, replacing the whole bookings it covers.
    pub fn commit(self, timetable: &mut Timetable) -> Vec<Assignment> {
        for slot in &self.slots {
            if let Some(previous) = timetable.get(&self.class_id, slot) {
                debug!(
                    "Replacing {} at ({}, {}) with {}",
                    previous.booking, self.class_id, slot, self.booking
                );
            }
        }
        timetable.insert_block(&self.class_id, &self.booking, &self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_of_day::hm;
    use crate::models::{
        Break, ClassGroup, Constraint, SchedulingConfig, Specialist, TimePeriod,
    };
    use chrono::Weekday;

    fn config() -> SchedulingConfig {
        SchedulingConfig::new()
            .with_period(TimePeriod::new("p1", Weekday::Mon, hm(8, 30), hm(9, 0)))
            .with_period(TimePeriod::new("p2", Weekday::Mon, hm(9, 0), hm(9, 30)))
            .with_period(TimePeriod::new("p3", Weekday::Mon, hm(9, 30), hm(10, 0)))
            .with_period(TimePeriod::new("p4", Weekday::Mon, hm(10, 0), hm(10, 30)))
            .with_specialist(Specialist::new("pe", "PE", 60))
            .with_specialist(Specialist::new("art", "Art", 60))
            .with_specialist(
                Specialist::new("jart", "Junior ART", 60).with_year_levels(["Prep", "Year 1", "Year 2"]),
            )
            .with_class(ClassGroup::new("3A", "Year 3A"))
            .with_class(ClassGroup::new("5A", "Year 5A"))
            .with_class(ClassGroup::new("PA", "PrepA"))
            .with_constraint(Constraint::avoid("c1", "Prep", hm(8, 30), hm(9, 30)))
    }

    #[test]
    fn test_assign_two_period_block() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();

        let records = AssignCommand::new("3A", "p1", "pe").execute(&ctx, &mut tt).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_first_slot_of_block);
        assert!(!records[1].is_first_slot_of_block);
        assert_eq!(records[1].period_id, "p2");
        assert_eq!(tt.len(), 2);
    }

    #[test]
    fn test_break_rejects() {
        let config = config().with_break(Break::new("recess", "Recess", hm(8, 45), hm(9, 15)));
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();

        let err = AssignCommand::new("3A", "p1", "pe").execute(&ctx, &mut tt).unwrap_err();
        assert!(matches!(err, SchedulingError::BreakConflict { .. }));
        assert!(tt.is_empty());
    }

    #[test]
    fn test_eligibility_rejects_unless_disabled() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();

        let err = AssignCommand::new("5A", "p1", "jart").execute(&ctx, &mut tt).unwrap_err();
        assert!(matches!(err, SchedulingError::Eligibility { .. }));

        let records = AssignCommand::new("5A", "p1", "jart")
            .with_options(AssignOptions::permissive())
            .execute(&ctx, &mut tt)
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_avoid_window_rejects() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();

        // p2..p3 touches the 08:30-09:30 window at p2
        let err = AssignCommand::new("PA", "p2", "pe").execute(&ctx, &mut tt).unwrap_err();
        assert!(
            matches!(err, SchedulingError::HardConstraintViolation { ref period_id, .. } if period_id == "p2")
        );
        assert!(AssignCommand::new("PA", "p3", "pe").execute(&ctx, &mut tt).is_ok());
    }

    #[test]
    fn test_nct_single_period_no_policy_checks() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();

        // Inside Prep's avoid window, still allowed for NCT
        let records = AssignCommand::nct("PA", "p1").execute(&ctx, &mut tt).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_nct());
        assert_eq!(records[0].block_slot_ids, vec!["p1".to_string()]);

        // NCT still collides with existing bookings
        AssignCommand::new("3A", "p3", "pe").execute(&ctx, &mut tt).unwrap();
        let err = AssignCommand::nct("3A", "p4").execute(&ctx, &mut tt).unwrap_err();
        assert!(matches!(err, SchedulingError::SlotConflict { .. }));
    }

    #[test]
    fn test_reassign_same_block() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();

        AssignCommand::new("3A", "p1", "pe").execute(&ctx, &mut tt).unwrap();
        let records = AssignCommand::new("3A", "p1", "art").execute(&ctx, &mut tt).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(tt.len(), 2);
        assert_eq!(tt.get("3A", "p2").unwrap().specialist_id(), Some("art"));
    }

    #[test]
    fn test_partial_overlap_conflicts() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();

        AssignCommand::new("3A", "p1", "pe").execute(&ctx, &mut tt).unwrap();
        let before = tt.clone();
        let err = AssignCommand::new("3A", "p2", "art").execute(&ctx, &mut tt).unwrap_err();
        assert!(matches!(err, SchedulingError::SlotConflict { ref period_id, .. } if period_id == "p2"));
        assert_eq!(tt, before);
    }

    #[test]
    fn test_insufficient_blocks() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let err = AssignCommand::new("3A", "p4", "pe")
            .validate(&ctx, &Timetable::new())
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulingError::InsufficientConsecutiveBlocks { needed: 2, available: 1, .. }
        ));
    }

    #[test]
    fn test_unknown_references() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let tt = Timetable::new();
        assert_eq!(
            AssignCommand::new("9Z", "p1", "pe").validate(&ctx, &tt).unwrap_err(),
            SchedulingError::UnknownClass("9Z".into())
        );
        assert_eq!(
            AssignCommand::new("3A", "zz", "pe").validate(&ctx, &tt).unwrap_err(),
            SchedulingError::UnknownPeriod("zz".into())
        );
        assert_eq!(
            AssignCommand::new("3A", "p1", "drama").validate(&ctx, &tt).unwrap_err(),
            SchedulingError::UnknownSpecialist("drama".into())
        );
    }

    #[test]
    fn test_plan_slots() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let plan = AssignCommand::new("3A", "p2", "pe")
            .validate(&ctx, &Timetable::new())
            .unwrap();
        assert_eq!(plan.slots(), &["p2".to_string(), "p3".to_string()]);
    }
}
