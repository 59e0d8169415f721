//! Availability checking for contiguous blocks.
//!
//! Shared by manual assignment and automatic generation; neither path
//! re-implements any of these checks.
//!
//! # Algorithm
//! 1. Take the start period's day, ordered by start time.
//! 2. Require `blocks_needed` periods from the start index (no wraparound
//!    into the next day).
//! 3. For each period in turn: reject if break time, then reject if the
//!    class already holds a booking there that the policy won't replace.
//!
//! # Complexity
//! O(b) map lookups for a block of `b` periods.

use log::trace;

use crate::context::SchedulingContext;
use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{PeriodId, TimePeriod, Timetable};

/// How existing bookings in the target slots are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacePolicy {
    /// Any occupied slot is a conflict.
    #[default]
    Never,
    /// Occupied slots are fine when every period of the occupying
    /// booking lies inside the target block (re-assigning the same cells).
    /// A booking that would be cut in half is still a conflict.
    WholeBlocks,
}

/// Checks whether `blocks_needed` contiguous periods from `start_period_id`
/// can be booked for a class.
///
/// Returns the target periods in day order on success. Never mutates
/// the timetable.
pub fn check_availability<'a>(
    ctx: &SchedulingContext<'a>,
    class_id: &str,
    start_period_id: &str,
    blocks_needed: usize,
    timetable: &Timetable,
    policy: ReplacePolicy,
) -> SchedulingResult<Vec<&'a TimePeriod>> {
    let blocks_needed = blocks_needed.max(1);
    let run = ctx
        .run_from(start_period_id, blocks_needed)
        .ok_or_else(|| SchedulingError::UnknownPeriod(start_period_id.to_string()))?;

    if run.len() < blocks_needed {
        return Err(SchedulingError::InsufficientConsecutiveBlocks {
            class_id: class_id.to_string(),
            period_id: start_period_id.to_string(),
            needed: blocks_needed,
            available: run.len(),
        });
    }

    for period in run {
        if let Some(brk) = ctx.break_at(period) {
            return Err(SchedulingError::BreakConflict {
                class_id: class_id.to_string(),
                period_id: period.id.clone(),
                break_id: brk.id.clone(),
                break_name: brk.name.clone(),
            });
        }

        if let Some(occupant) = timetable.get(class_id, &period.id) {
            let replaceable = policy == ReplacePolicy::WholeBlocks
                && occupant
                    .block_slot_ids
                    .iter()
                    .all(|slot| run.iter().any(|p| &p.id == slot));
            if !replaceable {
                return Err(SchedulingError::SlotConflict {
                    class_id: class_id.to_string(),
                    period_id: period.id.clone(),
                    occupant: occupant.booking.to_string(),
                });
            }
        }
    }

    Ok(run.to_vec())
}

/// Boolean form with [`ReplacePolicy::Never`].
pub fn is_available(
    ctx: &SchedulingContext<'_>,
    class_id: &str,
    start_period_id: &str,
    blocks_needed: usize,
    timetable: &Timetable,
) -> bool {
    match check_availability(
        ctx,
        class_id,
        start_period_id,
        blocks_needed,
        timetable,
        ReplacePolicy::Never,
    ) {
        Ok(_) => true,
        Err(err) => {
            trace!("class {class_id} unavailable from {start_period_id}: {err}");
            false
        }
    }
}

/// Period ids of a block, in order.
pub fn slot_ids(periods: &[&TimePeriod]) -> Vec<PeriodId> {
    periods.iter().map(|p| p.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_of_day::hm;
    use crate::models::{Booking, Break, SchedulingConfig, TimePeriod};
    use chrono::Weekday;

    fn monday_config() -> SchedulingConfig {
        SchedulingConfig::new()
            .with_period(TimePeriod::new("p1", Weekday::Mon, hm(8, 30), hm(9, 0)))
            .with_period(TimePeriod::new("p2", Weekday::Mon, hm(9, 0), hm(9, 30)))
            .with_period(TimePeriod::new("p3", Weekday::Mon, hm(9, 30), hm(10, 0)))
            .with_period(TimePeriod::new("t1", Weekday::Tue, hm(8, 30), hm(9, 0)))
    }

    fn ids(periods: &[&TimePeriod]) -> Vec<String> {
        slot_ids(periods)
    }

    #[test]
    fn test_free_run() {
        let config = monday_config();
        let ctx = SchedulingContext::new(&config);
        let tt = Timetable::new();

        let run = check_availability(&ctx, "3A", "p1", 2, &tt, ReplacePolicy::Never).unwrap();
        assert_eq!(ids(&run), vec!["p1", "p2"]);
        assert!(is_available(&ctx, "3A", "p2", 2, &tt));
    }

    #[test]
    fn test_no_wraparound_into_next_day() {
        let config = monday_config();
        let ctx = SchedulingContext::new(&config);
        let tt = Timetable::new();

        let err = check_availability(&ctx, "3A", "p3", 2, &tt, ReplacePolicy::Never).unwrap_err();
        assert_eq!(
            err,
            SchedulingError::InsufficientConsecutiveBlocks {
                class_id: "3A".into(),
                period_id: "p3".into(),
                needed: 2,
                available: 1,
            }
        );
        assert!(!is_available(&ctx, "3A", "t1", 2, &tt));
    }

    #[test]
    fn test_break_inside_block() {
        let config = monday_config().with_break(Break::new("recess", "Recess", hm(8, 45), hm(9, 15)));
        let ctx = SchedulingContext::new(&config);
        let tt = Timetable::new();

        let err = check_availability(&ctx, "3A", "p1", 2, &tt, ReplacePolicy::Never).unwrap_err();
        assert!(matches!(err, SchedulingError::BreakConflict { ref period_id, .. } if period_id == "p2"));
        // Single period before the break is fine
        assert!(is_available(&ctx, "3A", "p1", 1, &tt));
    }

    #[test]
    fn test_occupied_slot_conflicts() {
        let config = monday_config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();
        tt.insert_block("3A", &Booking::Nct, &["p2".to_string()]);

        assert!(!is_available(&ctx, "3A", "p1", 2, &tt));
        // Other classes are unaffected
        assert!(is_available(&ctx, "4B", "p1", 2, &tt));
    }

    #[test]
    fn test_whole_block_replacement_policy() {
        let config = monday_config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();
        tt.insert_block("3A", &Booking::from("pe"), &["p1".to_string(), "p2".to_string()]);

        // Same cells: replaceable
        assert!(check_availability(&ctx, "3A", "p1", 2, &tt, ReplacePolicy::WholeBlocks).is_ok());
        // Would cut the PE block in half
        let err =
            check_availability(&ctx, "3A", "p2", 2, &tt, ReplacePolicy::WholeBlocks).unwrap_err();
        assert!(matches!(err, SchedulingError::SlotConflict { ref occupant, .. } if occupant == "pe"));
        // Strict policy never replaces
        assert!(check_availability(&ctx, "3A", "p1", 2, &tt, ReplacePolicy::Never).is_err());
    }

    #[test]
    fn test_unknown_period() {
        let config = monday_config();
        let ctx = SchedulingContext::new(&config);
        let err =
            check_availability(&ctx, "3A", "zz", 1, &Timetable::new(), ReplacePolicy::Never)
                .unwrap_err();
        assert_eq!(err, SchedulingError::UnknownPeriod("zz".into()));
    }

    #[test]
    fn test_does_not_mutate() {
        let config = monday_config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();
        tt.insert_block("3A", &Booking::Nct, &["p3".to_string()]);
        let before = tt.clone();
        let _ = check_availability(&ctx, "3A", "p1", 3, &tt, ReplacePolicy::WholeBlocks);
        assert_eq!(tt, before);
    }
}
