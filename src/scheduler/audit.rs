//! Timetable invariant audit.
//!
//! Re-checks a finished timetable against its configuration:
//! storage keys, block integrity, contiguity, breaks, durations,
//! eligibility, and avoid windows. Useful after manual edits made with
//! eligibility or constraint checks switched off.

use serde::{Deserialize, Serialize};

use crate::context::SchedulingContext;
use crate::evaluator::hard_violation;
use crate::models::{Assignment, ClassId, PeriodId, TimePeriod, Timetable};

/// An invariant violation found in a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Class of the offending record.
    pub class_id: ClassId,
    /// Period of the offending record.
    pub period_id: PeriodId,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of timetable violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Record stored under a key that differs from its own ids.
    KeyMismatch,
    /// Class, period, or specialist not present in the configuration.
    UnknownReference,
    /// Block siblings missing, disagreeing, or wrongly flagged.
    BrokenBlock,
    /// Block periods not same-day or not consecutive.
    NonContiguousBlock,
    /// A booked period starts inside a break.
    BreakTime,
    /// Block length differs from the specialist's duration.
    DurationMismatch,
    /// Specialist booked for a year level it does not teach.
    IneligibleSpecialist,
    /// Booked period inside an avoid window.
    AvoidWindow,
}

impl ViolationType {
    /// Whether the violation breaks the timetable's own structure, as
    /// opposed to a policy check that manual edits may switch off.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            ViolationType::IneligibleSpecialist | ViolationType::AvoidWindow
        )
    }
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        record: &Assignment,
        message: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            class_id: record.class_id.clone(),
            period_id: record.period_id.clone(),
            message: message.into(),
            severity,
        }
    }
}

/// Audits a timetable. Returns every violation found; empty means valid.
pub fn audit_timetable(ctx: &SchedulingContext<'_>, timetable: &Timetable) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (class_key, period_key, record) in timetable.entries() {
        if record.class_id != class_key || record.period_id != period_key {
            violations.push(Violation::new(
                ViolationType::KeyMismatch,
                record,
                format!("Record stored under ({class_key}, {period_key})"),
                100,
            ));
        }

        let expected_first = record.block_slot_ids.first() == Some(&record.period_id);
        if !record.block_slot_ids.contains(&record.period_id)
            || record.is_first_slot_of_block != expected_first
        {
            violations.push(Violation::new(
                ViolationType::BrokenBlock,
                record,
                "Record does not match its block slot list",
                90,
            ));
        }

        if record.is_first_slot_of_block {
            audit_block(ctx, timetable, record, &mut violations);
        }
    }

    violations
}

fn audit_block(
    ctx: &SchedulingContext<'_>,
    timetable: &Timetable,
    first: &Assignment,
    violations: &mut Vec<Violation>,
) {
    let Some(class) = ctx.class(&first.class_id) else {
        violations.push(Violation::new(
            ViolationType::UnknownReference,
            first,
            format!("Unknown class '{}'", first.class_id),
            70,
        ));
        return;
    };

    for slot in &first.block_slot_ids {
        let intact = timetable
            .get(&first.class_id, slot)
            .is_some_and(|sibling| sibling.same_block(first) && sibling.booking == first.booking);
        if !intact {
            violations.push(Violation::new(
                ViolationType::BrokenBlock,
                first,
                format!("Block slot '{slot}' is missing or belongs to another booking"),
                90,
            ));
        }
    }

    let mut periods: Vec<&TimePeriod> = Vec::with_capacity(first.block_len());
    for slot in &first.block_slot_ids {
        match ctx.period(slot) {
            Some(period) => periods.push(period),
            None => violations.push(Violation::new(
                ViolationType::UnknownReference,
                first,
                format!("Unknown period '{slot}'"),
                70,
            )),
        }
    }

    let contiguous = periods.windows(2).all(|pair| {
        pair[0].day == pair[1].day
            && matches!(
                (ctx.position(&pair[0].id), ctx.position(&pair[1].id)),
                (Some(a), Some(b)) if b == a + 1
            )
    });
    if !contiguous {
        violations.push(Violation::new(
            ViolationType::NonContiguousBlock,
            first,
            "Block periods are not consecutive on one day",
            95,
        ));
    }

    for period in &periods {
        if let Some(brk) = ctx.break_at(period) {
            violations.push(Violation::new(
                ViolationType::BreakTime,
                first,
                format!("Period '{}' falls within {}", period.id, brk.name),
                85,
            ));
        }
    }

    let Some(specialist_id) = first.specialist_id() else {
        if first.block_len() != 1 {
            violations.push(Violation::new(
                ViolationType::DurationMismatch,
                first,
                format!("NCT block spans {} periods", first.block_len()),
                60,
            ));
        }
        return;
    };

    let Some(specialist) = ctx.specialist(specialist_id) else {
        violations.push(Violation::new(
            ViolationType::UnknownReference,
            first,
            format!("Unknown specialist '{specialist_id}'"),
            70,
        ));
        return;
    };

    let needed = ctx.blocks_needed(specialist);
    if first.block_len() != needed {
        violations.push(Violation::new(
            ViolationType::DurationMismatch,
            first,
            format!(
                "{} block spans {} periods, {} needed",
                specialist.id,
                first.block_len(),
                needed
            ),
            80,
        ));
    }

    let level = class.year_level();
    if !specialist.is_eligible(&level) {
        violations.push(Violation::new(
            ViolationType::IneligibleSpecialist,
            first,
            format!("{} does not teach {}", specialist.id, level),
            75,
        ));
    }

    for period in &periods {
        if let Some(constraint) = hard_violation(&level, period, &ctx.config().constraints) {
            violations.push(Violation::new(
                ViolationType::AvoidWindow,
                first,
                format!("Period '{}' inside avoid window '{}'", period.id, constraint.id),
                75,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_of_day::hm;
    use crate::models::{
        Booking, Break, ClassGroup, Constraint, SchedulingConfig, Specialist, WeekTemplate,
    };

    fn config() -> SchedulingConfig {
        SchedulingConfig::from_template(&WeekTemplate::standard())
            .with_break(Break::new("recess", "Recess", hm(10, 30), hm(11, 0)))
            .with_specialist(Specialist::new("pe", "PE", 60))
            .with_specialist(Specialist::new("jart", "Junior ART", 30).with_year_level("Prep"))
            .with_class(ClassGroup::new("pa", "PrepA"))
            .with_class(ClassGroup::new("3a", "Year 3A"))
            .with_constraint(Constraint::avoid("c1", "Prep", hm(8, 30), hm(9, 30)))
    }

    fn slots(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn kinds(violations: &[Violation]) -> Vec<ViolationType> {
        violations.iter().map(|v| v.violation_type).collect()
    }

    #[test]
    fn test_clean_timetable() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();
        tt.insert_block("3a", &Booking::from("pe"), &slots(&["mon-0830", "mon-0900"]));
        tt.insert_block("pa", &Booking::from("jart"), &slots(&["mon-1100"]));
        tt.insert_block("pa", &Booking::Nct, &slots(&["mon-0830"]));
        assert!(audit_timetable(&ctx, &tt).is_empty());
    }

    #[test]
    fn test_policy_violations() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();
        // Ineligible and inside Prep's avoid window
        tt.insert_block("3a", &Booking::from("jart"), &slots(&["tue-0830"]));
        tt.insert_block("pa", &Booking::from("pe"), &slots(&["tue-0830", "tue-0900"]));

        let found = kinds(&audit_timetable(&ctx, &tt));
        assert!(found.contains(&ViolationType::IneligibleSpecialist));
        assert_eq!(
            found.iter().filter(|k| **k == ViolationType::AvoidWindow).count(),
            2
        );
    }

    #[test]
    fn test_structural_violations() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();
        // Across the recess, skipping a period, wrong length
        tt.insert_block("3a", &Booking::from("pe"), &slots(&["mon-1000", "mon-1030", "mon-1130"]));
        tt.insert_block("3a", &Booking::from("ghost"), &slots(&["fri-0830"]));

        let found = kinds(&audit_timetable(&ctx, &tt));
        assert!(found.contains(&ViolationType::NonContiguousBlock));
        assert!(found.contains(&ViolationType::BreakTime));
        assert!(found.contains(&ViolationType::DurationMismatch));
        assert!(found.contains(&ViolationType::UnknownReference));
    }

    #[test]
    fn test_structural_classification() {
        assert!(ViolationType::BrokenBlock.is_structural());
        assert!(ViolationType::BreakTime.is_structural());
        assert!(!ViolationType::IneligibleSpecialist.is_structural());
        assert!(!ViolationType::AvoidWindow.is_structural());
    }

    #[test]
    fn test_broken_block_after_tampering() {
        let config = config();
        let ctx = SchedulingContext::new(&config);
        let mut tt = Timetable::new();
        tt.insert_block("3a", &Booking::from("pe"), &slots(&["mon-0830", "mon-0900"]));

        // Serialize, drop the second record, reload
        let mut value = serde_json::to_value(&tt).unwrap();
        value["3a"].as_object_mut().unwrap().remove("mon-0900");
        let tampered: Timetable = serde_json::from_value(value).unwrap();

        let found = kinds(&audit_timetable(&ctx, &tampered));
        assert_eq!(found, vec![ViolationType::BrokenBlock]);
    }
}
