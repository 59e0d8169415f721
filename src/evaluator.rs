//! Constraint and eligibility evaluation.
//!
//! Pure functions over a class (via its derived year level) and one or
//! more periods. Reused by manual assignment and generation.
//!
//! # Policy
//! - `avoid` windows are hard: [`violates_constraint`] is `true` when the
//!   period starts inside one.
//! - `minimize` windows never reject. They produce a penalty
//!   ([`minimize_penalty`]) that the generator uses to try cleaner slots first.

use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{ClassGroup, Constraint, ConstraintKind, Specialist, TimePeriod, YearLevel};

/// Whether placing the class at this period breaks an avoid rule.
pub fn violates_constraint(
    class: &ClassGroup,
    period: &TimePeriod,
    constraints: &[Constraint],
) -> bool {
    hard_violation(&class.year_level(), period, constraints).is_some()
}

/// The first avoid rule matching a year level and period.
pub fn hard_violation<'c>(
    level: &YearLevel,
    period: &TimePeriod,
    constraints: &'c [Constraint],
) -> Option<&'c Constraint> {
    constraints
        .iter()
        .find(|c| c.kind == ConstraintKind::Avoid && c.matches(level, period))
}

/// Number of minimize windows matching the class at this period.
pub fn minimize_penalty(class: &ClassGroup, period: &TimePeriod, constraints: &[Constraint]) -> u32 {
    soft_penalty(&class.year_level(), period, constraints)
}

/// Minimize-window count for a year level.
pub fn soft_penalty(level: &YearLevel, period: &TimePeriod, constraints: &[Constraint]) -> u32 {
    constraints
        .iter()
        .filter(|c| c.kind == ConstraintKind::Minimize && c.matches(level, period))
        .count() as u32
}

/// First period of a block inside an avoid window, with the rule hit.
pub fn block_violation<'p, 'c>(
    level: &YearLevel,
    block: &[&'p TimePeriod],
    constraints: &'c [Constraint],
) -> Option<(&'p TimePeriod, &'c Constraint)> {
    block.iter().find_map(|&period| {
        hard_violation(level, period, constraints).map(|constraint| (period, constraint))
    })
}

/// Summed minimize penalty over a block.
pub fn block_penalty(level: &YearLevel, block: &[&TimePeriod], constraints: &[Constraint]) -> u32 {
    block
        .iter()
        .map(|period| soft_penalty(level, period, constraints))
        .sum()
}

/// Rejects a block that touches an avoid window.
pub fn check_constraints(
    class: &ClassGroup,
    block: &[&TimePeriod],
    constraints: &[Constraint],
) -> SchedulingResult<()> {
    let level = class.year_level();
    match block_violation(&level, block, constraints) {
        Some((period, constraint)) => Err(SchedulingError::HardConstraintViolation {
            class_id: class.id.clone(),
            period_id: period.id.clone(),
            constraint_id: constraint.id.clone(),
            year_level: level,
        }),
        None => Ok(()),
    }
}

/// Rejects a specialist that does not teach the class's year level.
pub fn check_eligibility(specialist: &Specialist, class: &ClassGroup) -> SchedulingResult<()> {
    let level = class.year_level();
    if specialist.is_eligible(&level) {
        Ok(())
    } else {
        Err(SchedulingError::Eligibility {
            specialist_id: specialist.id.clone(),
            class_id: class.id.clone(),
            year_level: level,
        })
    }
}
