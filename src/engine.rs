//! Timetable engine.
//!
//! [`TimetableEngine`] owns a validated configuration and its timetable
//! and exposes the four operations the surrounding application drives:
//! generate, assign, unassign, and clear. Every mutation runs to
//! completion before returning and is either fully applied or rejected.
//!
//! [`SharedTimetableEngine`] wraps the engine in an exclusive lock for
//! service use. A generation run holds the lock for its whole duration,
//! and a second `generate` arriving while one is in flight is rejected
//! with [`SchedulingError::GenerationInProgress`] instead of queueing.
//!
//! # Example
//!
//! ```
//! use specialist_timetable::engine::TimetableEngine;
//! use specialist_timetable::models::{ClassGroup, SchedulingConfig, Specialist, WeekTemplate};
//! use specialist_timetable::scheduler::GeneratorOptions;
//!
//! let config = SchedulingConfig::from_template(&WeekTemplate::standard())
//!     .with_specialist(Specialist::new("pe", "PE", 60))
//!     .with_class(ClassGroup::new("3a", "Year 3A"));
//! let mut engine = TimetableEngine::new(config).unwrap();
//!
//! let records = engine.assign("3a", "mon-0830", "pe").unwrap();
//! assert_eq!(records.len(), 2);
//!
//! assert_eq!(engine.unassign("3a", "mon-0900").len(), 2);
//!
//! let report = engine.generate(GeneratorOptions::seeded(42));
//! assert!(report.is_complete());
//! assert_eq!(engine.clear(), 2);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Weekday;
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::availability::is_available;
use crate::commands::{AssignCommand, Command, CommandOutcome, UnassignCommand};
use crate::context::SchedulingContext;
use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{Assignment, Booking, SchedulingConfig, Timetable};
use crate::scheduler::{
    audit_timetable, GenerationReport, Generator, GeneratorOptions, TimetableSummary, Violation,
};
use crate::validation::validate_config;

/// Single-threaded owner of a configuration and its timetable.
#[derive(Debug, Clone)]
pub struct TimetableEngine {
    config: SchedulingConfig,
    timetable: Timetable,
}

impl TimetableEngine {
    /// Validates the configuration and starts with an empty timetable.
    pub fn new(config: SchedulingConfig) -> SchedulingResult<Self> {
        Self::with_timetable(config, Timetable::new())
    }

    /// Validates the configuration and adopts an existing timetable,
    /// e.g. one loaded by the surrounding application.
    ///
    /// Fails with [`SchedulingError::InconsistentTimetable`] when the
    /// timetable's blocks do not fit the configuration. Policy violations
    /// (eligibility, avoid windows) are logged and accepted, since manual
    /// edits may have switched those checks off.
    pub fn with_timetable(config: SchedulingConfig, timetable: Timetable) -> SchedulingResult<Self> {
        validate_config(&config).map_err(SchedulingError::InvalidConfig)?;

        let (structural, policy): (Vec<Violation>, Vec<Violation>) =
            audit_timetable(&SchedulingContext::new(&config), &timetable)
                .into_iter()
                .partition(|v| v.violation_type.is_structural());
        for violation in &policy {
            warn!(
                "Adopted timetable: {:?} at ({}, {}): {}",
                violation.violation_type,
                violation.class_id,
                violation.period_id,
                violation.message
            );
        }
        if !structural.is_empty() {
            return Err(SchedulingError::InconsistentTimetable(structural));
        }

        debug!(
            "Engine ready: {} periods, {} specialists, {} classes, {} existing records",
            config.periods.len(),
            config.specialists.len(),
            config.classes.len(),
            timetable.len()
        );
        Ok(Self { config, timetable })
    }

    /// The validated configuration.
    #[inline]
    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// The current timetable.
    #[inline]
    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Consumes the engine, returning the timetable.
    pub fn into_timetable(self) -> Timetable {
        self.timetable
    }

    /// Runs any command against the timetable.
    pub fn execute(&mut self, command: &Command) -> SchedulingResult<CommandOutcome> {
        let ctx = SchedulingContext::new(&self.config);
        command.execute(&ctx, &mut self.timetable)
    }

    /// Places one booking; `"NCT"` books a single non-contact period.
    pub fn assign(
        &mut self,
        class_id: &str,
        period_id: &str,
        booking: impl Into<Booking>,
    ) -> SchedulingResult<Vec<Assignment>> {
        self.assign_with(&AssignCommand::new(class_id, period_id, booking))
    }

    /// Runs a fully specified assignment command.
    pub fn assign_with(&mut self, command: &AssignCommand) -> SchedulingResult<Vec<Assignment>> {
        let ctx = SchedulingContext::new(&self.config);
        command.execute(&ctx, &mut self.timetable)
    }

    /// Removes the booking covering a cell. An empty cell is a no-op.
    pub fn unassign(&mut self, class_id: &str, period_id: &str) -> Vec<Assignment> {
        match UnassignCommand::new(class_id, period_id).execute(&mut self.timetable) {
            Ok(removed) => removed,
            Err(err) => {
                debug!("Unassign ignored: {err}");
                Vec::new()
            }
        }
    }

    /// Fills every missing eligible pair around the current bookings.
    /// After [`clear`](Self::clear) this is a fresh generation.
    pub fn generate(&mut self, options: GeneratorOptions) -> GenerationReport {
        let ctx = SchedulingContext::new(&self.config);
        Generator::new(options).fill(&ctx, &mut self.timetable)
    }

    /// Removes every booking; returns the number of records removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.timetable.clear();
        info!("Cleared timetable ({removed} records)");
        removed
    }

    /// Whether a block of `blocks_needed` periods fits at `start_period_id`.
    pub fn is_available(&self, class_id: &str, start_period_id: &str, blocks_needed: usize) -> bool {
        let ctx = SchedulingContext::new(&self.config);
        is_available(&ctx, class_id, start_period_id, blocks_needed, &self.timetable)
    }

    /// A class's bookings on one day, in period order.
    pub fn class_day(&self, class_id: &str, day: Weekday) -> Vec<&Assignment> {
        let ctx = SchedulingContext::new(&self.config);
        ctx.day_periods(day)
            .iter()
            .filter_map(|period| self.timetable.get(class_id, &period.id))
            .collect()
    }

    /// Placement indicators for the current timetable.
    pub fn summary(&self) -> TimetableSummary {
        let ctx = SchedulingContext::new(&self.config);
        TimetableSummary::calculate(&ctx, &self.timetable)
    }

    /// Re-checks the timetable invariants and policies.
    pub fn audit(&self) -> Vec<Violation> {
        let ctx = SchedulingContext::new(&self.config);
        audit_timetable(&ctx, &self.timetable)
    }
}

/// Generator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// No generation run in flight.
    Idle,
    /// A generation run holds the engine.
    Generating,
}

/// Thread-safe engine: one mutation at a time, one generation run at most.
#[derive(Debug)]
pub struct SharedTimetableEngine {
    inner: Mutex<TimetableEngine>,
    generating: AtomicBool,
}

/// Returns the state to idle when the run ends, however it ends.
struct GeneratingGuard<'a>(&'a AtomicBool);

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SharedTimetableEngine {
    /// Wraps an engine.
    pub fn new(engine: TimetableEngine) -> Self {
        Self {
            inner: Mutex::new(engine),
            generating: AtomicBool::new(false),
        }
    }

    /// Whether a generation run is in flight.
    pub fn state(&self) -> GeneratorState {
        if self.generating.load(Ordering::Acquire) {
            GeneratorState::Generating
        } else {
            GeneratorState::Idle
        }
    }

    /// Runs a generation, or rejects it while another is in flight.
    pub fn generate(&self, options: GeneratorOptions) -> SchedulingResult<GenerationReport> {
        if self
            .generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SchedulingError::GenerationInProgress);
        }
        let _guard = GeneratingGuard(&self.generating);
        Ok(self.inner.lock().generate(options))
    }

    /// Places one booking under the lock.
    pub fn assign(
        &self,
        class_id: &str,
        period_id: &str,
        booking: impl Into<Booking>,
    ) -> SchedulingResult<Vec<Assignment>> {
        self.inner.lock().assign(class_id, period_id, booking)
    }

    /// Runs a fully specified assignment command under the lock.
    pub fn assign_with(&self, command: &AssignCommand) -> SchedulingResult<Vec<Assignment>> {
        self.inner.lock().assign_with(command)
    }

    /// Removes the booking covering a cell under the lock.
    pub fn unassign(&self, class_id: &str, period_id: &str) -> Vec<Assignment> {
        self.inner.lock().unassign(class_id, period_id)
    }

    /// Removes every booking under the lock.
    pub fn clear(&self) -> usize {
        self.inner.lock().clear()
    }

    /// Runs any command. `Generate` goes through the in-flight check.
    pub fn execute(&self, command: &Command) -> SchedulingResult<CommandOutcome> {
        match command {
            Command::Generate(options) => self.generate(*options).map(CommandOutcome::Generated),
            other => self.inner.lock().execute(other),
        }
    }

    /// Copy of the current timetable.
    pub fn snapshot(&self) -> Timetable {
        self.inner.lock().timetable().clone()
    }

    /// Placement indicators for the current timetable.
    pub fn summary(&self) -> TimetableSummary {
        self.inner.lock().summary()
    }

    /// Re-checks the current timetable.
    pub fn audit(&self) -> Vec<Violation> {
        self.inner.lock().audit()
    }

    /// Unwraps the engine.
    pub fn into_inner(self) -> TimetableEngine {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_of_day::hm;
    use crate::models::{Break, ClassGroup, Constraint, Specialist, WeekTemplate};
    use crate::validation::ValidationErrorKind;
    use std::sync::Arc;
    use std::thread;

    fn config() -> SchedulingConfig {
        SchedulingConfig::from_template(&WeekTemplate::standard())
            .with_break(Break::new("recess", "Recess", hm(10, 30), hm(11, 0)))
            .with_specialist(Specialist::new("pe", "PE", 60))
            .with_specialist(Specialist::new("art", "Art", 30))
            .with_class(ClassGroup::new("pa", "PrepA"))
            .with_class(ClassGroup::new("3a", "Year 3A"))
            .with_constraint(Constraint::avoid("c1", "Prep", hm(8, 30), hm(10, 30)))
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = config().with_class(ClassGroup::new("3a", "Year 3B"));
        match TimetableEngine::new(config) {
            Err(SchedulingError::InvalidConfig(errors)) => {
                assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::DuplicateId));
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_adopted_timetable_checked() {
        let config = config();
        let mut source = TimetableEngine::new(config.clone()).unwrap();
        source.assign("3a", "mon-0830", "pe").unwrap();
        // Inside Prep's avoid window, only possible with checks off
        source
            .assign_with(
                &AssignCommand::new("pa", "mon-0830", "art")
                    .with_options(crate::commands::AssignOptions::permissive()),
            )
            .unwrap();
        let saved = source.into_timetable();

        let adopted = TimetableEngine::with_timetable(config.clone(), saved.clone()).unwrap();
        assert_eq!(adopted.timetable(), &saved);
        assert_eq!(adopted.audit().len(), 1);

        // Drop the second PE record, as a hand-edited file might
        let mut value = serde_json::to_value(&saved).unwrap();
        value["3a"].as_object_mut().unwrap().remove("mon-0900");
        let tampered: Timetable = serde_json::from_value(value).unwrap();
        match TimetableEngine::with_timetable(config, tampered) {
            Err(SchedulingError::InconsistentTimetable(violations)) => {
                assert!(violations.iter().all(|v| v.violation_type.is_structural()));
                assert!(!violations.is_empty());
            }
            other => panic!("expected InconsistentTimetable, got {other:?}"),
        }
    }

    #[test]
    fn test_unassign_empty_is_noop() {
        let mut engine = TimetableEngine::new(config()).unwrap();
        assert!(engine.unassign("3a", "mon-0830").is_empty());
        assert!(engine.timetable().is_empty());
    }

    #[test]
    fn test_generate_around_manual_bookings() {
        let mut engine = TimetableEngine::new(config()).unwrap();
        engine.assign("3a", "mon-0830", "pe").unwrap();
        engine.assign("3a", "mon-1100", "NCT").unwrap();

        let report = engine.generate(GeneratorOptions::seeded(3));
        assert_eq!(report.already_booked, 1);
        assert!(report.is_complete());
        assert_eq!(engine.timetable().get("3a", "mon-0830").unwrap().specialist_id(), Some("pe"));
        assert!(engine.timetable().get("3a", "mon-1100").unwrap().is_nct());
        assert!(engine.audit().is_empty());
    }

    #[test]
    fn test_is_available() {
        let mut engine = TimetableEngine::new(config()).unwrap();
        assert!(engine.is_available("3a", "mon-0930", 2));
        // Second period is recess
        assert!(!engine.is_available("3a", "mon-1000", 2));
        engine.assign("3a", "mon-0900", "art").unwrap();
        assert!(!engine.is_available("3a", "mon-0830", 2));
    }

    #[test]
    fn test_class_day_in_period_order() {
        let mut engine = TimetableEngine::new(config()).unwrap();
        engine.assign("3a", "tue-1100", "art").unwrap();
        engine.assign("3a", "tue-0830", "pe").unwrap();
        engine.assign("3a", "wed-0830", "NCT").unwrap();

        let periods: Vec<&str> = engine
            .class_day("3a", Weekday::Tue)
            .into_iter()
            .map(|r| r.period_id.as_str())
            .collect();
        assert_eq!(periods, vec!["tue-0830", "tue-0900", "tue-1100"]);
        assert!(engine.class_day("3a", Weekday::Mon).is_empty());
    }

    #[test]
    fn test_summary_after_generate() {
        let mut engine = TimetableEngine::new(config()).unwrap();
        engine.generate(GeneratorOptions::seeded(11));
        let summary = engine.summary();
        assert_eq!(summary.eligible_pairs, 4);
        assert_eq!(summary.placed_pairs, 4);
        assert_eq!(summary.booked_periods, 6);
    }

    #[test]
    fn test_shared_rejects_overlapping_generate() {
        let shared = SharedTimetableEngine::new(TimetableEngine::new(config()).unwrap());
        shared.generating.store(true, Ordering::Release);
        assert_eq!(shared.state(), GeneratorState::Generating);
        assert_eq!(
            shared.generate(GeneratorOptions::seeded(1)).unwrap_err(),
            SchedulingError::GenerationInProgress
        );
        assert!(shared.snapshot().is_empty());

        shared.generating.store(false, Ordering::Release);
        assert!(shared.generate(GeneratorOptions::seeded(1)).is_ok());
        assert_eq!(shared.state(), GeneratorState::Idle);
    }

    #[test]
    fn test_shared_concurrent_mutations() {
        let shared = Arc::new(SharedTimetableEngine::new(TimetableEngine::new(config()).unwrap()));
        let handles: Vec<_> = ["mon-1100", "tue-1100", "wed-1100", "thu-1100"]
            .into_iter()
            .map(|period| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || shared.assign("3a", period, "art"))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(shared.snapshot().len(), 4);
        assert!(shared.audit().is_empty());

        assert_eq!(
            shared.execute(&Command::Clear).unwrap(),
            CommandOutcome::Cleared(4)
        );
        assert_eq!(Arc::try_unwrap(shared).unwrap().into_inner().timetable().len(), 0);
    }
}
