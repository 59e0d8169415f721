//! Automatic timetable generation, summary metrics, and audit.
//!
//! # Algorithm
//!
//! [`Generator`] is a randomized, single-pass greedy placer: longest
//! specialists first, shuffled classes, shuffled start periods, first
//! fit. It is not optimal and may leave pairs unplaced; every skipped
//! pair is returned in the [`GenerationReport`].
//!
//! # Summary
//!
//! [`TimetableSummary`] reports booked cells, placement rate, and how
//! many blocks landed in minimize windows.
//!
//! # Audit
//!
//! [`audit_timetable`] re-checks every timetable invariant and policy
//! rule, returning the violations found.

mod audit;
mod generator;
mod summary;

pub use audit::{audit_timetable, Violation, ViolationType};
pub use generator::{generate_timetable, GenerationReport, Generator, GeneratorOptions, UnplacedPair};
pub use summary::TimetableSummary;
