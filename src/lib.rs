//! Specialist timetable scheduling core.
//!
//! Assigns recurring weekly specialist sessions (Art, PE, Music, ...) to
//! school classes over a fixed grid of weekday periods, honoring breaks,
//! per-specialist year-level eligibility, per-year-level time windows,
//! and contiguous multi-period blocks, without ever double-booking a
//! class.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimePeriod`, `Break`, `Specialist`,
//!   `ClassGroup`, `Constraint`, `Assignment`, `Timetable`,
//!   `SchedulingConfig`
//! - **`availability`**: Run length, break, and conflict checks for a block
//! - **`evaluator`**: Avoid windows (hard) and minimize windows (soft)
//! - **`commands`**: Assign / unassign / generate / clear as validated commands
//! - **`scheduler`**: Randomized greedy generator, summary, and audit
//! - **`engine`**: Owner of config + timetable, with a locked shared variant
//! - **`validation`**: Configuration integrity checks
//!
//! # Architecture
//!
//! Both the manual and the automatic paths go through the same
//! availability and constraint functions. The crate is a pure
//! computation over an in-memory model: no I/O, no persistence, and
//! no logger installation (diagnostics go through the `log` facade).

pub mod availability;
pub mod commands;
pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use engine::{SharedTimetableEngine, TimetableEngine};
pub use error::{SchedulingError, SchedulingResult};
