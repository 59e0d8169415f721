//! Timetable domain models.
//!
//! Pure data types with their validity rules: the weekly period grid,
//! breaks, specialists, classes, year-level policies, and the booking
//! records that make up a timetable.
//!
//! # Domain Mapping
//!
//! | Type | School term |
//! |------|-------------|
//! | `TimePeriod` | One 30-minute timetable slot on a weekday |
//! | `Break` | Recess / lunch |
//! | `Specialist` | Art, PE, Music, Library, ... |
//! | `ClassGroup` | A homeroom class ("Year 3A") |
//! | `Constraint` | "No specialists for Prep before 10:30" |
//! | `Assignment` | One booked cell of the grid |

mod assignment;
mod class_group;
mod config;
mod constraint;
mod period;
mod specialist;
pub mod time_of_day;
mod timetable;

pub use assignment::{Assignment, Booking, NCT};
pub use class_group::{ClassGroup, ClassId, YearLevel};
pub use config::{SchedulingConfig, DEFAULT_PERIOD_LENGTH_MINUTES};
pub use constraint::{Constraint, ConstraintKind, DayScope};
pub use period::{break_at, is_break_time, period_id, Break, PeriodId, TimePeriod, WeekTemplate, SCHOOL_DAYS};
pub use specialist::{Specialist, SpecialistId};
pub use timetable::Timetable;
