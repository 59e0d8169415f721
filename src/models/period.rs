//! Weekly period grid and break windows.
//!
//! A week template is a set of fixed-length periods on school days.
//! Breaks are day-independent time-of-day windows (recess, lunch).
//!
//! # Break Rule
//! A period is break time iff its start falls in `[break.start, break.end)`
//! for some break. Only the period start is tested.

use chrono::{Duration, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::time_of_day;

/// Period identifier.
pub type PeriodId = String;

/// Monday through Friday, in week order.
pub const SCHOOL_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// An atomic scheduling unit on a given weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    /// Unique period identifier.
    pub id: PeriodId,
    /// Day of the week (Monday..Friday).
    pub day: Weekday,
    /// Start time of day (inclusive).
    #[serde(with = "time_of_day")]
    pub start: NaiveTime,
    /// End time of day (exclusive).
    #[serde(with = "time_of_day")]
    pub end: NaiveTime,
}

impl TimePeriod {
    /// Creates a new period.
    pub fn new(id: impl Into<String>, day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: id.into(),
            day,
            start,
            end,
        }
    }

    /// Length of the period in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether the period falls on Monday..Friday.
    #[inline]
    pub fn is_school_day(&self) -> bool {
        SCHOOL_DAYS.contains(&self.day)
    }
}

/// A day-independent window during which no class may be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Break {
    /// Unique break identifier.
    pub id: String,
    /// Display name (e.g. "Recess").
    pub name: String,
    /// Window start (inclusive).
    #[serde(with = "time_of_day")]
    pub start: NaiveTime,
    /// Window end (exclusive).
    #[serde(with = "time_of_day")]
    pub end: NaiveTime,
}

impl Break {
    /// Creates a new break.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
        }
    }

    /// Whether a time of day falls in this break.
    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

/// Returns the first break covering the period's start, if any.
pub fn break_at<'a>(period: &TimePeriod, breaks: &'a [Break]) -> Option<&'a Break> {
    breaks.iter().find(|b| b.contains(period.start))
}

/// Whether the period is break time.
#[inline]
pub fn is_break_time(period: &TimePeriod, breaks: &[Break]) -> bool {
    break_at(period, breaks).is_some()
}

/// Builds the canonical period identifier, e.g. `"mon-0830"`.
pub fn period_id(day: Weekday, start: NaiveTime) -> PeriodId {
    format!(
        "{}-{:02}{:02}",
        day.to_string().to_ascii_lowercase(),
        start.hour(),
        start.minute()
    )
}

/// Generator for a regular weekly period grid.
///
/// Produces back-to-back periods of `period_length_minutes` on each
/// configured day, from `day_start` up to `day_end`. A trailing
/// fragment shorter than one period is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekTemplate {
    /// Days to generate, in order.
    pub days: Vec<Weekday>,
    /// First period start.
    pub day_start: NaiveTime,
    /// Last period end (upper bound).
    pub day_end: NaiveTime,
    /// Period length in minutes.
    pub period_length_minutes: u32,
}

impl WeekTemplate {
    /// Creates a Monday..Friday template with 30-minute periods.
    pub fn new(day_start: NaiveTime, day_end: NaiveTime) -> Self {
        Self {
            days: SCHOOL_DAYS.to_vec(),
            day_start,
            day_end,
            period_length_minutes: super::DEFAULT_PERIOD_LENGTH_MINUTES,
        }
    }

    /// The standard school day: 08:30 to 15:00.
    pub fn standard() -> Self {
        Self::new(time_of_day::hm(8, 30), time_of_day::hm(15, 0))
    }

    /// Restricts the template to the given days.
    pub fn with_days(mut self, days: Vec<Weekday>) -> Self {
        self.days = days;
        self
    }

    /// Sets the period length.
    pub fn with_period_length(mut self, minutes: u32) -> Self {
        self.period_length_minutes = minutes;
        self
    }

    /// Number of periods generated per day.
    pub fn periods_per_day(&self) -> usize {
        self.day_slots().len()
    }

    /// Generates every period, day by day in start-time order.
    pub fn periods(&self) -> Vec<TimePeriod> {
        let slots = self.day_slots();
        self.days
            .iter()
            .flat_map(|&day| {
                slots
                    .iter()
                    .map(move |&(start, end)| TimePeriod::new(period_id(day, start), day, start, end))
            })
            .collect()
    }

    fn day_slots(&self) -> Vec<(NaiveTime, NaiveTime)> {
        let mut slots = Vec::new();
        if self.period_length_minutes == 0 {
            return slots;
        }
        let step = Duration::minutes(i64::from(self.period_length_minutes));
        let mut start = self.day_start;
        while start < self.day_end {
            let (end, wrapped) = start.overflowing_add_signed(step);
            if wrapped != 0 || end > self.day_end {
                break;
            }
            slots.push((start, end));
            start = end;
        }
        slots
    }
}

impl Default for WeekTemplate {
    fn default() -> Self {
        Self::standard()
    }
}
