//! Read-only scheduling context.
//!
//! Indexes a [`SchedulingConfig`] once per operation: id lookups for
//! periods, specialists, and classes, and each day's periods in
//! start-time order with every period's position in its day.

use chrono::Weekday;
use std::collections::HashMap;

use crate::models::{
    break_at, Break, ClassGroup, SchedulingConfig, Specialist, TimePeriod,
};

/// Indexed view over a configuration.
#[derive(Debug, Clone)]
pub struct SchedulingContext<'a> {
    config: &'a SchedulingConfig,
    periods: HashMap<&'a str, &'a TimePeriod>,
    days: HashMap<Weekday, Vec<&'a TimePeriod>>,
    positions: HashMap<&'a str, usize>,
    specialists: HashMap<&'a str, &'a Specialist>,
    classes: HashMap<&'a str, &'a ClassGroup>,
}

impl<'a> SchedulingContext<'a> {
    /// Builds the indexes. Duplicate ids resolve to the first entry.
    pub fn new(config: &'a SchedulingConfig) -> Self {
        let mut periods = HashMap::with_capacity(config.periods.len());
        let mut days: HashMap<Weekday, Vec<&'a TimePeriod>> = HashMap::new();
        for period in &config.periods {
            if periods.contains_key(period.id.as_str()) {
                continue;
            }
            periods.insert(period.id.as_str(), period);
            days.entry(period.day).or_default().push(period);
        }

        let mut positions = HashMap::with_capacity(periods.len());
        for day_periods in days.values_mut() {
            day_periods.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
            for (idx, period) in day_periods.iter().enumerate() {
                positions.insert(period.id.as_str(), idx);
            }
        }

        let mut specialists = HashMap::with_capacity(config.specialists.len());
        for specialist in &config.specialists {
            specialists.entry(specialist.id.as_str()).or_insert(specialist);
        }

        let mut classes = HashMap::with_capacity(config.classes.len());
        for class in &config.classes {
            classes.entry(class.id.as_str()).or_insert(class);
        }

        Self {
            config,
            periods,
            days,
            positions,
            specialists,
            classes,
        }
    }

    /// The underlying configuration.
    #[inline]
    pub fn config(&self) -> &'a SchedulingConfig {
        self.config
    }

    /// Looks up a period.
    pub fn period(&self, id: &str) -> Option<&'a TimePeriod> {
        self.periods.get(id).copied()
    }

    /// Looks up a specialist.
    pub fn specialist(&self, id: &str) -> Option<&'a Specialist> {
        self.specialists.get(id).copied()
    }

    /// Looks up a class.
    pub fn class(&self, id: &str) -> Option<&'a ClassGroup> {
        self.classes.get(id).copied()
    }

    /// A day's periods sorted by start time.
    pub fn day_periods(&self, day: Weekday) -> &[&'a TimePeriod] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Index of a period within its day.
    pub fn position(&self, period_id: &str) -> Option<usize> {
        self.positions.get(period_id).copied()
    }

    /// Up to `len` consecutive same-day periods starting at `period_id`.
    ///
    /// Shorter than `len` when the day runs out; `None` if the period is unknown.
    pub fn run_from(&self, period_id: &str, len: usize) -> Option<&[&'a TimePeriod]> {
        let period = self.period(period_id)?;
        let start = self.position(period_id)?;
        let day = self.day_periods(period.day);
        let end = (start + len).min(day.len());
        Some(&day[start..end])
    }

    /// Configured breaks.
    #[inline]
    pub fn breaks(&self) -> &'a [Break] {
        &self.config.breaks
    }

    /// The break covering a period's start, if any.
    pub fn break_at(&self, period: &TimePeriod) -> Option<&'a Break> {
        break_at(period, &self.config.breaks)
    }

    /// Period length in minutes.
    #[inline]
    pub fn period_length(&self) -> u32 {
        self.config.period_length_minutes
    }

    /// Block size of one session of a specialist.
    #[inline]
    pub fn blocks_needed(&self, specialist: &Specialist) -> usize {
        specialist.blocks_needed(self.period_length())
    }
}
