//! Specialist subjects (Art, PE, Music, ...).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::YearLevel;

/// Specialist identifier.
pub type SpecialistId = String;

/// A recurring weekly specialist session.
///
/// Each eligible class receives one block of `duration_minutes` per week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialist {
    /// Unique specialist identifier. `"NCT"` is reserved.
    pub id: SpecialistId,
    /// Display name.
    pub name: String,
    /// Session length in minutes; a positive multiple of the period length.
    pub duration_minutes: u32,
    /// Display color (e.g. `"#4f46e5"`).
    #[serde(default)]
    pub color: String,
    /// Year levels this specialist may teach. Empty = all year levels.
    #[serde(default)]
    pub eligible_year_levels: BTreeSet<YearLevel>,
}

impl Specialist {
    /// Creates a specialist open to all year levels.
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_minutes,
            color: String::new(),
            eligible_year_levels: BTreeSet::new(),
        }
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Adds an eligible year level.
    pub fn with_year_level(mut self, level: impl Into<YearLevel>) -> Self {
        self.eligible_year_levels.insert(level.into());
        self
    }

    /// Replaces the eligible year levels.
    pub fn with_year_levels<I, L>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<YearLevel>,
    {
        self.eligible_year_levels = levels.into_iter().map(Into::into).collect();
        self
    }

    /// Number of contiguous periods one session occupies.
    ///
    /// `ceil(duration / period_length)`, never less than one.
    pub fn blocks_needed(&self, period_length_minutes: u32) -> usize {
        if period_length_minutes == 0 {
            return 1;
        }
        self.duration_minutes.div_ceil(period_length_minutes).max(1) as usize
    }

    /// Whether the specialist may be booked for a year level.
    pub fn is_eligible(&self, level: &YearLevel) -> bool {
        self.eligible_year_levels.is_empty()
            || self.eligible_year_levels.iter().any(|l| l.matches(level))
    }
}
