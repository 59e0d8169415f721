//! Class groups and year levels.
//!
//! The year level is never stored on a class. It is derived from the
//! class name by convention, so renaming a class moves it between
//! year levels.
//!
//! # Derivation
//!
//! | Class name | Year level |
//! |------------|------------|
//! | `Year 3A` | `Year 3` |
//! | `year 10 blue` | `Year 10` |
//! | `PrepA` | `Prep` |
//! | `Foundation 2` | `Foundation` |
//! | `Grade 4B` | `Grade 4` |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class identifier.
pub type ClassId = String;

/// Named year-level prefixes that absorb any suffix.
const NAMED_LEVELS: [&str; 3] = ["Prep", "Foundation", "Kindergarten"];

/// A school grade grouping (e.g. "Year 3").
///
/// Comparison with [`YearLevel::matches`] ignores ASCII case and
/// surrounding whitespace. Derived `Eq`/`Ord` are exact and only used
/// for set storage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearLevel(String);

impl YearLevel {
    /// Creates a year level from its label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    /// Derives the year level encoded in a class name.
    pub fn from_class_name(name: &str) -> Self {
        let name = name.trim();
        let lower = name.to_ascii_lowercase();

        for level in NAMED_LEVELS {
            if lower.starts_with(&level.to_ascii_lowercase()) {
                return Self(level.to_string());
            }
        }

        if let Some(rest) = lower.strip_prefix("year") {
            let digits: String = rest
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if !digits.is_empty() {
                return Self(format!("Year {digits}"));
            }
        }

        Self(strip_section_suffix(name).to_string())
    }

    /// The year level label.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison.
    pub fn matches(&self, other: &YearLevel) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for YearLevel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for YearLevel {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

/// Drops a single trailing section letter ("Grade 4B" -> "Grade 4").
fn strip_section_suffix(name: &str) -> &str {
    let mut chars = name.char_indices().rev();
    match (chars.next(), chars.next()) {
        (Some((idx, last)), Some((_, prev)))
            if last.is_ascii_alphabetic() && (prev.is_ascii_digit() || prev.is_whitespace()) =>
        {
            name[..idx].trim_end()
        }
        _ => name,
    }
}

/// A class of students that receives specialist sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    /// Unique class identifier.
    pub id: ClassId,
    /// Display name; encodes the year level.
    pub name: String,
}

impl ClassGroup {
    /// Creates a new class group.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The year level derived from the class name.
    pub fn year_level(&self) -> YearLevel {
        YearLevel::from_class_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_level_from_year_names() {
        assert_eq!(YearLevel::from_class_name("Year 3A").as_str(), "Year 3");
        assert_eq!(YearLevel::from_class_name("Year 3B").as_str(), "Year 3");
        assert_eq!(YearLevel::from_class_name("year 10 blue").as_str(), "Year 10");
        assert_eq!(YearLevel::from_class_name("Year5C").as_str(), "Year 5");
    }

    #[test]
    fn test_year_level_from_named_levels() {
        assert_eq!(YearLevel::from_class_name("PrepA").as_str(), "Prep");
        assert_eq!(YearLevel::from_class_name("Prep B").as_str(), "Prep");
        assert_eq!(YearLevel::from_class_name("foundation 2").as_str(), "Foundation");
    }

    #[test]
    fn test_year_level_fallback() {
        assert_eq!(YearLevel::from_class_name("Grade 4B").as_str(), "Grade 4");
        assert_eq!(YearLevel::from_class_name("Kinder B").as_str(), "Kinder");
        assert_eq!(YearLevel::from_class_name("Seniors").as_str(), "Seniors");
        assert_eq!(YearLevel::from_class_name("Year").as_str(), "Year");
        assert_eq!(YearLevel::from_class_name("").as_str(), "");
    }

    #[test]
    fn test_year_level_is_deterministic() {
        let class = ClassGroup::new("3A", "Year 3A");
        assert_eq!(class.year_level(), class.year_level());
        assert_eq!(class.year_level(), YearLevel::new("Year 3"));
    }

    #[test]
    fn test_year_level_matches_ignores_case() {
        let a = YearLevel::new("Year 3");
        let b = YearLevel::new("  year 3 ");
        assert!(a.matches(&b));
        assert!(!a.matches(&YearLevel::new("Year 4")));
    }
}
