//! `HH:MM` time-of-day serialization.
//!
//! Configuration files written by the timetable UI carry times as
//! `"08:30"`. Seconds are accepted on input (`"08:30:00"`) but never
//! emitted.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%H:%M";
const FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, FORMAT_WITH_SECONDS))
}

/// Builds a time of day from hour and minute.
///
/// Out-of-range input clamps to midnight. Crate-internal, for known
/// constants only; callers outside the crate use [`parse`] or chrono.
pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(parse("08:30").unwrap(), hm(8, 30));
        assert_eq!(parse("14:05:00").unwrap(), hm(14, 5));
        assert_eq!(parse(" 09:00 ").unwrap(), hm(9, 0));
        assert!(parse("8.30").is_err());
        assert!(parse("25:00").is_err());
    }

    #[test]
    fn test_hm_out_of_range_clamps() {
        assert_eq!(hm(8, 30), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(hm(24, 0), NaiveTime::MIN);
        assert_eq!(hm(9, 60), NaiveTime::MIN);
    }
}
