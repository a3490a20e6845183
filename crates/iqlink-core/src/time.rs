//! Compact wire date/time representation.
//!
//! The feed protocol and the downstream record formats carry dates as
//! `yyyymmdd` and times as `HHmmss` integers. These helpers convert
//! between those forms and `chrono` values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Convert a date to compact `yyyymmdd` form.
pub fn compact_date(date: NaiveDate) -> u32 {
    use chrono::Datelike;
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

/// Convert a time of day to compact `HHmmss` form.
pub fn compact_time(time: NaiveTime) -> u32 {
    time.hour() * 10_000 + time.minute() * 100 + time.second()
}

/// Rebuild a timestamp from its compact date and time parts.
///
/// Returns `None` when either part does not denote a real calendar value.
pub fn from_compact(date: u32, time: u32) -> Option<NaiveDateTime> {
    let d = NaiveDate::from_ymd_opt(
        (date / 10_000) as i32,
        date / 100 % 100,
        date % 100,
    )?;
    let t = NaiveTime::from_hms_opt(time / 10_000, time / 100 % 100, time % 100)?;
    Some(NaiveDateTime::new(d, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_date() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(compact_date(d), 20240109);
    }

    #[test]
    fn test_compact_time() {
        let t = NaiveTime::from_hms_opt(9, 30, 5).unwrap();
        assert_eq!(compact_time(t), 93005);
        let t = NaiveTime::from_hms_opt(15, 59, 59).unwrap();
        assert_eq!(compact_time(t), 155959);
    }

    #[test]
    fn test_round_trip() {
        let dt = from_compact(20241231, 235959).unwrap();
        assert_eq!(compact_date(dt.date()), 20241231);
        assert_eq!(compact_time(dt.time()), 235959);
    }

    #[test]
    fn test_from_compact_rejects_bad_values() {
        assert!(from_compact(20240230, 0).is_none()); // Feb 30
        assert!(from_compact(20240101, 246060).is_none());
    }
}
