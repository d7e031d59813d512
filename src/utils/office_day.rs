//! Office calendar helpers.
//!
//! Every attendance row is keyed by the calendar day as observed at the office
//! (Asia/Dhaka, a fixed UTC+6 with no daylight saving). The serving host may run
//! in any timezone, so "today" and month windows are always derived here and
//! never from the host-local clock.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;

/// Seconds east of UTC for the office timezone (Asia/Dhaka).
pub const OFFICE_UTC_OFFSET_SECS: i32 = 6 * 60 * 60;

static OFFICE_TZ: Lazy<FixedOffset> = Lazy::new(|| {
    FixedOffset::east_opt(OFFICE_UTC_OFFSET_SECS).expect("office offset is within +/-24h")
});

/// The fixed office timezone.
pub fn office_tz() -> FixedOffset {
    *OFFICE_TZ
}

/// Maps an instant to the office calendar day it falls on.
pub fn normalize_to_office_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&office_tz()).date_naive()
}

/// Current office day.
pub fn office_today() -> NaiveDate {
    normalize_to_office_day(Utc::now())
}

/// The storage representation of an office day: UTC midnight of that date.
pub fn day_boundary(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Half-open `[start, end)` window covering one calendar month.
///
/// `end` is the first day of the following month, so callers never need to
/// know how many days the month has. Returns `None` for a month outside 1..=12
/// or a year chrono cannot represent.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

/// `(year, month)` of the office day containing `instant`.
pub fn office_year_month(instant: DateTime<Utc>) -> (i32, u32) {
    let day = normalize_to_office_day(instant);
    (day.year(), day.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn late_utc_evening_rolls_into_next_office_day() {
        let day = normalize_to_office_day(utc(2024, 3, 1, 23, 30));
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn utc_morning_stays_on_same_office_day() {
        let day = normalize_to_office_day(utc(2024, 3, 1, 17, 59));
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let day = normalize_to_office_day(utc(2024, 3, 1, 18, 0));
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn day_boundary_is_utc_midnight() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(day_boundary(day), utc(2024, 3, 2, 0, 0));
    }

    #[test]
    fn february_bounds_ignore_leap_day_count() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let (start, end) = month_bounds(2023, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
    }

    #[test]
    fn december_bounds_roll_into_next_year() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn invalid_month_has_no_bounds() {
        assert!(month_bounds(2024, 0).is_none());
        assert!(month_bounds(2024, 13).is_none());
    }

    #[test]
    fn year_month_follows_office_day() {
        assert_eq!(office_year_month(utc(2024, 1, 31, 19, 0)), (2024, 2));
        assert_eq!(office_year_month(utc(2024, 12, 31, 18, 0)), (2025, 1));
        assert_eq!(office_year_month(utc(2024, 12, 31, 17, 0)), (2024, 12));
    }
}
