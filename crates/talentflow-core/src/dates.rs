//! Day-granularity date helpers for the deal pipeline.
//!
//! Operates on ISO `%Y-%m-%d` strings because that is the interchange format
//! with the persistence layer; deliberately not unified with the
//! [`buckets`](crate::buckets) module, which works on `DateTime<Utc>` at
//! multiple granularities. Deal math only ever needs single-day resolution.

use chrono::{Datelike, Duration, NaiveDate};

use crate::clock::Clock;
use crate::error::ValidationError;

const ISO_DAY: &str = "%Y-%m-%d";

fn parse_iso(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, ISO_DAY).map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

/// Today as an ISO date string, per the injected clock.
pub fn today(clock: &dyn Clock) -> String {
    clock.now().date_naive().format(ISO_DAY).to_string()
}

/// The date `n` days before today.
pub fn days_ago(clock: &dyn Clock, n: i64) -> String {
    (clock.now().date_naive() - Duration::days(n))
        .format(ISO_DAY)
        .to_string()
}

/// The date `n` days after today.
pub fn days_from_now(clock: &dyn Clock, n: i64) -> String {
    (clock.now().date_naive() + Duration::days(n))
        .format(ISO_DAY)
        .to_string()
}

/// Whole days from `a` to `b`; direction-sensitive, so a past `a` and a
/// future `b` give a positive count.
pub fn days_between(a: &str, b: &str) -> Result<i64, ValidationError> {
    let from = parse_iso(a)?;
    let to = parse_iso(b)?;
    Ok((to - from).num_days())
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: &str) -> Result<String, ValidationError> {
    let d = parse_iso(date)?;
    let back = d.weekday().num_days_from_monday() as i64;
    Ok((d - Duration::days(back)).format(ISO_DAY).to_string())
}

/// First day of the month containing `date`.
pub fn start_of_month(date: &str) -> Result<String, ValidationError> {
    let d = parse_iso(date)?;
    Ok(NaiveDate::from_ymd_opt(d.year(), d.month(), 1)
        .expect("first of month")
        .format(ISO_DAY)
        .to_string())
}

/// First day of the quarter containing `date`.
pub fn start_of_quarter(date: &str) -> Result<String, ValidationError> {
    let d = parse_iso(date)?;
    let quarter_month = d.month0() / 3 * 3 + 1;
    Ok(NaiveDate::from_ymd_opt(d.year(), quarter_month, 1)
        .expect("first of quarter")
        .format(ISO_DAY)
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_today_and_offsets() {
        let clock = FixedClock::at("2026-08-25T12:00:00+00:00");
        assert_eq!(today(&clock), "2026-08-25");
        assert_eq!(days_ago(&clock, 10), "2026-08-15");
        assert_eq!(days_from_now(&clock, 7), "2026-09-01");
    }

    #[test]
    fn test_days_between_direction_sensitive() {
        assert_eq!(days_between("2026-08-01", "2026-08-25").unwrap(), 24);
        assert_eq!(days_between("2026-08-25", "2026-08-01").unwrap(), -24);
        assert_eq!(days_between("2026-08-25", "2026-08-25").unwrap(), 0);
    }

    #[test]
    fn test_days_between_across_month_boundary() {
        assert_eq!(days_between("2026-07-30", "2026-08-02").unwrap(), 3);
    }

    #[test]
    fn test_invalid_date_is_error() {
        assert!(days_between("not-a-date", "2026-08-25").is_err());
        assert!(days_between("2026-08-25", "2026-13-40").is_err());
        assert!(start_of_week("08/25/2026").is_err());
    }

    #[test]
    fn test_start_of_week_monday() {
        // 2026-08-25 is a Tuesday
        assert_eq!(start_of_week("2026-08-25").unwrap(), "2026-08-24");
        // Sunday rolls back to the previous Monday
        assert_eq!(start_of_week("2026-08-23").unwrap(), "2026-08-17");
        // Monday is its own week start
        assert_eq!(start_of_week("2026-08-24").unwrap(), "2026-08-24");
    }

    #[test]
    fn test_start_of_month_and_quarter() {
        assert_eq!(start_of_month("2026-08-25").unwrap(), "2026-08-01");
        assert_eq!(start_of_quarter("2026-08-25").unwrap(), "2026-07-01");
        assert_eq!(start_of_quarter("2026-12-31").unwrap(), "2026-10-01");
        assert_eq!(start_of_quarter("2026-01-15").unwrap(), "2026-01-01");
    }
}
