//! Time bucketing for trend analysis.
//!
//! Turns irregular timestamped observations into aligned calendar periods
//! (day/week/month/quarter/year). Weeks start on Monday. Buckets are derived
//! on demand, never stored.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Calendar alignment for a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "quarter" => Ok(Granularity::Quarter),
            "year" => Ok(Granularity::Year),
            other => Err(format!(
                "unknown granularity '{}': expected day|week|month|quarter|year",
                other
            )),
        }
    }
}

/// An aligned time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

impl Bucket {
    /// The bucket containing `date` at the given granularity.
    pub fn containing(date: DateTime<Utc>, granularity: Granularity) -> Self {
        Self {
            start: bucket_start(date, granularity),
            end: bucket_end(date, granularity),
            granularity,
        }
    }

    /// Display label: `2026-08-25`, `2026-W35`, `2026-08`, `2026-Q3`, `2026`.
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Day => self.start.format("%Y-%m-%d").to_string(),
            Granularity::Week => self.start.format("%G-W%V").to_string(),
            Granularity::Month => self.start.format("%Y-%m").to_string(),
            Granularity::Quarter => {
                format!("{}-Q{}", self.start.year(), self.start.month0() / 3 + 1)
            }
            Granularity::Year => self.start.format("%Y").to_string(),
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight exists for every calendar date")
        .and_utc()
}

/// Start of the bucket containing `date`.
///
/// Day buckets are midnight-aligned; week buckets align to Monday (Sunday
/// belongs to the previous week); month/quarter/year align to calendar
/// boundaries.
pub fn bucket_start(date: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
    let day = date.date_naive();
    match granularity {
        Granularity::Day => midnight(day),
        Granularity::Week => {
            let back = day.weekday().num_days_from_monday() as i64;
            midnight(day - Duration::days(back))
        }
        Granularity::Month => {
            midnight(NaiveDate::from_ymd_opt(day.year(), day.month(), 1).expect("first of month"))
        }
        Granularity::Quarter => {
            let quarter_month = day.month0() / 3 * 3 + 1;
            midnight(
                NaiveDate::from_ymd_opt(day.year(), quarter_month, 1).expect("first of quarter"),
            )
        }
        Granularity::Year => {
            midnight(NaiveDate::from_ymd_opt(day.year(), 1, 1).expect("first of year"))
        }
    }
}

/// End of the bucket containing `date`: the next bucket start minus 1 ms.
pub fn bucket_end(date: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
    next_bucket_start(bucket_start(date, granularity), granularity) - Duration::milliseconds(1)
}

fn next_bucket_start(start: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
    match granularity {
        Granularity::Day => start + Duration::days(1),
        Granularity::Week => start + Duration::days(7),
        Granularity::Month => start + Months::new(1),
        Granularity::Quarter => start + Months::new(3),
        Granularity::Year => start + Months::new(12),
    }
}

/// The ordered, finite sequence of buckets spanning `[start, end]`.
///
/// Walks inclusively from `bucket_start(start)` to `bucket_start(end)`; a
/// plain Vec, safe to re-traverse. Empty when `end` precedes `start`'s
/// bucket.
pub fn generate_buckets(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut cursor = bucket_start(start, granularity);
    let last = bucket_start(end, granularity);
    while cursor <= last {
        let next = next_bucket_start(cursor, granularity);
        buckets.push(Bucket {
            start: cursor,
            end: next - Duration::milliseconds(1),
            granularity,
        });
        cursor = next;
    }
    buckets
}

/// Convenience ranges resolved against the injected clock at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedRange {
    Last7Days,
    Last30Days,
    Last90Days,
    LastYear,
    YearToDate,
    AllTime,
}

impl NamedRange {
    /// Resolve to a `(start, end)` pair. Not cached; two calls straddling a
    /// period boundary may differ by one bucket, which is acceptable at
    /// bucket-level granularity.
    pub fn date_range(&self, clock: &dyn Clock) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = clock.now();
        let start = match self {
            NamedRange::Last7Days => now - Duration::days(7),
            NamedRange::Last30Days => now - Duration::days(30),
            NamedRange::Last90Days => now - Duration::days(90),
            NamedRange::LastYear => now - Duration::days(365),
            NamedRange::YearToDate => {
                midnight(NaiveDate::from_ymd_opt(now.year(), 1, 1).expect("first of year"))
            }
            NamedRange::AllTime => DateTime::<Utc>::UNIX_EPOCH,
        };
        (start, now)
    }
}

impl FromStr for NamedRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "last7days" => Ok(NamedRange::Last7Days),
            "last30days" => Ok(NamedRange::Last30Days),
            "last90days" => Ok(NamedRange::Last90Days),
            "lastyear" => Ok(NamedRange::LastYear),
            "ytd" => Ok(NamedRange::YearToDate),
            "alltime" => Ok(NamedRange::AllTime),
            other => Err(format!(
                "unknown range '{}': expected last7days|last30days|last90days|lastyear|ytd|alltime",
                other
            )),
        }
    }
}

/// Group timestamps by the start of the bucket that contains them.
///
/// The map is ordered, so iterating yields periods chronologically -- this
/// feeds the momentum score one aggregate per period instead of raw
/// per-event noise.
pub fn group_by_period(
    dates: &[DateTime<Utc>],
    granularity: Granularity,
) -> BTreeMap<DateTime<Utc>, Vec<DateTime<Utc>>> {
    let mut groups: BTreeMap<DateTime<Utc>, Vec<DateTime<Utc>>> = BTreeMap::new();
    for &date in dates {
        groups
            .entry(bucket_start(date, granularity))
            .or_default()
            .push(date);
    }
    groups
}
