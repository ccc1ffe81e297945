use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use talentflow_core::{generate_buckets, Bucket, Granularity, NamedRange, SystemClock};

use crate::common::print_json;

#[derive(Subcommand)]
pub enum BucketAction {
    /// The bucket containing a calendar date
    Of {
        /// ISO date, e.g. 2026-08-25
        date: String,
        #[arg(long, default_value = "week")]
        granularity: Granularity,
    },
    /// All buckets covering a named range, resolved against now
    Range {
        /// last7days | last30days | last90days | lastyear | ytd | alltime
        range: NamedRange,
        #[arg(long, default_value = "week")]
        granularity: Granularity,
    },
}

pub fn run(action: BucketAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BucketAction::Of { date, granularity } => {
            let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| format!("invalid date '{}': {}", date, e))?;
            let instant = day
                .and_hms_opt(0, 0, 0)
                .ok_or("invalid date")?
                .and_utc();
            let bucket = Bucket::containing(instant, granularity);
            print_json(&json!({
                "label": bucket.label(),
                "start": bucket.start,
                "end": bucket.end,
            }))
        }
        BucketAction::Range { range, granularity } => {
            let (start, end) = range.date_range(&SystemClock);
            let buckets: Vec<_> = generate_buckets(start, end, granularity)
                .into_iter()
                .map(|b| {
                    json!({
                        "label": b.label(),
                        "start": b.start,
                        "end": b.end,
                    })
                })
                .collect();
            print_json(&buckets)
        }
    }
}
