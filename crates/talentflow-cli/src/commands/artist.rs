use chrono::Utc;
use clap::Subcommand;
use serde_json::json;
use talentflow_core::storage::{LatestScore, RosterFit};
use talentflow_core::{Database, Granularity, Observation, ScoringEngine};

use crate::common::{load_weights, parse_sub_score, print_json};

#[derive(Subcommand)]
pub enum ArtistAction {
    /// Register (or rename) an artist
    Add { slug: String, name: String },
    /// Score an artist from a per-period series and persist the snapshot
    Score {
        slug: String,
        /// Comma-separated per-period aggregates, oldest first
        values: String,
        #[arg(long, default_value = "week")]
        granularity: Granularity,
        /// Sub-scores as name:weight:value blended into the composite
        #[arg(long, value_name = "NAME:WEIGHT:VALUE")]
        sub: Vec<String>,
    },
    /// Record how well an artist fits a roster
    Fit {
        roster: String,
        slug: String,
        /// Composite fit on the 0-1 scale
        fit: f64,
    },
}

pub fn run(action: ArtistAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ArtistAction::Add { slug, name } => {
            let artist = db.upsert_artist(&slug, &name)?;
            print_json(&artist)
        }
        ArtistAction::Score {
            slug,
            values,
            granularity,
            sub,
        } => {
            let artist = db.upsert_artist(&slug, &slug)?;
            let weights = load_weights()?;
            let engine = ScoringEngine::with_config(weights.momentum);

            // Synthesize one observation per period ending now
            let series = crate::common::parse_series(&values)?;
            let now = Utc::now();
            let observations: Vec<Observation> = series
                .iter()
                .rev()
                .enumerate()
                .map(|(back, &value)| Observation {
                    entity_id: slug.clone(),
                    timestamp: now - period_span(granularity) * back as i32,
                    value,
                })
                .collect();

            let momentum = engine.momentum_from_observations(&observations, granularity);
            let subs = sub
                .iter()
                .map(|raw| parse_sub_score(raw))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;
            let composite = engine.composite_score(momentum, &subs);

            let score = LatestScore {
                composite_score: composite,
                momentum_score: momentum as f64 / 100.0,
            };
            db.record_score(&artist.id, &score, now)?;
            print_json(&json!({
                "artist": artist,
                "momentum_score": momentum,
                "composite_score": composite,
            }))
        }
        ArtistAction::Fit { roster, slug, fit } => {
            if !(0.0..=1.0).contains(&fit) {
                return Err("fit must be in [0.0, 1.0]".into());
            }
            db.set_roster_fit(&roster, &slug, &RosterFit { composite_fit: fit })?;
            print_json(&json!({"roster_id": roster, "artist_slug": slug, "composite_fit": fit}))
        }
    }
}

fn period_span(granularity: Granularity) -> chrono::Duration {
    match granularity {
        Granularity::Day => chrono::Duration::days(1),
        Granularity::Week => chrono::Duration::weeks(1),
        Granularity::Month => chrono::Duration::days(31),
        Granularity::Quarter => chrono::Duration::days(92),
        Granularity::Year => chrono::Duration::days(366),
    }
}
