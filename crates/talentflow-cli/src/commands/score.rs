use clap::Subcommand;
use serde_json::json;
use talentflow_core::{momentum_score, ScoringEngine};

use crate::common::{load_weights, parse_series, parse_sub_score, print_json};

#[derive(Subcommand)]
pub enum ScoreAction {
    /// Momentum score for an ordered per-period series, oldest first
    Momentum {
        /// Comma-separated aggregates, e.g. "40,42,45,50"
        values: String,
    },
    /// Composite score from a momentum score and optional sub-scores
    Composite {
        /// Momentum score on the 0-100 scale
        momentum: u8,
        /// Sub-scores as name:weight:value, e.g. breakout_likelihood:0.5:0.8
        #[arg(value_name = "NAME:WEIGHT:VALUE")]
        sub_scores: Vec<String>,
    },
}

pub fn run(action: ScoreAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScoreAction::Momentum { values } => {
            let series = parse_series(&values)?;
            let weights = load_weights()?;
            let score = momentum_score(&series, &weights.momentum);
            print_json(&json!({
                "values": series,
                "momentum_score": score,
            }))
        }
        ScoreAction::Composite {
            momentum,
            sub_scores,
        } => {
            if momentum > 100 {
                return Err("momentum score must be in [0, 100]".into());
            }
            let subs = sub_scores
                .iter()
                .map(|raw| parse_sub_score(raw))
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;
            let weights = load_weights()?;
            let engine = ScoringEngine::with_config(weights.momentum);
            let composite = engine.composite_score(momentum, &subs);
            print_json(&json!({
                "momentum_score": momentum,
                "sub_scores": subs,
                "composite_score": composite,
            }))
        }
    }
}
