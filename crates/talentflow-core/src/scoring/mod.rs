//! Entity scoring: raw observations to momentum and composite scores.
//!
//! This is the one place raw signal values acquire domain meaning. Irregular
//! observations are aligned into calendar buckets (one aggregate per period,
//! so per-event noise never reaches the momentum formula), then the ordered
//! per-bucket series is reduced to a 0-100 momentum score. A composite score
//! on the 0-1 scale blends momentum with externally supplied sub-scores such
//! as breakout likelihood.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::buckets::{bucket_start, Granularity};
use crate::stats::{momentum_score, weighted_average, MomentumConfig};

/// A single raw signal reading for a tracked entity.
///
/// Ephemeral input to bucketing; owned by the ingestion layer, not stored
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// An externally supplied 0-1 sub-score feeding the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub name: String,
    pub weight: f64,
    pub value: f64,
}

impl SubScore {
    pub fn new(name: impl Into<String>, weight: f64, value: f64) -> Self {
        Self {
            name: name.into(),
            weight: weight.clamp(0.0, 1.0),
            value: value.clamp(0.0, 1.0),
        }
    }
}

/// Reduces observation series to momentum and composite scores.
pub struct ScoringEngine {
    config: MomentumConfig,
    /// Share of the composite carried by the momentum sub-score.
    momentum_weight: f64,
}

impl ScoringEngine {
    /// Engine with default momentum config and an equal-share momentum
    /// weight of 0.5.
    pub fn new() -> Self {
        Self {
            config: MomentumConfig::default(),
            momentum_weight: 0.5,
        }
    }

    /// Engine with a custom momentum config.
    pub fn with_config(config: MomentumConfig) -> Self {
        Self {
            config,
            momentum_weight: 0.5,
        }
    }

    /// Override the composite share of the momentum sub-score.
    pub fn with_momentum_weight(mut self, weight: f64) -> Self {
        self.momentum_weight = weight.clamp(0.0, 1.0);
        self
    }

    pub fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Align observations into buckets and sum values per period.
    ///
    /// Returns `(bucket_start, aggregate)` pairs in chronological order.
    pub fn bucket_series(
        &self,
        observations: &[Observation],
        granularity: Granularity,
    ) -> Vec<(DateTime<Utc>, f64)> {
        let mut totals: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
        for obs in observations {
            *totals
                .entry(bucket_start(obs.timestamp, granularity))
                .or_insert(0.0) += obs.value;
        }
        totals.into_iter().collect()
    }

    /// Momentum score for an observation series at the given granularity.
    ///
    /// Empty input returns 0.
    pub fn momentum_from_observations(
        &self,
        observations: &[Observation],
        granularity: Granularity,
    ) -> u8 {
        let series: Vec<f64> = self
            .bucket_series(observations, granularity)
            .into_iter()
            .map(|(_, total)| total)
            .collect();
        momentum_score(&series, &self.config)
    }

    /// Blend a momentum score with external sub-scores into a 0-1 composite.
    ///
    /// Deterministic; a candidate with no sub-scores gets momentum alone.
    pub fn composite_score(&self, momentum: u8, sub_scores: &[SubScore]) -> f64 {
        let mut values = vec![momentum as f64 / 100.0];
        let mut weights = vec![self.momentum_weight];
        for sub in sub_scores {
            values.push(sub.value);
            weights.push(sub.weight);
        }
        weighted_average(&values, &weights).clamp(0.0, 1.0)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dt(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn obs_at(timestamp: DateTime<Utc>, value: f64) -> Observation {
        Observation {
            entity_id: "artist-1".to_string(),
            timestamp,
            value,
        }
    }

    #[test]
    fn test_bucket_series_sums_per_period() {
        let monday = dt("2026-08-03T09:00:00+00:00");
        let observations = vec![
            obs_at(monday, 10.0),
            obs_at(monday + Duration::days(2), 30.0),
            obs_at(monday + Duration::days(7), 42.0),
        ];

        let engine = ScoringEngine::new();
        let series = engine.bucket_series(&observations, Granularity::Week);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0], (dt("2026-08-03T00:00:00+00:00"), 40.0));
        assert_eq!(series[1], (dt("2026-08-10T00:00:00+00:00"), 42.0));
    }

    #[test]
    fn test_momentum_matches_prebucketed_series() {
        // One observation per week mirrors the [40, 42, 45, 50] scenario
        let monday = dt("2026-07-27T12:00:00+00:00");
        let observations: Vec<Observation> = [40.0, 42.0, 45.0, 50.0]
            .iter()
            .enumerate()
            .map(|(week, &v)| obs_at(monday + Duration::weeks(week as i64), v))
            .collect();

        let engine = ScoringEngine::new();
        let score = engine.momentum_from_observations(&observations, Granularity::Week);
        assert_eq!(score, 67);
    }

    #[test]
    fn test_empty_observations_score_zero() {
        let engine = ScoringEngine::new();
        assert_eq!(
            engine.momentum_from_observations(&[], Granularity::Week),
            0
        );
    }

    #[test]
    fn test_composite_blends_momentum_and_subscores() {
        let engine = ScoringEngine::new();
        // momentum 80 -> 0.8 at weight 0.5, breakout 0.6 at weight 0.5
        let composite =
            engine.composite_score(80, &[SubScore::new("breakout_likelihood", 0.5, 0.6)]);
        assert!((composite - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_composite_without_subscores_is_momentum() {
        let engine = ScoringEngine::new();
        assert!((engine.composite_score(42, &[]) - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_composite_clamped_to_unit_interval() {
        let engine = ScoringEngine::new();
        let composite = engine.composite_score(100, &[SubScore::new("hype", 1.0, 1.0)]);
        assert!(composite <= 1.0);
        assert!(composite >= 0.0);
    }
}
