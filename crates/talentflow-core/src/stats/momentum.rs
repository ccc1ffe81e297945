//! Momentum score: a 0-100 measure of recent trajectory.
//!
//! Blends three normalized components of a short per-bucket aggregate series:
//! current level (against twice the baseline), single-step growth (against
//! a ±50% band), and consistency (one minus the coefficient of variation).

use serde::{Deserialize, Serialize};

use super::{growth_rate, normalize, std_deviation, weighted_average};
use crate::error::ValidationError;

/// Weights and baseline for [`momentum_score`].
///
/// The level component implicitly carries weight
/// `1 - growth_weight - consistency_weight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Value considered a "normal" level for the signal; the level component
    /// normalizes the latest value against twice this baseline.
    pub baseline_value: f64,
    /// Weight for the single-step growth component (0.0 to 1.0)
    pub growth_weight: f64,
    /// Weight for the consistency component (0.0 to 1.0)
    pub consistency_weight: f64,
}

impl MomentumConfig {
    /// Implicit weight of the level component.
    pub fn level_weight(&self) -> f64 {
        1.0 - self.growth_weight - self.consistency_weight
    }

    /// Validate that the weights are in range and leave a non-negative
    /// share for the level component.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let weights = [
            ("growth_weight", self.growth_weight),
            ("consistency_weight", self.consistency_weight),
        ];
        for (name, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ValidationError::InvalidValue {
                    field: name.to_string(),
                    message: format!("must be in [0.0, 1.0], got {}", weight),
                });
            }
        }
        if self.level_weight() < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "growth_weight + consistency_weight".to_string(),
                message: "must not exceed 1.0".to_string(),
            });
        }
        if self.baseline_value <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "baseline_value".to_string(),
                message: format!("must be positive, got {}", self.baseline_value),
            });
        }
        Ok(())
    }
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            baseline_value: 50.0,
            growth_weight: 0.4,
            consistency_weight: 0.3,
        }
    }
}

/// Reduce an ordered series of recent per-bucket aggregates to a momentum
/// score in `[0, 100]`.
///
/// Deterministic given the same input and config. Empty input returns 0.
///
/// Components:
/// - level: latest value normalized against `2 * baseline_value`
/// - growth: last single-step growth rate normalized against ±50%
/// - consistency: `1 - CV` where CV is the coefficient of variation,
///   clamped to `[0, 1]`; neutral 0.5 when fewer than 3 points exist
pub fn momentum_score(recent_values: &[f64], config: &MomentumConfig) -> u8 {
    let Some(&current) = recent_values.last() else {
        return 0;
    };

    let level = normalize(current, 0.0, 2.0 * config.baseline_value);

    let growth = if recent_values.len() >= 2 {
        let previous = recent_values[recent_values.len() - 2];
        normalize(growth_rate(previous, current), -0.5, 0.5)
    } else {
        normalize(0.0, -0.5, 0.5)
    };

    let consistency = if recent_values.len() >= 3 {
        let mean = recent_values.iter().sum::<f64>() / recent_values.len() as f64;
        let cv = if mean != 0.0 {
            std_deviation(recent_values) / mean
        } else {
            0.0
        };
        (1.0 - cv.clamp(0.0, 1.0)).clamp(0.0, 1.0)
    } else {
        0.5
    };

    let combined = weighted_average(
        &[level, growth, consistency],
        &[
            config.level_weight(),
            config.growth_weight,
            config.consistency_weight,
        ],
    );

    (combined * 100.0).round().clamp(0.0, 100.0) as u8
}
