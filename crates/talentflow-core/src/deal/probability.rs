//! Heuristic deal-close probability model.
//!
//! Additive blend over the stage base rate: candidate composite score,
//! momentum bonus, roster fit, activity history, staleness penalty. Each
//! term is additive (not multiplicative) so its marginal contribution is
//! auditable and independently tunable, and every coefficient lives in
//! [`ProbabilityConfig`] rather than in the code.

use serde::{Deserialize, Serialize};

use super::DealStage;
use crate::error::ValidationError;
use crate::storage::{LatestScore, RosterFit};

/// Hand-tuned coefficients of the probability model.
///
/// These are fixed heuristics, not learned weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityConfig {
    /// Multiplier on `(composite_score - 0.5)`
    pub composite_weight: f64,
    /// Flat bonus when the momentum sub-score clears the threshold
    pub momentum_bonus: f64,
    /// Momentum sub-score (0-1) above which the bonus applies
    pub momentum_threshold: f64,
    /// Multiplier on `(composite_fit - 0.5)` for roster-linked deals
    pub fit_weight: f64,
    /// Bonus per countable activity event
    pub per_event_bonus: f64,
    /// Cap on the total activity bonus
    pub event_bonus_cap: f64,
    /// Days without update before the staleness penalty starts
    pub stale_after_days: i64,
    /// Divisor turning excess stale days into a penalty
    pub staleness_divisor: f64,
    /// Cap on the staleness penalty
    pub staleness_cap: f64,
}

impl ProbabilityConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let non_negative = [
            ("composite_weight", self.composite_weight),
            ("momentum_bonus", self.momentum_bonus),
            ("fit_weight", self.fit_weight),
            ("per_event_bonus", self.per_event_bonus),
            ("event_bonus_cap", self.event_bonus_cap),
            ("staleness_cap", self.staleness_cap),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: name.to_string(),
                    message: format!("must be non-negative, got {}", value),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.momentum_threshold) {
            return Err(ValidationError::InvalidValue {
                field: "momentum_threshold".to_string(),
                message: format!("must be in [0.0, 1.0], got {}", self.momentum_threshold),
            });
        }
        if self.staleness_divisor <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "staleness_divisor".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            composite_weight: 0.1,
            momentum_bonus: 0.05,
            momentum_threshold: 0.7,
            fit_weight: 0.08,
            per_event_bonus: 0.02,
            event_bonus_cap: 0.10,
            stale_after_days: 30,
            staleness_divisor: 100.0,
            staleness_cap: 0.15,
        }
    }
}

/// Inputs gathered from collaborators for one probability computation.
///
/// A deal with no linked roster carries no fit; a deal with no score record
/// carries no composite -- the corresponding terms are simply skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbabilityContext {
    pub latest_score: Option<LatestScore>,
    pub roster_fit: Option<RosterFit>,
    pub countable_events: usize,
    pub days_since_update: i64,
}

/// Compute a deal-close probability in `[0, 1]`, rounded to 3 decimals.
///
/// Deterministic given the same stage, context and config; collaborator
/// failures degrade to a context with the missing parts set to `None`,
/// never to an undefined probability.
pub fn compute_probability(
    stage: DealStage,
    ctx: &ProbabilityContext,
    config: &ProbabilityConfig,
) -> f64 {
    let mut p = stage.base_probability();

    if let Some(score) = &ctx.latest_score {
        p += (score.composite_score - 0.5) * config.composite_weight;
        if score.momentum_score > config.momentum_threshold {
            p += config.momentum_bonus;
        }
    }

    if let Some(fit) = &ctx.roster_fit {
        p += (fit.composite_fit - 0.5) * config.fit_weight;
    }

    if ctx.countable_events > 0 {
        let activity = ctx.countable_events as f64 * config.per_event_bonus;
        p += activity.min(config.event_bonus_cap);
    }

    if ctx.days_since_update > config.stale_after_days {
        let excess = (ctx.days_since_update - config.stale_after_days) as f64;
        p -= (excess / config.staleness_divisor).min(config.staleness_cap);
    }

    (p.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}
