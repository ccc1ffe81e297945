//! Statistical primitives for momentum scoring.
//!
//! Pure, stateless numeric functions. Degenerate input (empty series, zero
//! ranges, zero denominators) returns a defined neutral value rather than
//! failing, because score callers must always receive a number. The one
//! exception is mismatched paired-input lengths, which is a contract
//! violation and surfaces as [`StatsError::LengthMismatch`](crate::error::StatsError).

mod momentum;
mod regression;
mod similarity;

pub use momentum::{momentum_score, MomentumConfig};
pub use regression::{linear_regression, Regression};
pub use similarity::{cosine_similarity, jaccard_similarity};

/// Default smoothing factor for [`exponential_moving_average`].
pub const DEFAULT_EMA_ALPHA: f64 = 0.3;

/// Clamp `(value - min) / (max - min)` to `[0, 1]`.
///
/// Returns 0 when `max <= min` (no range to normalize against).
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Weighted average of `values` with the given `weights`.
///
/// Returns 0 for empty input, mismatched lengths, or zero total weight.
/// Length mismatch is tolerated here (unlike the similarity functions)
/// because callers build both slices from the same config struct.
pub fn weighted_average(values: &[f64], weights: &[f64]) -> f64 {
    if values.is_empty() || values.len() != weights.len() {
        return 0.0;
    }
    let total_weight: f64 = weights.iter().sum();
    if total_weight == 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    weighted_sum / total_weight
}

/// Population standard deviation.
///
/// Returns 0 for empty input.
pub fn std_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Exponential moving average with smoothing factor `alpha`.
///
/// Seeds with the first value, then folds forward
/// `ema = alpha * v + (1 - alpha) * ema`. Returns 0 for empty input and the
/// single value for length-1 input.
pub fn exponential_moving_average(values: &[f64], alpha: f64) -> f64 {
    let Some((first, rest)) = values.split_first() else {
        return 0.0;
    };
    rest.iter().fold(*first, |ema, v| alpha * v + (1.0 - alpha) * ema)
}

/// Relative growth from `old` to `new`: `(new - old) / old`.
///
/// When `old == 0` the ratio is undefined; "grew from nothing" maps to 1
/// if `new > 0`, otherwise 0.
pub fn growth_rate(old: f64, new: f64) -> f64 {
    if old == 0.0 {
        return if new > 0.0 { 1.0 } else { 0.0 };
    }
    (new - old) / old
}
