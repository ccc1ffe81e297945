//! Ordinary least squares over a single predictor.

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Fitted line plus goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Simple linear regression of `ys` on `xs`.
///
/// Mismatched lengths return [`StatsError::LengthMismatch`]; empty input and
/// a zero-variance predictor are valid data conditions and return the
/// all-zero [`Regression`] rather than NaN.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Result<Regression, StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.is_empty() {
        return Ok(Regression::default());
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let ss_xx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    let ss_xy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    if ss_xx == 0.0 {
        // Vertical data: no usable predictor variance
        return Ok(Regression::default());
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
    let r_squared = if ss_tot == 0.0 {
        // Constant response: the fit explains everything there is to explain
        1.0
    } else {
        let ss_res: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| {
                let predicted = slope * x + intercept;
                (y - predicted).powi(2)
            })
            .sum();
        1.0 - ss_res / ss_tot
    };

    Ok(Regression {
        slope,
        intercept,
        r_squared,
    })
}
