//! Shared helpers for command handlers.

use std::error::Error;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use talentflow_core::storage::data_dir;
use talentflow_core::{MomentumConfig, ProbabilityConfig, SubScore};

/// On-disk weight overrides for the scoring and probability models.
///
/// Lives at `<data_dir>/weights.toml`; absent sections fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightsFile {
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default)]
    pub probability: ProbabilityConfig,
}

pub fn weights_path() -> Result<PathBuf, Box<dyn Error>> {
    Ok(data_dir()?.join("weights.toml"))
}

/// Load weight overrides, validating before use. Missing file means
/// defaults.
pub fn load_weights() -> Result<WeightsFile, Box<dyn Error>> {
    let path = weights_path()?;
    if !path.exists() {
        return Ok(WeightsFile::default());
    }
    log::debug!("loading weight overrides from {}", path.display());
    let raw = std::fs::read_to_string(&path)?;
    let weights: WeightsFile = toml::from_str(&raw)?;
    weights.momentum.validate()?;
    weights.probability.validate()?;
    Ok(weights)
}

/// Parse a comma-separated series like `40,42,45,50`.
pub fn parse_series(raw: &str) -> Result<Vec<f64>, Box<dyn Error>> {
    raw.split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid value '{}': {}", s.trim(), e).into())
        })
        .collect()
}

/// Parse a `name:weight:value` sub-score argument.
pub fn parse_sub_score(raw: &str) -> Result<SubScore, Box<dyn Error>> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [name, weight, value] = parts.as_slice() else {
        return Err(format!("expected name:weight:value, got '{}'", raw).into());
    };
    Ok(SubScore::new(
        *name,
        weight.parse::<f64>()?,
        value.parse::<f64>()?,
    ))
}

pub fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
