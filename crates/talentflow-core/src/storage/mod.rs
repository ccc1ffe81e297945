pub mod database;
pub mod traits;

pub use database::Database;
pub use traits::{
    Artist, ArtistStore, DealPatch, DealStore, LatestScore, NewDealEvent, RosterFit,
    RosterFitAssessor,
};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/talentflow[-dev]/` based on TALENTFLOW_ENV.
///
/// Set TALENTFLOW_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TALENTFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("talentflow-dev")
    } else {
        base_dir.join("talentflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
