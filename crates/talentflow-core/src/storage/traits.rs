//! Store boundary contracts.
//!
//! The deal engine talks to persistence through these traits only; the
//! rusqlite [`Database`](super::Database) is the reference implementation,
//! but an API layer can substitute anything that answers the same lookups.
//! All methods are single request/response -- no retry loops live behind
//! this boundary.

use serde::{Deserialize, Serialize};

use crate::deal::{Deal, DealEvent, DealEventType, DealStage};
use crate::error::DatabaseError;

/// A tracked candidate entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// The latest persisted scoring snapshot for an artist.
///
/// Both values are on the 0-1 scale; `momentum_score` is the momentum
/// sub-score, not the raw 0-100 integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestScore {
    pub composite_score: f64,
    pub momentum_score: f64,
}

/// Compatibility assessment between a candidate and a roster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RosterFit {
    pub composite_fit: f64,
}

/// Candidate/score lookups.
pub trait ArtistStore {
    fn get_by_slug(&self, slug: &str) -> Result<Option<Artist>, DatabaseError>;

    fn get_latest_score(&self, artist_id: &str) -> Result<Option<LatestScore>, DatabaseError>;
}

/// Roster-fit assessment.
pub trait RosterFitAssessor {
    fn assess_fit(
        &self,
        roster_id: &str,
        artist_slug: &str,
    ) -> Result<Option<RosterFit>, DatabaseError>;
}

/// Partial update to a deal record. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealPatch {
    pub stage: Option<DealStage>,
    pub probability: Option<f64>,
    pub last_update: Option<String>,
    pub notes: Option<String>,
}

impl DealPatch {
    /// A patch that only refreshes `last_update` -- the touch operation used
    /// when logging activity.
    pub fn touch(last_update: impl Into<String>) -> Self {
        Self {
            last_update: Some(last_update.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stage.is_none()
            && self.probability.is_none()
            && self.last_update.is_none()
            && self.notes.is_none()
    }
}

/// Input for appending an event to a deal's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDealEvent {
    pub deal_id: String,
    pub event_type: DealEventType,
    pub payload: serde_json::Value,
}

/// Deal persistence.
pub trait DealStore {
    /// Persist a new deal; returns the stored record.
    fn create(&self, deal: &Deal) -> Result<Deal, DatabaseError>;

    /// Apply a patch; returns the refreshed record, or `None` if the deal
    /// does not exist.
    fn update(&self, id: &str, patch: &DealPatch) -> Result<Option<Deal>, DatabaseError>;

    fn get_by_id(&self, id: &str) -> Result<Option<Deal>, DatabaseError>;

    /// Append an immutable event to the deal's history.
    fn append_event(&self, event: &NewDealEvent) -> Result<DealEvent, DatabaseError>;

    /// All events for a deal, oldest first.
    fn list_events(&self, deal_id: &str) -> Result<Vec<DealEvent>, DatabaseError>;
}
