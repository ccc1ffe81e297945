//! Deal pipeline: stages, records, events.
//!
//! A deal tracks a business relationship with an artist as it progresses
//! through a fixed forward path toward `signed` or `lost`. Terminal deals
//! are retained for history, never deleted.

mod engine;
mod probability;

pub use engine::{DealEngine, DealOptions};
pub use probability::{compute_probability, ProbabilityConfig, ProbabilityContext};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline stage of a deal.
///
/// Forward path: `none -> light_interest -> serious -> offer_made ->
/// negotiation -> signed`, with `lost` reachable from any non-terminal
/// stage. `signed` and `lost` are terminal; event logging stays possible on
/// terminal deals for audit, but no further stage transitions are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    None,
    LightInterest,
    Serious,
    OfferMade,
    Negotiation,
    Signed,
    Lost,
}

impl DealStage {
    /// Position along the forward path; `Lost` sits off-path at rank 0.
    fn forward_rank(&self) -> u8 {
        match self {
            DealStage::None => 0,
            DealStage::LightInterest => 1,
            DealStage::Serious => 2,
            DealStage::OfferMade => 3,
            DealStage::Negotiation => 4,
            DealStage::Signed => 5,
            DealStage::Lost => 0,
        }
    }

    /// Whether this stage accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DealStage::Signed | DealStage::Lost)
    }

    /// Check if a transition is valid: forward moves only (skipping stages
    /// is allowed), `Lost` from any non-terminal stage, nothing out of a
    /// terminal stage.
    pub fn can_transition_to(&self, to: &DealStage) -> bool {
        if self.is_terminal() || to == self {
            return false;
        }
        if *to == DealStage::Lost {
            return true;
        }
        to.forward_rank() > self.forward_rank()
    }

    /// Base close probability for this stage.
    pub fn base_probability(&self) -> f64 {
        match self {
            DealStage::None => 0.05,
            DealStage::LightInterest => 0.15,
            DealStage::Serious => 0.35,
            DealStage::OfferMade => 0.65,
            DealStage::Negotiation => 0.80,
            DealStage::Signed => 1.0,
            DealStage::Lost => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::None => "none",
            DealStage::LightInterest => "light_interest",
            DealStage::Serious => "serious",
            DealStage::OfferMade => "offer_made",
            DealStage::Negotiation => "negotiation",
            DealStage::Signed => "signed",
            DealStage::Lost => "lost",
        }
    }
}

impl Default for DealStage {
    /// Earliest non-zero stage; new deals start here unless specified.
    fn default() -> Self {
        DealStage::LightInterest
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(DealStage::None),
            "light_interest" => Ok(DealStage::LightInterest),
            "serious" => Ok(DealStage::Serious),
            "offer_made" => Ok(DealStage::OfferMade),
            "negotiation" => Ok(DealStage::Negotiation),
            "signed" => Ok(DealStage::Signed),
            "lost" => Ok(DealStage::Lost),
            other => Err(format!("unknown deal stage '{}'", other)),
        }
    }
}

/// The central mutable record of the pipeline.
///
/// Always belongs to exactly one workspace and references at most one
/// roster. `last_update` is an ISO `%Y-%m-%d` string (persistence-layer
/// interchange) refreshed on every event log or stage change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub workspace_id: String,
    pub artist_slug: String,
    pub roster_id: Option<String>,
    pub owner_user_id: Option<String>,
    pub stage: DealStage,
    pub priority: i32,
    pub probability: f64,
    pub notes: String,
    pub last_update: String,
    pub created_at: DateTime<Utc>,
}

/// Type of an activity event on a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealEventType {
    Meeting,
    Showcase,
    Offer,
    InternalDiscussion,
    StageChange,
    Note,
}

impl DealEventType {
    /// Whether this event type counts toward the activity bonus in the
    /// probability model.
    pub fn counts_toward_probability(&self) -> bool {
        matches!(
            self,
            DealEventType::Meeting
                | DealEventType::Showcase
                | DealEventType::Offer
                | DealEventType::InternalDiscussion
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DealEventType::Meeting => "meeting",
            DealEventType::Showcase => "showcase",
            DealEventType::Offer => "offer",
            DealEventType::InternalDiscussion => "internal_discussion",
            DealEventType::StageChange => "stage_change",
            DealEventType::Note => "note",
        }
    }
}

impl fmt::Display for DealEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meeting" => Ok(DealEventType::Meeting),
            "showcase" => Ok(DealEventType::Showcase),
            "offer" => Ok(DealEventType::Offer),
            "internal_discussion" => Ok(DealEventType::InternalDiscussion),
            "stage_change" => Ok(DealEventType::StageChange),
            "note" => Ok(DealEventType::Note),
            other => Err(format!("unknown event type '{}'", other)),
        }
    }
}

/// Immutable append-only activity record owned by a deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealEvent {
    pub id: String,
    pub deal_id: String,
    pub event_type: DealEventType,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
