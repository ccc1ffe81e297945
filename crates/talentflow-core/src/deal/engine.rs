//! Stateful deal pipeline orchestration.
//!
//! Probability scoring is advisory: collaborator failures are logged and
//! converted to `None`/`false` returns or a degraded (base-rate) estimate,
//! never propagated. A stage change must still be recorded even if the
//! probability recompute fails afterwards.

use serde_json::json;
use uuid::Uuid;

use super::probability::{compute_probability, ProbabilityConfig, ProbabilityContext};
use super::{Deal, DealEventType, DealStage};
use crate::clock::Clock;
use crate::dates;
use crate::storage::{ArtistStore, DealPatch, DealStore, NewDealEvent, RosterFitAssessor};

/// Optional fields for [`DealEngine::create_deal`].
#[derive(Debug, Clone, Default)]
pub struct DealOptions {
    pub stage: Option<DealStage>,
    pub roster_id: Option<String>,
    pub owner_user_id: Option<String>,
    pub priority: Option<i32>,
    pub notes: Option<String>,
}

/// Owns deal stage transitions and probability computation.
///
/// Borrows its collaborators; the engine itself holds no state beyond the
/// probability coefficients.
pub struct DealEngine<'a> {
    deals: &'a dyn DealStore,
    artists: &'a dyn ArtistStore,
    fit: &'a dyn RosterFitAssessor,
    clock: &'a dyn Clock,
    config: ProbabilityConfig,
}

impl<'a> DealEngine<'a> {
    pub fn new(
        deals: &'a dyn DealStore,
        artists: &'a dyn ArtistStore,
        fit: &'a dyn RosterFitAssessor,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            deals,
            artists,
            fit,
            clock,
            config: ProbabilityConfig::default(),
        }
    }

    /// Use custom probability coefficients.
    pub fn with_config(mut self, config: ProbabilityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ProbabilityConfig {
        &self.config
    }

    /// Create a deal at the requested (or default) stage.
    ///
    /// The initial probability is computed before persistence, and a `note`
    /// event records it afterwards. Persistence failure is logged and
    /// returns `None` -- callers check for `None` rather than catching
    /// errors, since creation is a best-effort background-safe operation.
    pub fn create_deal(
        &self,
        workspace_id: &str,
        artist_slug: &str,
        options: DealOptions,
    ) -> Option<Deal> {
        let mut deal = Deal {
            id: Uuid::new_v4().to_string(),
            workspace_id: workspace_id.to_string(),
            artist_slug: artist_slug.to_string(),
            roster_id: options.roster_id,
            owner_user_id: options.owner_user_id,
            stage: options.stage.unwrap_or_default(),
            priority: options.priority.unwrap_or(50),
            probability: 0.0,
            notes: options.notes.unwrap_or_default(),
            last_update: dates::today(self.clock),
            created_at: self.clock.now(),
        };
        deal.probability = self.compute_deal_probability(&deal);

        let created = match self.deals.create(&deal) {
            Ok(created) => created,
            Err(e) => {
                log::error!("failed to create deal for '{}': {}", artist_slug, e);
                return None;
            }
        };

        let note = NewDealEvent {
            deal_id: created.id.clone(),
            event_type: DealEventType::Note,
            payload: json!({
                "message": "deal created",
                "initial_probability": created.probability,
            }),
        };
        if let Err(e) = self.deals.append_event(&note) {
            log::warn!("failed to log creation note for deal {}: {}", created.id, e);
        }

        Some(created)
    }

    /// Move a deal to a new stage and recompute its probability.
    ///
    /// The stage is persisted first so the probability recompute reads a
    /// durable stage; concurrent readers see either the old stage with the
    /// old probability or the new stage with the new probability, never a
    /// new stage with a stale-for-old-stage probability beyond the window
    /// between the two writes. Best-effort ordering, not a transaction.
    pub fn update_deal_stage(&self, deal_id: &str, new_stage: DealStage) -> Option<Deal> {
        let deal = match self.deals.get_by_id(deal_id) {
            Ok(Some(deal)) => deal,
            Ok(None) => {
                log::warn!("deal {} not found", deal_id);
                return None;
            }
            Err(e) => {
                log::error!("failed to load deal {}: {}", deal_id, e);
                return None;
            }
        };

        let previous_stage = deal.stage;
        if !previous_stage.can_transition_to(&new_stage) {
            log::warn!(
                "invalid stage transition for deal {}: {} -> {}",
                deal_id,
                previous_stage,
                new_stage
            );
            return None;
        }

        let stage_patch = DealPatch {
            stage: Some(new_stage),
            last_update: Some(dates::today(self.clock)),
            ..Default::default()
        };
        let refreshed = match self.deals.update(deal_id, &stage_patch) {
            Ok(Some(refreshed)) => refreshed,
            Ok(None) => {
                log::warn!("deal {} vanished during stage update", deal_id);
                return None;
            }
            Err(e) => {
                log::error!("failed to persist stage for deal {}: {}", deal_id, e);
                return None;
            }
        };

        let new_probability = self.compute_deal_probability(&refreshed);
        let probability_patch = DealPatch {
            probability: Some(new_probability),
            ..Default::default()
        };
        let finalized = match self.deals.update(deal_id, &probability_patch) {
            Ok(Some(finalized)) => finalized,
            Ok(None) => {
                log::warn!("deal {} vanished during probability update", deal_id);
                return None;
            }
            Err(e) => {
                // Stage change already landed; surface the refreshed deal
                log::error!("failed to persist probability for deal {}: {}", deal_id, e);
                return Some(refreshed);
            }
        };

        let event = NewDealEvent {
            deal_id: deal_id.to_string(),
            event_type: DealEventType::StageChange,
            payload: json!({
                "previous_stage": previous_stage,
                "new_stage": new_stage,
                "new_probability": new_probability,
            }),
        };
        if let Err(e) = self.deals.append_event(&event) {
            log::warn!("failed to log stage change for deal {}: {}", deal_id, e);
        }

        Some(finalized)
    }

    /// Append an activity event and refresh the deal's `last_update`.
    ///
    /// Never fails toward the caller; returns a success flag instead.
    pub fn log_activity(
        &self,
        deal_id: &str,
        event_type: DealEventType,
        payload: serde_json::Value,
    ) -> bool {
        let event = NewDealEvent {
            deal_id: deal_id.to_string(),
            event_type,
            payload,
        };
        if let Err(e) = self.deals.append_event(&event) {
            log::error!("failed to append {} event to deal {}: {}", event_type, deal_id, e);
            return false;
        }

        let touch = DealPatch::touch(dates::today(self.clock));
        match self.deals.update(deal_id, &touch) {
            Ok(Some(_)) => true,
            Ok(None) => {
                log::warn!("deal {} not found while touching last_update", deal_id);
                false
            }
            Err(e) => {
                log::error!("failed to touch deal {}: {}", deal_id, e);
                false
            }
        }
    }

    /// Compute the close probability for a deal.
    ///
    /// Assembles the context from collaborators; any fetch failure degrades
    /// that term to absent (logged), so the result is never undefined --
    /// worst case it is the stage base rate alone.
    pub fn compute_deal_probability(&self, deal: &Deal) -> f64 {
        let latest_score = match self.artists.get_by_slug(&deal.artist_slug) {
            Ok(Some(artist)) => match self.artists.get_latest_score(&artist.id) {
                Ok(score) => score,
                Err(e) => {
                    log::warn!(
                        "score lookup failed for artist '{}', degrading to base rate term: {}",
                        deal.artist_slug,
                        e
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!(
                    "artist lookup failed for '{}', degrading to base rate term: {}",
                    deal.artist_slug,
                    e
                );
                None
            }
        };

        let roster_fit = deal.roster_id.as_deref().and_then(|roster_id| {
            match self.fit.assess_fit(roster_id, &deal.artist_slug) {
                Ok(fit) => fit,
                Err(e) => {
                    log::warn!(
                        "roster fit lookup failed for deal {} (roster {}): {}",
                        deal.id,
                        roster_id,
                        e
                    );
                    None
                }
            }
        });

        let countable_events = match self.deals.list_events(&deal.id) {
            Ok(events) => events
                .iter()
                .filter(|e| e.event_type.counts_toward_probability())
                .count(),
            Err(e) => {
                log::warn!("event listing failed for deal {}: {}", deal.id, e);
                0
            }
        };

        let days_since_update = match dates::days_between(&deal.last_update, &dates::today(self.clock))
        {
            Ok(days) => days,
            Err(e) => {
                log::warn!("unparseable last_update on deal {}: {}", deal.id, e);
                0
            }
        };

        let ctx = ProbabilityContext {
            latest_score,
            roster_fit,
            countable_events,
            days_since_update,
        };
        compute_probability(deal.stage, &ctx, &self.config)
    }
}
