use clap::Subcommand;
use serde_json::json;
use talentflow_core::storage::DealStore;
use talentflow_core::{
    Database, DealEngine, DealEventType, DealOptions, DealStage, SystemClock,
};

use crate::common::{load_weights, print_json};

#[derive(Subcommand)]
pub enum DealAction {
    /// Open a new deal for an artist
    Create {
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        artist: String,
        /// Starting stage; defaults to light_interest
        #[arg(long)]
        stage: Option<DealStage>,
        #[arg(long)]
        roster: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        priority: Option<i32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move a deal to a later stage
    Advance {
        id: String,
        stage: DealStage,
    },
    /// Record an activity event on a deal
    Log {
        id: String,
        /// meeting | showcase | offer | internal_discussion | note
        event_type: DealEventType,
        /// JSON payload, e.g. '{"venue": "loft"}'
        #[arg(long, default_value = "{}")]
        payload: String,
    },
    /// Show a deal with its freshly computed probability
    Show { id: String },
    /// List the activity events of a deal
    Events { id: String },
    /// List all deals in a workspace
    List {
        #[arg(long)]
        workspace: String,
    },
}

pub fn run(action: DealAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let clock = SystemClock;
    let weights = load_weights()?;
    let engine = DealEngine::new(&db, &db, &db, &clock).with_config(weights.probability);

    match action {
        DealAction::Create {
            workspace,
            artist,
            stage,
            roster,
            owner,
            priority,
            notes,
        } => {
            let options = DealOptions {
                stage,
                roster_id: roster,
                owner_user_id: owner,
                priority,
                notes,
            };
            let deal = engine
                .create_deal(&workspace, &artist, options)
                .ok_or("failed to create deal")?;
            print_json(&deal)
        }
        DealAction::Advance { id, stage } => {
            let deal = engine
                .update_deal_stage(&id, stage)
                .ok_or_else(|| format!("cannot move deal {} to {}", id, stage))?;
            print_json(&deal)
        }
        DealAction::Log {
            id,
            event_type,
            payload,
        } => {
            let payload: serde_json::Value = serde_json::from_str(&payload)?;
            if !engine.log_activity(&id, event_type, payload) {
                return Err(format!("failed to log {} on deal {}", event_type, id).into());
            }
            print_json(&json!({"deal_id": id, "event_type": event_type, "logged": true}))
        }
        DealAction::Show { id } => {
            let deal = db
                .get_by_id(&id)?
                .ok_or_else(|| format!("deal {} not found", id))?;
            let current = engine.compute_deal_probability(&deal);
            print_json(&json!({
                "deal": deal,
                "current_probability": current,
            }))
        }
        DealAction::Events { id } => {
            let events = db.list_events(&id)?;
            print_json(&events)
        }
        DealAction::List { workspace } => {
            let deals = db.list_deals(&workspace)?;
            print_json(&deals)
        }
    }
}
