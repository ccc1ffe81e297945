//! End-to-end deal pipeline tests against the SQLite reference store.

use serde_json::json;
use talentflow_core::storage::{DealPatch, DealStore, LatestScore, RosterFit};
use talentflow_core::{Database, DealEngine, DealEventType, DealOptions, DealStage, FixedClock};

fn seeded_db() -> Database {
    let db = Database::open_memory().unwrap();
    let artist = db.upsert_artist("night-pulse", "Night Pulse").unwrap();
    db.record_score(
        &artist.id,
        &LatestScore {
            composite_score: 0.8,
            momentum_score: 0.9,
        },
        FixedClock::at("2026-08-20T12:00:00+00:00").0,
    )
    .unwrap();
    db.set_roster_fit("roster-1", "night-pulse", &RosterFit { composite_fit: 0.75 })
        .unwrap();
    db
}

#[test]
fn test_full_deal_lifecycle() {
    let db = seeded_db();
    let clock = FixedClock::at("2026-08-25T12:00:00+00:00");
    let engine = DealEngine::new(&db, &db, &db, &clock);

    // Create at the default stage with a roster link
    let deal = engine
        .create_deal(
            "ws-1",
            "night-pulse",
            DealOptions {
                roster_id: Some("roster-1".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(deal.stage, DealStage::LightInterest);
    assert_eq!(deal.last_update, "2026-08-25");
    // 0.15 + (0.8-0.5)*0.1 + 0.05 momentum + (0.75-0.5)*0.08 = 0.25
    assert_eq!(deal.probability, 0.25);

    // Creation logged a note with the initial probability
    let events = db.list_events(&deal.id).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, DealEventType::Note);
    assert_eq!(events[0].payload["initial_probability"], json!(0.25));

    // Two meetings feed the activity bonus
    assert!(engine.log_activity(&deal.id, DealEventType::Meeting, json!({"venue": "loft"})));
    assert!(engine.log_activity(&deal.id, DealEventType::Meeting, json!({"venue": "studio"})));

    // Advance: probability recomputed for the new stage
    let advanced = engine.update_deal_stage(&deal.id, DealStage::Serious).unwrap();
    assert_eq!(advanced.stage, DealStage::Serious);
    // 0.35 + 0.03 + 0.05 + 0.02 + 2*0.02 = 0.49
    assert_eq!(advanced.probability, 0.49);

    // Stage change event captured the transition and the new probability
    let events = db.list_events(&deal.id).unwrap();
    let change = events
        .iter()
        .find(|e| e.event_type == DealEventType::StageChange)
        .unwrap();
    assert_eq!(change.payload["previous_stage"], json!("light_interest"));
    assert_eq!(change.payload["new_stage"], json!("serious"));
    assert_eq!(change.payload["new_probability"], json!(0.49));
}

#[test]
fn test_offer_made_probability_scenario() {
    // Deal at offer_made, no roster, 2 meetings, updated 10 days ago,
    // composite 0.8 with modest momentum: expect 0.72
    let db = Database::open_memory().unwrap();
    let artist = db.upsert_artist("night-pulse", "Night Pulse").unwrap();
    db.record_score(
        &artist.id,
        &LatestScore {
            composite_score: 0.8,
            momentum_score: 0.5,
        },
        FixedClock::at("2026-08-20T12:00:00+00:00").0,
    )
    .unwrap();

    let clock = FixedClock::at("2026-08-25T12:00:00+00:00");
    let engine = DealEngine::new(&db, &db, &db, &clock);

    let deal = engine
        .create_deal(
            "ws-1",
            "night-pulse",
            DealOptions {
                stage: Some(DealStage::OfferMade),
                ..Default::default()
            },
        )
        .unwrap();
    engine.log_activity(&deal.id, DealEventType::Meeting, json!({}));
    engine.log_activity(&deal.id, DealEventType::Meeting, json!({}));

    let aged = db
        .update(&deal.id, &DealPatch::touch("2026-08-15"))
        .unwrap()
        .unwrap();
    assert_eq!(engine.compute_deal_probability(&aged), 0.72);

    // Same deal gone stale for 50 days: capped penalty brings it to 0.57
    let stale = db
        .update(&deal.id, &DealPatch::touch("2026-07-06"))
        .unwrap()
        .unwrap();
    assert_eq!(engine.compute_deal_probability(&stale), 0.57);

    // Idempotent on an unmutated deal
    assert_eq!(
        engine.compute_deal_probability(&stale),
        engine.compute_deal_probability(&stale)
    );
}

#[test]
fn test_conflicting_stage_updates_stay_consistent() {
    // Two callers race with different target stages; whichever lands last,
    // the persisted (stage, probability) pair must be mutually consistent.
    let db = seeded_db();
    let clock = FixedClock::at("2026-08-25T12:00:00+00:00");
    let engine = DealEngine::new(&db, &db, &db, &clock);

    let deal = engine
        .create_deal(
            "ws-1",
            "night-pulse",
            DealOptions {
                stage: Some(DealStage::Serious),
                ..Default::default()
            },
        )
        .unwrap();

    engine.update_deal_stage(&deal.id, DealStage::OfferMade).unwrap();
    let last = engine
        .update_deal_stage(&deal.id, DealStage::Negotiation)
        .unwrap();

    let persisted = db.get_by_id(&deal.id).unwrap().unwrap();
    assert_eq!(persisted.stage, DealStage::Negotiation);
    assert_eq!(persisted.probability, last.probability);
    assert_eq!(
        persisted.probability,
        engine.compute_deal_probability(&persisted)
    );
}

#[test]
fn test_invalid_transitions_are_refused() {
    let db = seeded_db();
    let clock = FixedClock::at("2026-08-25T12:00:00+00:00");
    let engine = DealEngine::new(&db, &db, &db, &clock);

    let deal = engine
        .create_deal(
            "ws-1",
            "night-pulse",
            DealOptions {
                stage: Some(DealStage::Negotiation),
                ..Default::default()
            },
        )
        .unwrap();

    // Backward move refused
    assert!(engine.update_deal_stage(&deal.id, DealStage::Serious).is_none());

    // Terminal stage accepts no further transitions
    engine.update_deal_stage(&deal.id, DealStage::Signed).unwrap();
    assert!(engine.update_deal_stage(&deal.id, DealStage::Lost).is_none());

    // Event logging stays possible on terminal deals for audit
    assert!(engine.log_activity(&deal.id, DealEventType::Note, json!({"note": "archived"})));
}

#[test]
fn test_missing_deal_returns_null_like_values() {
    let db = seeded_db();
    let clock = FixedClock::at("2026-08-25T12:00:00+00:00");
    let engine = DealEngine::new(&db, &db, &db, &clock);

    assert!(engine.update_deal_stage("missing", DealStage::Serious).is_none());
    assert!(!engine.log_activity("missing", DealEventType::Meeting, json!({})));
}

#[test]
fn test_probability_degrades_to_base_rate_without_artist_data() {
    // No artist record, no scores, no fit: probability is the stage base
    // rate alone.
    let db = Database::open_memory().unwrap();
    let clock = FixedClock::at("2026-08-25T12:00:00+00:00");
    let engine = DealEngine::new(&db, &db, &db, &clock);

    let deal = engine
        .create_deal(
            "ws-1",
            "unknown-artist",
            DealOptions {
                stage: Some(DealStage::Serious),
                roster_id: Some("roster-9".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(deal.probability, 0.35);
}
