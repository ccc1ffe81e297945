//! Scoring flow: raw observations to a persisted score the deal engine reads.

use chrono::{DateTime, Duration, Utc};
use talentflow_core::storage::LatestScore;
use talentflow_core::{
    Database, DealEngine, DealOptions, DealStage, FixedClock, Granularity, Observation,
    ScoringEngine, SubScore,
};

fn dt(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn test_observations_to_deal_probability() {
    // Weekly listener aggregates trending up: [40, 42, 45, 50]
    let monday = dt("2026-07-27T12:00:00+00:00");
    let observations: Vec<Observation> = [40.0, 42.0, 45.0, 50.0]
        .iter()
        .enumerate()
        .map(|(week, &value)| Observation {
            entity_id: "night-pulse".to_string(),
            timestamp: monday + Duration::weeks(week as i64),
            value,
        })
        .collect();

    let scorer = ScoringEngine::new();
    let momentum = scorer.momentum_from_observations(&observations, Granularity::Week);
    assert_eq!(momentum, 67);

    let composite =
        scorer.composite_score(momentum, &[SubScore::new("breakout_likelihood", 0.5, 0.8)]);
    assert!((composite - 0.735).abs() < 1e-9);

    // Persist the snapshot and let the deal engine pick it up
    let db = Database::open_memory().unwrap();
    let artist = db.upsert_artist("night-pulse", "Night Pulse").unwrap();
    db.record_score(
        &artist.id,
        &LatestScore {
            composite_score: composite,
            momentum_score: momentum as f64 / 100.0,
        },
        dt("2026-08-24T12:00:00+00:00"),
    )
    .unwrap();

    let clock = FixedClock::at("2026-08-25T12:00:00+00:00");
    let engine = DealEngine::new(&db, &db, &db, &clock);
    let deal = engine
        .create_deal(
            "ws-1",
            "night-pulse",
            DealOptions {
                stage: Some(DealStage::Serious),
                notes: Some("heard at showcase".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    // 0.35 + (0.735 - 0.5) * 0.1 = 0.3735 -> 0.374 rounded; momentum 0.67
    // clears no bonus threshold
    assert_eq!(deal.probability, 0.374);
    assert_eq!(deal.notes, "heard at showcase");

    // Raw per-event noise never reaches the formula: the same observations
    // split into many same-week readings bucket to the same series
    let mut noisy = Vec::new();
    for obs in &observations {
        noisy.push(Observation {
            value: obs.value / 2.0,
            ..obs.clone()
        });
        noisy.push(Observation {
            value: obs.value / 2.0,
            timestamp: obs.timestamp + Duration::days(1),
            ..obs.clone()
        });
    }
    assert_eq!(
        scorer.momentum_from_observations(&noisy, Granularity::Week),
        momentum
    );
}
