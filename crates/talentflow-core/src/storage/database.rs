//! SQLite reference implementation of the store boundary.
//!
//! Persists artists, score snapshots, roster-fit assessments, deals and
//! deal events. Dates are stored as TEXT (RFC 3339 for instants, ISO
//! `%Y-%m-%d` for day fields); stages and event types are stored by their
//! snake_case names.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use uuid::Uuid;

use super::traits::{
    Artist, ArtistStore, DealPatch, DealStore, LatestScore, NewDealEvent, RosterFit,
    RosterFitAssessor,
};
use super::data_dir;
use crate::deal::{Deal, DealEvent, DealEventType, DealStage};
use crate::error::DatabaseError;

/// SQLite database backing all three store traits.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/talentflow/talentflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir()
            .map_err(|e| DatabaseError::QueryFailed(format!("cannot resolve data dir: {}", e)))?;
        let path = dir.join("talentflow.db");
        Self::open_at(path)
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: PathBuf) -> Result<Self, DatabaseError> {
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests and ephemeral use).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS artists (
                    id    TEXT PRIMARY KEY,
                    slug  TEXT NOT NULL UNIQUE,
                    name  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS artist_scores (
                    id              INTEGER PRIMARY KEY AUTOINCREMENT,
                    artist_id       TEXT NOT NULL REFERENCES artists(id),
                    composite_score REAL NOT NULL,
                    momentum_score  REAL NOT NULL,
                    created_at      TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS roster_fits (
                    roster_id     TEXT NOT NULL,
                    artist_slug   TEXT NOT NULL,
                    composite_fit REAL NOT NULL,
                    PRIMARY KEY (roster_id, artist_slug)
                );

                CREATE TABLE IF NOT EXISTS deals (
                    id            TEXT PRIMARY KEY,
                    workspace_id  TEXT NOT NULL,
                    artist_slug   TEXT NOT NULL,
                    roster_id     TEXT,
                    owner_user_id TEXT,
                    stage         TEXT NOT NULL,
                    priority      INTEGER NOT NULL,
                    probability   REAL NOT NULL,
                    notes         TEXT NOT NULL DEFAULT '',
                    last_update   TEXT NOT NULL,
                    created_at    TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS deal_events (
                    id         TEXT PRIMARY KEY,
                    deal_id    TEXT NOT NULL REFERENCES deals(id),
                    event_type TEXT NOT NULL,
                    payload    TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_artist_scores_artist ON artist_scores(artist_id, id);
                CREATE INDEX IF NOT EXISTS idx_deals_workspace ON deals(workspace_id);
                CREATE INDEX IF NOT EXISTS idx_deal_events_deal ON deal_events(deal_id, created_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Insert or update an artist by slug; returns the stored record.
    pub fn upsert_artist(&self, slug: &str, name: &str) -> Result<Artist, DatabaseError> {
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM artists WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )
            .optional()?;

        let id = match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE artists SET name = ?1 WHERE id = ?2",
                    params![name, id],
                )?;
                id
            }
            None => {
                let id = Uuid::new_v4().to_string();
                self.conn.execute(
                    "INSERT INTO artists (id, slug, name) VALUES (?1, ?2, ?3)",
                    params![id, slug, name],
                )?;
                id
            }
        };

        Ok(Artist {
            id,
            slug: slug.to_string(),
            name: name.to_string(),
        })
    }

    /// Append a scoring snapshot for an artist.
    pub fn record_score(
        &self,
        artist_id: &str,
        score: &LatestScore,
        recorded_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO artist_scores (artist_id, composite_score, momentum_score, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                artist_id,
                score.composite_score,
                score.momentum_score,
                recorded_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Store (or replace) a roster-fit assessment.
    pub fn set_roster_fit(
        &self,
        roster_id: &str,
        artist_slug: &str,
        fit: &RosterFit,
    ) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO roster_fits (roster_id, artist_slug, composite_fit)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (roster_id, artist_slug) DO UPDATE SET composite_fit = ?3",
            params![roster_id, artist_slug, fit.composite_fit],
        )?;
        Ok(())
    }

    /// All deals in a workspace, newest first.
    pub fn list_deals(&self, workspace_id: &str) -> Result<Vec<Deal>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, artist_slug, roster_id, owner_user_id, stage,
                    priority, probability, notes, last_update, created_at
             FROM deals WHERE workspace_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![workspace_id], deal_columns)?;
        let mut deals = Vec::new();
        for row in rows {
            deals.push(parse_deal(row?)?);
        }
        Ok(deals)
    }
}

type DealColumns = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    i32,
    f64,
    String,
    String,
    String,
);

fn deal_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<DealColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{}': {}", value, e)))
}

fn parse_deal(columns: DealColumns) -> Result<Deal, DatabaseError> {
    let (
        id,
        workspace_id,
        artist_slug,
        roster_id,
        owner_user_id,
        stage,
        priority,
        probability,
        notes,
        last_update,
        created_at,
    ) = columns;
    Ok(Deal {
        id,
        workspace_id,
        artist_slug,
        roster_id,
        owner_user_id,
        stage: stage
            .parse::<DealStage>()
            .map_err(DatabaseError::QueryFailed)?,
        priority,
        probability,
        notes,
        last_update,
        created_at: parse_instant(&created_at)?,
    })
}

impl ArtistStore for Database {
    fn get_by_slug(&self, slug: &str) -> Result<Option<Artist>, DatabaseError> {
        let artist = self
            .conn
            .query_row(
                "SELECT id, slug, name FROM artists WHERE slug = ?1",
                params![slug],
                |row| {
                    Ok(Artist {
                        id: row.get(0)?,
                        slug: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(artist)
    }

    fn get_latest_score(&self, artist_id: &str) -> Result<Option<LatestScore>, DatabaseError> {
        let score = self
            .conn
            .query_row(
                "SELECT composite_score, momentum_score FROM artist_scores
                 WHERE artist_id = ?1 ORDER BY id DESC LIMIT 1",
                params![artist_id],
                |row| {
                    Ok(LatestScore {
                        composite_score: row.get(0)?,
                        momentum_score: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(score)
    }
}

impl RosterFitAssessor for Database {
    fn assess_fit(
        &self,
        roster_id: &str,
        artist_slug: &str,
    ) -> Result<Option<RosterFit>, DatabaseError> {
        let fit = self
            .conn
            .query_row(
                "SELECT composite_fit FROM roster_fits
                 WHERE roster_id = ?1 AND artist_slug = ?2",
                params![roster_id, artist_slug],
                |row| {
                    Ok(RosterFit {
                        composite_fit: row.get(0)?,
                    })
                },
            )
            .optional()?;
        Ok(fit)
    }
}

impl DealStore for Database {
    fn create(&self, deal: &Deal) -> Result<Deal, DatabaseError> {
        self.conn.execute(
            "INSERT INTO deals (id, workspace_id, artist_slug, roster_id, owner_user_id,
                                stage, priority, probability, notes, last_update, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                deal.id,
                deal.workspace_id,
                deal.artist_slug,
                deal.roster_id,
                deal.owner_user_id,
                deal.stage.as_str(),
                deal.priority,
                deal.probability,
                deal.notes,
                deal.last_update,
                deal.created_at.to_rfc3339()
            ],
        )?;
        Ok(deal.clone())
    }

    fn update(&self, id: &str, patch: &DealPatch) -> Result<Option<Deal>, DatabaseError> {
        if !patch.is_empty() {
            let mut sets: Vec<&str> = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
            if let Some(stage) = &patch.stage {
                sets.push("stage = ?");
                values.push(Box::new(stage.as_str()));
            }
            if let Some(probability) = patch.probability {
                sets.push("probability = ?");
                values.push(Box::new(probability));
            }
            if let Some(last_update) = &patch.last_update {
                sets.push("last_update = ?");
                values.push(Box::new(last_update.clone()));
            }
            if let Some(notes) = &patch.notes {
                sets.push("notes = ?");
                values.push(Box::new(notes.clone()));
            }
            values.push(Box::new(id.to_string()));
            let sql = format!("UPDATE deals SET {} WHERE id = ?", sets.join(", "));
            self.conn
                .execute(&sql, params_from_iter(values.iter().map(|v| v.as_ref())))?;
        }
        self.get_by_id(id)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Deal>, DatabaseError> {
        let columns = self
            .conn
            .query_row(
                "SELECT id, workspace_id, artist_slug, roster_id, owner_user_id, stage,
                        priority, probability, notes, last_update, created_at
                 FROM deals WHERE id = ?1",
                params![id],
                deal_columns,
            )
            .optional()?;
        columns.map(parse_deal).transpose()
    }

    fn append_event(&self, event: &NewDealEvent) -> Result<DealEvent, DatabaseError> {
        let stored = DealEvent {
            id: Uuid::new_v4().to_string(),
            deal_id: event.deal_id.clone(),
            event_type: event.event_type,
            payload: event.payload.clone(),
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO deal_events (id, deal_id, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                stored.id,
                stored.deal_id,
                stored.event_type.as_str(),
                stored.payload.to_string(),
                stored.created_at.to_rfc3339()
            ],
        )?;
        Ok(stored)
    }

    fn list_events(&self, deal_id: &str) -> Result<Vec<DealEvent>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, deal_id, event_type, payload, created_at
             FROM deal_events WHERE deal_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![deal_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (id, deal_id, event_type, payload, created_at) = row?;
            events.push(DealEvent {
                id,
                deal_id,
                event_type: event_type
                    .parse::<DealEventType>()
                    .map_err(DatabaseError::QueryFailed)?,
                payload: serde_json::from_str(&payload)
                    .map_err(|e| DatabaseError::QueryFailed(format!("bad payload: {}", e)))?,
                created_at: parse_instant(&created_at)?,
            });
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_deal(id: &str) -> Deal {
        Deal {
            id: id.to_string(),
            workspace_id: "ws-1".to_string(),
            artist_slug: "night-pulse".to_string(),
            roster_id: None,
            owner_user_id: None,
            stage: DealStage::Serious,
            priority: 50,
            probability: 0.35,
            notes: String::new(),
            last_update: "2026-08-25".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_at_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talentflow.db");

        {
            let db = Database::open_at(path.clone()).unwrap();
            db.create(&sample_deal("deal-1")).unwrap();
        }

        let reopened = Database::open_at(path).unwrap();
        let loaded = reopened.get_by_id("deal-1").unwrap().unwrap();
        assert_eq!(loaded.stage, DealStage::Serious);
    }

    #[test]
    fn test_deal_create_and_get_round_trip() {
        let db = Database::open_memory().unwrap();
        let deal = sample_deal("deal-1");
        db.create(&deal).unwrap();

        let loaded = db.get_by_id("deal-1").unwrap().unwrap();
        assert_eq!(loaded.artist_slug, "night-pulse");
        assert_eq!(loaded.stage, DealStage::Serious);
        assert_eq!(loaded.last_update, "2026-08-25");

        assert!(db.get_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_deal_patch_updates_only_named_fields() {
        let db = Database::open_memory().unwrap();
        db.create(&sample_deal("deal-1")).unwrap();

        let patch = DealPatch {
            stage: Some(DealStage::OfferMade),
            last_update: Some("2026-08-26".to_string()),
            ..Default::default()
        };
        let updated = db.update("deal-1", &patch).unwrap().unwrap();
        assert_eq!(updated.stage, DealStage::OfferMade);
        assert_eq!(updated.last_update, "2026-08-26");
        // Untouched fields persist
        assert_eq!(updated.probability, 0.35);
        assert_eq!(updated.priority, 50);
    }

    #[test]
    fn test_empty_patch_is_noop_read() {
        let db = Database::open_memory().unwrap();
        db.create(&sample_deal("deal-1")).unwrap();
        let unchanged = db.update("deal-1", &DealPatch::default()).unwrap().unwrap();
        assert_eq!(unchanged.stage, DealStage::Serious);
    }

    #[test]
    fn test_update_missing_deal_returns_none() {
        let db = Database::open_memory().unwrap();
        let patch = DealPatch::touch("2026-08-26");
        assert!(db.update("missing", &patch).unwrap().is_none());
    }

    #[test]
    fn test_events_append_only_and_ordered() {
        let db = Database::open_memory().unwrap();
        db.create(&sample_deal("deal-1")).unwrap();

        for event_type in [DealEventType::Meeting, DealEventType::Showcase] {
            db.append_event(&NewDealEvent {
                deal_id: "deal-1".to_string(),
                event_type,
                payload: json!({"venue": "loft"}),
            })
            .unwrap();
        }

        let events = db.list_events("deal-1").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, DealEventType::Meeting);
        assert_eq!(events[1].event_type, DealEventType::Showcase);
        assert_eq!(events[0].payload["venue"], "loft");
    }

    #[test]
    fn test_artist_and_score_lookups() {
        let db = Database::open_memory().unwrap();
        let artist = db.upsert_artist("night-pulse", "Night Pulse").unwrap();

        assert!(db.get_by_slug("unknown").unwrap().is_none());
        let found = db.get_by_slug("night-pulse").unwrap().unwrap();
        assert_eq!(found.id, artist.id);

        assert!(db.get_latest_score(&artist.id).unwrap().is_none());
        db.record_score(
            &artist.id,
            &LatestScore {
                composite_score: 0.6,
                momentum_score: 0.5,
            },
            Utc::now(),
        )
        .unwrap();
        db.record_score(
            &artist.id,
            &LatestScore {
                composite_score: 0.8,
                momentum_score: 0.9,
            },
            Utc::now(),
        )
        .unwrap();

        // Latest snapshot wins
        let latest = db.get_latest_score(&artist.id).unwrap().unwrap();
        assert_eq!(latest.composite_score, 0.8);
    }

    #[test]
    fn test_upsert_artist_is_idempotent_by_slug() {
        let db = Database::open_memory().unwrap();
        let first = db.upsert_artist("night-pulse", "Night Pulse").unwrap();
        let second = db.upsert_artist("night-pulse", "Night Pulse (UK)").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            db.get_by_slug("night-pulse").unwrap().unwrap().name,
            "Night Pulse (UK)"
        );
    }

    #[test]
    fn test_roster_fit_upsert_and_lookup() {
        let db = Database::open_memory().unwrap();
        assert!(db.assess_fit("roster-1", "night-pulse").unwrap().is_none());

        db.set_roster_fit("roster-1", "night-pulse", &RosterFit { composite_fit: 0.4 })
            .unwrap();
        db.set_roster_fit("roster-1", "night-pulse", &RosterFit { composite_fit: 0.9 })
            .unwrap();

        let fit = db.assess_fit("roster-1", "night-pulse").unwrap().unwrap();
        assert_eq!(fit.composite_fit, 0.9);
    }

    #[test]
    fn test_list_deals_scoped_to_workspace() {
        let db = Database::open_memory().unwrap();
        db.create(&sample_deal("deal-1")).unwrap();
        let mut other = sample_deal("deal-2");
        other.workspace_id = "ws-2".to_string();
        db.create(&other).unwrap();

        let deals = db.list_deals("ws-1").unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].id, "deal-1");
    }
}
