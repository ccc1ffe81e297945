//! # Talentflow Core Library
//!
//! Core business logic for Talentflow: candidate momentum scoring and
//! deal-close probability estimation for emerging-artist pipelines. All
//! operations are available through this library; the CLI binary is a thin
//! layer over the same code.
//!
//! ## Architecture
//!
//! - **Stats**: pure statistical primitives (normalization, smoothing,
//!   similarity, regression) and the momentum score combinator
//! - **Buckets**: calendar-aligned time bucketing for trend analysis
//! - **Scoring**: reduces raw observation series to momentum and composite
//!   scores
//! - **Deal**: the stage state machine, heuristic probability model, and the
//!   engine orchestrating both against the store boundary
//! - **Storage**: store traits plus a SQLite reference implementation
//!
//! ## Key Components
//!
//! - [`ScoringEngine`]: observations in, momentum/composite scores out
//! - [`DealEngine`]: deal lifecycle and probability orchestration
//! - [`Database`]: SQLite-backed reference store
//! - [`Clock`]: injectable time source so date-dependent logic is testable

pub mod buckets;
pub mod clock;
pub mod dates;
pub mod deal;
pub mod error;
pub mod scoring;
pub mod stats;
pub mod storage;

pub use buckets::{bucket_end, bucket_start, generate_buckets, Bucket, Granularity, NamedRange};
pub use clock::{Clock, FixedClock, SystemClock};
pub use deal::{
    compute_probability, Deal, DealEngine, DealEvent, DealEventType, DealOptions, DealStage,
    ProbabilityConfig, ProbabilityContext,
};
pub use error::{CoreError, DatabaseError, StatsError, ValidationError};
pub use scoring::{Observation, ScoringEngine, SubScore};
pub use stats::{momentum_score, MomentumConfig};
pub use storage::{Artist, ArtistStore, Database, DealStore, LatestScore, RosterFit};
