//! Core error types for talentflow-core.
//!
//! This module defines the error hierarchy using thiserror. Statistical
//! primitives only ever fail on contract violations (mismatched vector
//! lengths); empty-but-valid input produces neutral values instead of errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for talentflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Statistics contract violations
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Record not found where one was required
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Contract violations in the statistics library.
///
/// Mismatched vector lengths are programmer errors, not data conditions,
/// so they surface as errors rather than neutral values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Paired inputs must have the same length
    #[error("Input length mismatch: left has {left} elements, right has {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Failed to parse an ISO date string
    #[error("Invalid ISO date '{value}': expected %Y-%m-%d")]
    InvalidDate { value: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            rusqlite::Error::QueryReturnedNoRows => {
                DatabaseError::NotFound("query returned no rows".to_string())
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
