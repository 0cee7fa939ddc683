//! Error types for the simulation and decision core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("player {player_id} has insufficient data: {weeks_available} valid week(s), need at least {weeks_required}")]
    InsufficientData {
        player_id: u64,
        weeks_available: usize,
        weeks_required: usize,
    },

    #[error("cache miss for {key}")]
    CacheMiss { key: String },

    #[error("cached artifact for {key} is stale (schema {found}, expected {expected})")]
    CacheStale {
        key: String,
        found: u32,
        expected: u32,
    },

    #[error("feed {feed} unavailable: {reason}")]
    FeedUnavailable { feed: String, reason: String },

    #[error("feed {feed} failed schema validation: {reason}")]
    SchemaInvalid { feed: String, reason: String },

    #[error("as-of resolution for feed {feed} found no record at or before the cutoff")]
    AsOfMiss { feed: String },

    #[error("conflicting configuration: {detail}")]
    ConfigConflict { detail: String },

    #[error("integrity violation: {detail}")]
    IntegrityViolation { detail: String },

    #[error("numeric failure in {operation}: {detail}")]
    NumericFailure { operation: String, detail: String },

    #[error("league collaborator error: {0}")]
    League(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for SimError {
    fn from(err: rusqlite::Error) -> Self {
        SimError::Storage(err.into())
    }
}