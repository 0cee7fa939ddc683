//! Persistent historical-stats cache (SPEC_FULL §A.5), reused from the
//! teacher's SQLite-backed player database rather than invented fresh:
//! - `models`: row types
//! - `schema`: connection + schema management
//! - `queries`: CRUD operations
//! - `training`: the `season_actuals`/`persist_player_actuals` read/write
//!   path C1 training and C8 backtesting read through

pub mod models;
pub mod queries;
pub mod schema;
pub mod training;

#[cfg(test)]
mod tests;

// Re-export the main types and database struct for easy access
pub use models::*;
pub use schema::PlayerDatabase;
