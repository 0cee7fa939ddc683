//! Database schema and connection management.
//!
//! Persistent historical-stats cache (SPEC_FULL §A.5): the teacher's
//! SQLite-backed `players`/`player_weekly_stats` tables are reused as
//! the on-disk store for weekly actual/projected points, read back by
//! `storage::training` for C1 training and C8 backtesting.

use anyhow::{Context, Result};
use dirs::cache_dir;
use rusqlite::Connection;
use std::path::PathBuf;

/// Database connection manager for player data.
pub struct PlayerDatabase {
    pub(crate) conn: Connection,
}

impl PlayerDatabase {
    /// Open (creating if absent) the on-disk database under the OS cache
    /// directory and ensure the schema exists.
    pub fn new() -> Result<Self> {
        let db_path = Self::database_path()?;

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// In-memory database for tests and short-lived backtest runs.
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    fn database_path() -> Result<PathBuf> {
        let cache_dir = cache_dir().context("could not determine cache directory")?;
        Ok(cache_dir.join("ffl-sim-core").join("players.db"))
    }

    /// Initialize the database schema.
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS players (
                player_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                position TEXT NOT NULL,
                team TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS player_weekly_stats (
                player_id INTEGER,
                season INTEGER,
                week INTEGER,
                projected_points REAL,
                actual_points REAL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (player_id, season, week),
                FOREIGN KEY (player_id) REFERENCES players(player_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_player_season_week
             ON player_weekly_stats(season, week)",
            [],
        )?;

        Ok(())
    }
}
