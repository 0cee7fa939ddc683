//! Basic database query operations.

use super::{models::*, schema::PlayerDatabase};
use crate::league::{PlayerId, Season, Week};
use anyhow::Result;
use rusqlite::{params, Row};
use std::time::{SystemTime, UNIX_EPOCH};

impl PlayerDatabase {
    /// Insert or update a player's basic information.
    pub fn upsert_player(&mut self, player: &Player) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO players (player_id, name, position, team)
             VALUES (?, ?, ?, ?)",
            params![player.player_id.as_u64(), player.name, player.position, player.team],
        )?;
        Ok(())
    }

    /// Insert or update weekly stats for a player. Only updates if
    /// `force_update` is true or the row doesn't exist yet.
    pub fn upsert_weekly_stats(&mut self, stats: &PlayerWeeklyStats, force_update: bool) -> Result<bool> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        if force_update {
            let rows_affected = self.conn.execute(
                "INSERT OR REPLACE INTO player_weekly_stats
                 (player_id, season, week, projected_points, actual_points, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?,
                         COALESCE((SELECT created_at FROM player_weekly_stats
                                  WHERE player_id = ? AND season = ? AND week = ?), ?), ?)",
                params![
                    stats.player_id.as_u64(),
                    stats.season.as_u16(),
                    stats.week.as_u16(),
                    stats.projected_points,
                    stats.actual_points,
                    stats.player_id.as_u64(),
                    stats.season.as_u16(),
                    stats.week.as_u16(),
                    now,
                    now
                ],
            )?;
            Ok(rows_affected > 0)
        } else {
            let rows_affected = self.conn.execute(
                "INSERT OR IGNORE INTO player_weekly_stats
                 (player_id, season, week, projected_points, actual_points, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    stats.player_id.as_u64(),
                    stats.season.as_u16(),
                    stats.week.as_u16(),
                    stats.projected_points,
                    stats.actual_points,
                    now,
                    now
                ],
            )?;
            Ok(rows_affected > 0)
        }
    }

    /// Get weekly stats for a specific player, season, and week.
    pub fn get_weekly_stats(&self, player_id: PlayerId, season: Season, week: Week) -> Result<Option<PlayerWeeklyStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, season, week, projected_points, actual_points, created_at, updated_at
             FROM player_weekly_stats
             WHERE player_id = ? AND season = ? AND week = ?",
        )?;

        let result = stmt.query_row(
            params![player_id.as_u64(), season.as_u16(), week.as_u16()],
            |row| self.row_to_weekly_stats(row),
        );

        match result {
            Ok(stats) => Ok(Some(stats)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all weekly stats for a player in a season, ordered by week.
    pub fn get_player_season_stats(&self, player_id: PlayerId, season: Season) -> Result<Vec<PlayerWeeklyStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, season, week, projected_points, actual_points, created_at, updated_at
             FROM player_weekly_stats
             WHERE player_id = ? AND season = ?
             ORDER BY week",
        )?;

        let rows = stmt.query_map(params![player_id.as_u64(), season.as_u16()], |row| self.row_to_weekly_stats(row))?;

        let mut stats = Vec::new();
        for row in rows {
            stats.push(row?);
        }
        Ok(stats)
    }

    /// Insert or merge weekly stats, preserving whichever of
    /// projected/actual points was already recorded when the new value
    /// is absent.
    pub fn merge_weekly_stats(&mut self, stats: &PlayerWeeklyStats) -> Result<()> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        self.conn.execute(
            "INSERT OR REPLACE INTO player_weekly_stats
             (player_id, season, week, projected_points, actual_points, created_at, updated_at)
             VALUES (?, ?, ?,
                     COALESCE(?, (SELECT projected_points FROM player_weekly_stats
                                  WHERE player_id = ? AND season = ? AND week = ?)),
                     COALESCE(?, (SELECT actual_points FROM player_weekly_stats
                                  WHERE player_id = ? AND season = ? AND week = ?)),
                     COALESCE((SELECT created_at FROM player_weekly_stats
                              WHERE player_id = ? AND season = ? AND week = ?), ?), ?)",
            params![
                stats.player_id.as_u64(),
                stats.season.as_u16(),
                stats.week.as_u16(),
                stats.projected_points,
                stats.player_id.as_u64(),
                stats.season.as_u16(),
                stats.week.as_u16(),
                stats.actual_points,
                stats.player_id.as_u64(),
                stats.season.as_u16(),
                stats.week.as_u16(),
                stats.player_id.as_u64(),
                stats.season.as_u16(),
                stats.week.as_u16(),
                now,
                now
            ],
        )?;
        Ok(())
    }

    /// Delete all data from the database (used when a retrain is forced
    /// from a clean slate).
    pub fn clear_all_data(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM player_weekly_stats", [])?;
        self.conn.execute("DELETE FROM players", [])?;
        Ok(())
    }

    pub(crate) fn row_to_weekly_stats(&self, row: &Row) -> rusqlite::Result<PlayerWeeklyStats> {
        Ok(PlayerWeeklyStats {
            player_id: PlayerId::new(row.get(0)?),
            season: Season::new(row.get(1)?),
            week: Week::new(row.get(2)?),
            projected_points: row.get(3)?,
            actual_points: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}
