//! Read/write path onto the persistent historical-stats cache that
//! per-player training and backtesting need: weekly actual points for
//! the season up to a requested cut, and actual points from box scores.
//! `LeagueContext` only has to expose the current snapshot's window;
//! this module is what lets a player's history accumulate across
//! snapshots/seasons instead of being refetched from the league
//! collaborator on every call.

use anyhow::Result;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::league::{Player, PlayerId, Season, Week};

use super::models::{Player as PlayerRow, PlayerWeeklyStats};
use super::schema::PlayerDatabase;

impl PlayerDatabase {
    /// Persist every scored week currently on `player` into the cache,
    /// merging rather than clobbering so a previous run's actuals for a
    /// week this snapshot no longer carries projections for survive.
    pub fn persist_player_actuals(&mut self, player: &Player, season: Season) -> Result<()> {
        self.upsert_player(&PlayerRow {
            player_id: player.player_id,
            name: player.name.clone(),
            position: player.position.to_string(),
            team: player.pro_team_id.map(|id| id.to_string()),
        })?;

        for (&week, score) in &player.scoring_history {
            self.merge_weekly_stats(&PlayerWeeklyStats {
                player_id: player.player_id,
                season,
                week: Week::new(week as u16),
                projected_points: score.projected_points,
                actual_points: Some(score.points),
                created_at: 0,
                updated_at: 0,
            })?;
        }
        Ok(())
    }

    /// Record (or overwrite) a single week's realized actual, e.g. once
    /// a box score finalizes after a backtest replay.
    pub fn record_actual(
        &mut self,
        player_id: PlayerId,
        season: Season,
        week: Week,
        actual_points: f64,
        projected_points: Option<f64>,
    ) -> Result<()> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        self.conn.execute(
            "INSERT INTO player_weekly_stats
                 (player_id, season, week, projected_points, actual_points, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(player_id, season, week) DO UPDATE SET
                 actual_points = ?5,
                 projected_points = COALESCE(?4, player_weekly_stats.projected_points),
                 updated_at = ?6",
            rusqlite::params![player_id.as_u64(), season.as_u16(), week.as_u16(), projected_points, actual_points, now],
        )?;
        Ok(())
    }

    /// Weekly actual points for `player_id` in `season`, for weeks at or
    /// before `through_week`, ordered by week — the cut C1's `train`
    /// extracts from and C8 compares box scores against.
    pub fn season_actuals(&self, player_id: PlayerId, season: Season, through_week: Week) -> Result<Vec<f64>> {
        let stats = self.get_player_season_stats(player_id, season)?;
        Ok(stats
            .into_iter()
            .filter(|s| s.week.as_u16() <= through_week.as_u16())
            .filter_map(|s| s.actual_points)
            .collect())
    }
}
