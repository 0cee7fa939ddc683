//! Row types for the storage layer.

use crate::league::{PlayerId, Season, Week};
use serde::{Deserialize, Serialize};

/// Player identity row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    pub position: String,
    pub team: Option<String>,
}

/// One week's projected/actual points for a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerWeeklyStats {
    pub player_id: PlayerId,
    pub season: Season,
    pub week: Week,
    pub projected_points: Option<f64>,
    pub actual_points: Option<f64>,
    pub created_at: u64,
    pub updated_at: u64,
}
