//! C5: Opponent Strength & ROS Valuator (spec §4.5).
//!
//! Opponent strength reuses `alpha::signals::position_points_allowed_multiplier`
//! directly — spec §4.3's `matchup_unit` signal and spec §4.5's ROS
//! valuator compute the exact same points-allowed-to-position ratio, so
//! this module calls the same function rather than re-deriving it.

use rand_chacha::ChaCha8Rng;

use crate::alpha::signals::position_points_allowed_multiplier;
use crate::league::{LeagueContext, Player, RosterSlots, Team};
use crate::model::PlayerPerformanceModel;

/// Where `ros_value` draws a week's base points from: a trained C1
/// model (predictive draw with state bias) or, when C1 training failed
/// (spec §4.1 `InsufficientData`), a fixed fallback mean — "ESPN
/// projected average" per spec §4.5.
pub enum RosBaseSource<'a> {
    Model(&'a PlayerPerformanceModel),
    FallbackMean(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct WeeklyRosContribution {
    pub week: u32,
    pub base_points: f64,
    pub multiplier: f64,
    pub no_schedule: bool,
    pub thin_dvp: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerRosValue {
    pub pts_per_week: f64,
    pub weekly_contributions: Vec<WeeklyRosContribution>,
    /// Boundary case (spec §8): current week beyond the regular-season
    /// final week yields an empty horizon, `pts_per_week = 0.0`.
    pub empty_horizon: bool,
}

/// ROS value of a single player (spec §4.5): sum over
/// `[current_week, reg_season_final_week]` of `base(player, w) ×
/// multiplier(position, opponent(player, w))`, divided by the number of
/// weeks in the horizon.
pub fn ros_value(
    player: &Player,
    league: &dyn LeagueContext,
    source: RosBaseSource,
    current_week: u32,
    reg_season_final_week: u32,
    rng: &mut ChaCha8Rng,
) -> PlayerRosValue {
    if current_week > reg_season_final_week {
        return PlayerRosValue {
            pts_per_week: 0.0,
            weekly_contributions: Vec::new(),
            empty_horizon: true,
        };
    }

    let mut contributions = Vec::with_capacity((reg_season_final_week - current_week + 1) as usize);
    let mut total = 0.0;

    for week in current_week..=reg_season_final_week {
        let base = match &source {
            RosBaseSource::Model(model) => model.sample(rng, true),
            RosBaseSource::FallbackMean(mean) => *mean,
        };

        let (multiplier, no_schedule, thin_dvp) = match player.schedule.get(&week) {
            Some(game) => {
                let (m, thin) = position_points_allowed_multiplier(
                    league,
                    player.position,
                    game.opponent_team_id,
                    current_week.saturating_sub(1),
                );
                (m, false, thin)
            }
            None => (1.0, true, false),
        };

        let value = base * multiplier;
        total += value;
        contributions.push(WeeklyRosContribution {
            week,
            base_points: base,
            multiplier,
            no_schedule,
            thin_dvp,
        });
    }

    let weeks = (reg_season_final_week - current_week + 1) as f64;
    PlayerRosValue {
        pts_per_week: total / weeks,
        weekly_contributions: contributions,
        empty_horizon: false,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RosterRosValue {
    pub starters_value: f64,
    pub bench_value: f64,
    pub total: f64,
}

/// ROS roster value (spec §4.5): sum of the optimal starting lineup's
/// ROS values (each scaled by the position's scarcity weight) plus 0.3x
/// the ROS values of the bench. `player_pts_per_week` is typically a
/// precomputed map from `ros_value` so the expensive per-player
/// computation runs once regardless of how many times a player is
/// considered across starters/bench.
pub fn ros_roster_value(
    team: &Team,
    slots: &RosterSlots,
    player_pts_per_week: impl Fn(&Player) -> f64,
) -> RosterRosValue {
    let lineup = crate::roster::select_optimal_lineup(&team.roster, slots, &player_pts_per_week);

    let starters_value: f64 = lineup
        .starter_players()
        .map(|p| player_pts_per_week(p) * p.position.scarcity_weight())
        .sum();
    let bench_value: f64 = lineup.bench.iter().map(|p| player_pts_per_week(p) * 0.3).sum();

    RosterRosValue {
        starters_value,
        bench_value,
        total: starters_value + bench_value,
    }
}
