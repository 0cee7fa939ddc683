//! Trade analysis: ROS value deltas for both sides of a proposed
//! trade, a deterministic acceptance-probability heuristic, and a
//! bounded search over 1-for-1 / 2-for-1 combinations.

use crate::league::{Player, PlayerId, RosterSlots, Team};
use crate::ros::ros_roster_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeRecommendation {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub struct TradeAnalysis {
    pub my_value_change: f64,
    pub their_value_change: f64,
    pub advantage_margin: f64,
    pub uses_ros: bool,
    pub weeks_remaining: u32,
    pub acceptance_probability: f64,
    pub is_realistic: bool,
    pub recommendation: TradeRecommendation,
}

fn swap_players(team: &Team, give: &[PlayerId], receive: &[Player]) -> Team {
    let mut next = team.clone();
    next.roster.retain(|p| !give.contains(&p.player_id));
    next.roster.extend(receive.iter().cloned());
    next
}

/// Piecewise acceptance function. `their_value_before` is the
/// denominator for the percentage-loss bands; a team with zero ROS
/// value cannot suffer a percentage loss, so that branch falls back to
/// the deepest discount band.
fn acceptance_probability(my_change: f64, their_change: f64, their_value_before: f64, advantage_margin: f64) -> f64 {
    let raw = if my_change > 0.0 && their_change > 0.0 {
        // Base 70-95%, scaling up as their_change grows, saturating at
        // a 25-point gain.
        let scale = (their_change / 25.0).clamp(0.0, 1.0);
        0.70 + 0.25 * scale
    } else if my_change > 0.0 && their_change < 0.0 {
        if their_value_before <= 0.0 {
            0.05
        } else {
            let pct_loss = (-their_change / their_value_before) * 100.0;
            if pct_loss <= 2.0 {
                0.60
            } else if pct_loss <= 5.0 {
                0.40
            } else if pct_loss <= 10.0 {
                0.20
            } else {
                0.05
            }
        }
    } else if my_change < 0.0 && their_change < 0.0 {
        0.10
    } else {
        0.10
    };

    if advantage_margin.abs() > 15.0 {
        raw.min(0.10)
    } else {
        raw
    }
}

pub struct TradeInputs<'a> {
    pub my_team: &'a Team,
    pub their_team: &'a Team,
    pub my_players: &'a [PlayerId],
    pub their_players: &'a [PlayerId],
    pub slots: &'a RosterSlots,
    pub current_week: u32,
    pub reg_season_final_week: u32,
    pub min_advantage: f64,
    pub min_acceptance_probability: f64,
}

/// Analyze a single proposed trade. `pts_per_week` is a caller-supplied
/// ROS lookup so callers control whether it is backed by real Monte
/// Carlo ROS values or a simpler season average.
pub fn analyze_trade(inputs: &TradeInputs, pts_per_week: impl Fn(&Player) -> f64) -> TradeAnalysis {
    let weeks_remaining = if inputs.current_week > inputs.reg_season_final_week {
        0
    } else {
        inputs.reg_season_final_week - inputs.current_week + 1
    };

    let my_players: Vec<Player> = inputs
        .my_players
        .iter()
        .filter_map(|id| inputs.my_team.roster.iter().find(|p| p.player_id == *id).cloned())
        .collect();
    let their_players: Vec<Player> = inputs
        .their_players
        .iter()
        .filter_map(|id| inputs.their_team.roster.iter().find(|p| p.player_id == *id).cloned())
        .collect();

    let my_before = ros_roster_value(inputs.my_team, inputs.slots, &pts_per_week);
    let their_before = ros_roster_value(inputs.their_team, inputs.slots, &pts_per_week);

    let my_after_team = swap_players(inputs.my_team, inputs.my_players, &their_players);
    let their_after_team = swap_players(inputs.their_team, inputs.their_players, &my_players);
    let my_after = ros_roster_value(&my_after_team, inputs.slots, &pts_per_week);
    let their_after = ros_roster_value(&their_after_team, inputs.slots, &pts_per_week);

    let my_value_change = my_after.total - my_before.total;
    let their_value_change = their_after.total - their_before.total;
    let advantage_margin = my_value_change - their_value_change;

    let acceptance = acceptance_probability(my_value_change, their_value_change, their_before.total, advantage_margin);
    let is_realistic = acceptance >= inputs.min_acceptance_probability;
    let recommendation = if my_value_change >= inputs.min_advantage && is_realistic {
        TradeRecommendation::Accept
    } else {
        TradeRecommendation::Reject
    };

    TradeAnalysis {
        my_value_change,
        their_value_change,
        advantage_margin,
        uses_ros: true,
        weeks_remaining,
        acceptance_probability: acceptance,
        is_realistic,
        recommendation,
    }
}

/// Enumerate 1-for-1 and 2-for-1 trade combinations (from my side giving
/// 1 or 2 players for their 1), bounded by `max_total_opportunities` and
/// `max_trades_per_team`, returning only those whose acceptance
/// probability clears `min_acceptance_probability`.
pub fn search_trades(
    inputs_base: &TradeInputs,
    pts_per_week: impl Fn(&Player) -> f64 + Copy,
    max_trades_per_team: u32,
    max_total_opportunities: u32,
) -> Vec<(Vec<PlayerId>, Vec<PlayerId>, TradeAnalysis)> {
    let mut results = Vec::new();
    let mut per_team_count = 0u32;

    'outer: for my_player in &inputs_base.my_team.roster {
        for their_player in &inputs_base.their_team.roster {
            if per_team_count >= max_trades_per_team || results.len() as u32 >= max_total_opportunities {
                break 'outer;
            }
            let inputs = TradeInputs {
                my_players: std::slice::from_ref(&my_player.player_id),
                their_players: std::slice::from_ref(&their_player.player_id),
                ..clone_inputs(inputs_base)
            };
            let analysis = analyze_trade(&inputs, pts_per_week);
            if analysis.is_realistic {
                results.push((vec![my_player.player_id], vec![their_player.player_id], analysis));
                per_team_count += 1;
            }
        }
    }

    'outer2: for i in 0..inputs_base.my_team.roster.len() {
        for j in (i + 1)..inputs_base.my_team.roster.len() {
            for their_player in &inputs_base.their_team.roster {
                if per_team_count >= max_trades_per_team || results.len() as u32 >= max_total_opportunities {
                    break 'outer2;
                }
                let give = vec![
                    inputs_base.my_team.roster[i].player_id,
                    inputs_base.my_team.roster[j].player_id,
                ];
                let inputs = TradeInputs {
                    my_players: &give,
                    their_players: std::slice::from_ref(&their_player.player_id),
                    ..clone_inputs(inputs_base)
                };
                let analysis = analyze_trade(&inputs, pts_per_week);
                if analysis.is_realistic {
                    results.push((give, vec![their_player.player_id], analysis));
                    per_team_count += 1;
                }
            }
        }
    }

    results
}

fn clone_inputs<'a>(base: &TradeInputs<'a>) -> TradeInputs<'a> {
    TradeInputs {
        my_team: base.my_team,
        their_team: base.their_team,
        my_players: base.my_players,
        their_players: base.their_players,
        slots: base.slots,
        current_week: base.current_week,
        reg_season_final_week: base.reg_season_final_week,
        min_advantage: base.min_advantage,
        min_acceptance_probability: base.min_acceptance_probability,
    }
}
