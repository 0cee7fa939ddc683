//! Free-agent recommendations. A whitelist injury filter, then each
//! surviving candidate is scored by how much it would lift
//! the optimal lineup's ROS value versus the weakest same-position
//! bench player it would replace.

use crate::league::{Player, Position, RosterSlots};
use crate::roster::select_optimal_lineup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn from_delta(delta: f64) -> Self {
        if delta >= 3.0 {
            Priority::High
        } else if delta >= 1.0 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

#[derive(Debug, Clone)]
pub struct FreeAgentRecommendation<'p> {
    pub candidate: &'p Player,
    pub delta_ros_pts_per_week: f64,
    pub recommended_drop: Option<&'p Player>,
    pub candidate_season_avg: f64,
    pub drop_season_avg: f64,
    pub ownership_percent: f64,
    pub priority: Priority,
}

fn season_avg(player: &Player, through_week: u32) -> f64 {
    let actuals = player.actuals_through(through_week);
    if actuals.is_empty() {
        0.0
    } else {
        actuals.iter().sum::<f64>() / actuals.len() as f64
    }
}

/// Rank free agents by ROS-value delta descending. `ros_pts_per_week`
/// is expected to be a precomputed lookup (typically backed by
/// `ros::ros_value`) so this routine never triggers its own sampling.
pub fn recommend_free_agents<'p>(
    roster: &'p [Player],
    free_agents: &[&'p Player],
    slots: &RosterSlots,
    ros_pts_per_week: impl Fn(&Player) -> f64,
    current_week: u32,
    top_n: u32,
    position_filter: Option<&[Position]>,
    exclude_injured: bool,
) -> Vec<FreeAgentRecommendation<'p>> {
    let whitelisted: Vec<&Player> = free_agents
        .iter()
        .copied()
        .filter(|p| !exclude_injured || p.is_healthy_for_waiver())
        .filter(|p| position_filter.map(|allowed| allowed.contains(&p.position)).unwrap_or(true))
        .collect();

    let current_lineup = select_optimal_lineup(roster, slots, &ros_pts_per_week);
    let starter_ids: std::collections::HashSet<_> =
        current_lineup.starter_players().map(|p| p.player_id).collect();
    let bench: Vec<&Player> = roster.iter().filter(|p| !starter_ids.contains(&p.player_id)).collect();

    let mut recommendations: Vec<FreeAgentRecommendation> = whitelisted
        .into_iter()
        .map(|candidate| {
            let weakest_bench = bench
                .iter()
                .copied()
                .filter(|p| p.position == candidate.position)
                .min_by(|a, b| {
                    ros_pts_per_week(a)
                        .partial_cmp(&ros_pts_per_week(b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });

            let candidate_ros = ros_pts_per_week(candidate);
            let drop_ros = weakest_bench.map(ros_pts_per_week).unwrap_or(0.0);
            let delta = candidate_ros - drop_ros;

            FreeAgentRecommendation {
                candidate,
                delta_ros_pts_per_week: delta,
                recommended_drop: weakest_bench,
                candidate_season_avg: season_avg(candidate, current_week),
                drop_season_avg: weakest_bench.map(|p| season_avg(p, current_week)).unwrap_or(0.0),
                ownership_percent: candidate.percent_started,
                priority: Priority::from_delta(delta),
            }
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.delta_ros_pts_per_week
            .partial_cmp(&a.delta_ros_pts_per_week)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    recommendations.truncate(top_n as usize);
    recommendations
}
