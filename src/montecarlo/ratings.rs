//! Team-level rating (spec §4.6 "Team ratings"): a Normal approximation
//! used as the fast path for season/playoff/draft-scale simulation,
//! where drawing every starter from its own GMM every iteration would
//! not pay for itself the way it does for the single-matchup query.

use crate::league::{Player, RosterSlots, Team};
use crate::roster::select_optimal_lineup;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamRating {
    pub mean: f64,
    pub stdev: f64,
}

/// Build a team's Normal rating: mean is the sum of its optimal
/// starters' means, stdev is the square root of the sum of their
/// variances, floored at `score_variance_floor`. Spec §4.6 names the
/// floor on the resulting stdev, not the pre-sum variance, so that is
/// what is applied here (see design notes on this Open Question).
pub fn build_team_rating(
    team: &Team,
    slots: &RosterSlots,
    player_rating: impl Fn(&Player) -> (f64, f64),
    score_variance_floor: f64,
) -> TeamRating {
    let lineup = select_optimal_lineup(&team.roster, slots, |p| player_rating(p).0);

    let mean: f64 = lineup.starter_players().map(|p| player_rating(p).0).sum();
    let variance: f64 = lineup.starter_players().map(|p| player_rating(p).1.powi(2)).sum();
    let stdev = variance.sqrt().max(score_variance_floor);

    TeamRating { mean, stdev }
}

/// A preseason or external prior rating, blended with the in-season
/// rating per `ratings_blend` (spec §4.6/§6: `simulation.ratings_blend`,
/// 0.0 meaning "ignore the prior entirely").
#[derive(Debug, Clone, Copy)]
pub struct PriorRating {
    pub mean: f64,
    pub stdev: f64,
}

/// `rating' = (1 - blend) * rating + blend * prior`, applied
/// independently to mean and stdev.
pub fn blend_with_prior(rating: TeamRating, prior: PriorRating, blend: f64) -> TeamRating {
    let blend = blend.clamp(0.0, 1.0);
    TeamRating {
        mean: (1.0 - blend) * rating.mean + blend * prior.mean,
        stdev: (1.0 - blend) * rating.stdev + blend * prior.stdev,
    }
}
