//! Draft strategy comparison (spec §4.6): simulate a season once per
//! preset roster template and compare the resulting metric
//! distributions. Each strategy gets its own deep copy of the league
//! context so mutating one team's roster for one strategy can never
//! bleed into another (spec: "use deep copies of team-rating payloads
//! per strategy to prevent mutation bleed").

use std::collections::BTreeMap;

use crate::league::{InMemoryLeagueContext, LeagueContext, Player, RosterSlots, TeamId};
use crate::montecarlo::ratings::{build_team_rating, TeamRating};
use crate::montecarlo::season::{simulate_season, SeasonProjection};

#[derive(Debug, Clone)]
pub struct DraftStrategy {
    pub label: String,
    pub roster_template: Vec<Player>,
}

#[derive(Debug, Clone, Copy)]
pub struct DraftStrategyOutcome {
    pub expected_wins: f64,
    pub playoff_probability: f64,
    pub championship_probability: f64,
}

/// Run one season simulation per strategy, each with `team_id`'s roster
/// swapped for `roster_template`, holding every other team's rating
/// fixed. The same `seed` is reused across strategies on purpose
/// (common random numbers): it makes the strategies' outcome deltas
/// comparable instead of being dominated by independent sampling noise.
pub fn compare_draft_strategies(
    base_league: &InMemoryLeagueContext,
    team_id: TeamId,
    strategies: &[DraftStrategy],
    other_team_ratings: &BTreeMap<TeamId, TeamRating>,
    slots: &RosterSlots,
    player_rating: impl Fn(&Player) -> (f64, f64) + Copy,
    score_variance_floor: f64,
    num_simulations: u32,
    seed: u64,
) -> Vec<(String, DraftStrategyOutcome)> {
    strategies
        .iter()
        .map(|strategy| {
            let mut league = base_league.clone();
            if let Some(team) = league.teams.iter_mut().find(|t| t.team_id == team_id) {
                team.roster = strategy.roster_template.clone();
            }

            let mut ratings = other_team_ratings.clone();
            if let Some(team) = league.team(team_id) {
                let rating = build_team_rating(team, slots, player_rating, score_variance_floor);
                ratings.insert(team_id, rating);
            }

            let projection: SeasonProjection = simulate_season(&league, &ratings, num_simulations, seed);
            let outcome = DraftStrategyOutcome {
                expected_wins: *projection.expected_wins.get(&team_id).unwrap_or(&0.0),
                playoff_probability: *projection.playoff_probability.get(&team_id).unwrap_or(&0.0),
                championship_probability: *projection.championship_probability.get(&team_id).unwrap_or(&0.0),
            };
            (strategy.label.clone(), outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{LeagueSettings, Player, PlayerId, Position, Season, Team, WeekOutcome};

    fn team(id: u32, roster: Vec<Player>) -> Team {
        let mut t = Team::new(TeamId::new(id), format!("Team {id}"), "East");
        t.roster = roster;
        t.schedule = vec![TeamId::new(if id == 1 { 2 } else { 1 }); 3];
        t.outcomes = (1..=3u32).map(|w| (w, WeekOutcome::Undecided)).collect();
        t
    }

    fn qb(id: u64) -> Player {
        Player::new(PlayerId::new(id), format!("QB{id}"), Position::QB).unwrap()
    }

    #[test]
    fn different_strategies_can_yield_different_outcomes() {
        let settings = LeagueSettings {
            league_id: 1,
            season: Season::new(2026),
            current_week: 1,
            regular_season_final_week: 3,
            total_weeks: 3,
            playoff_team_count: 2,
            roster_slots: RosterSlots {
                starters: vec![(Position::QB, 1)],
                flex_slots: 0,
                flex_eligible: vec![],
                bench_size: 0,
            },
            scoring_format_id: 1,
        };
        let league = InMemoryLeagueContext::new(
            settings,
            vec![team(1, vec![qb(1)]), team(2, vec![qb(2)])],
        );
        let slots = RosterSlots {
            starters: vec![(Position::QB, 1)],
            flex_slots: 0,
            flex_eligible: vec![],
            bench_size: 0,
        };
        let mut other_ratings = BTreeMap::new();
        other_ratings.insert(TeamId::new(2), TeamRating { mean: 20.0, stdev: 4.0 });

        let strong = DraftStrategy { label: "stud-rb".into(), roster_template: vec![qb(10)] };
        let weak = DraftStrategy { label: "punt-qb".into(), roster_template: vec![qb(11)] };

        let ratings_fn = |p: &Player| if p.player_id.as_u64() == 10 { (40.0, 4.0) } else { (5.0, 4.0) };

        let results = compare_draft_strategies(
            &league,
            TeamId::new(1),
            &[strong, weak],
            &other_ratings,
            &slots,
            ratings_fn,
            4.0,
            500,
            1,
        );

        assert_eq!(results.len(), 2);
        let strong_wins = results[0].1.expected_wins;
        let weak_wins = results[1].1.expected_wins;
        assert!(strong_wins >= weak_wins);
    }
}
