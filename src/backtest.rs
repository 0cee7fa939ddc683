//! Backtest evaluator. Replays historical weeks through the feed
//! store's as-of resolution, compares baseline and alpha-adjusted
//! projections to realized box scores, and reports calibration of the
//! win-probability predictions the Monte Carlo engine would have
//! produced at the time.

use std::collections::BTreeMap;

use crate::alpha::{AlphaSignalProvider, SignalContext};
use crate::config::AlphaConfig;
use crate::feeds::asof::resolve_as_of;
use crate::feeds::SnapshotStore;
use crate::league::{LeagueContext, Player, RosterSlots, TeamId, WeekOutcome};
use crate::montecarlo::sampler::GaussianScoreModel;
use crate::montecarlo::{simulate_matchup, ScoreSampler};

/// The five feed domains the alpha signal provider reads.
const FEED_DOMAINS: &[&str] = &["weather", "market", "odds", "injury_news", "nextgenstats"];

#[derive(Debug, Clone, Copy)]
pub struct ReliabilityBucket {
    pub bucket_lo: f64,
    pub bucket_hi: f64,
    pub predicted_count: u32,
    pub empirical_frequency: f64,
}

#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub weeks_evaluated: u32,
    pub baseline_mae: f64,
    pub alpha_mae: f64,
    pub alpha_lift: f64,
    pub brier_score: f64,
    pub reliability: Vec<ReliabilityBucket>,
}

/// One week's per-player projection-vs-actual errors, accumulated by
/// the caller across the backtest window.
struct WeekErrors {
    baseline_abs_errors: Vec<f64>,
    alpha_abs_errors: Vec<f64>,
    win_predictions: Vec<(f64, bool)>,
}

/// Earliest scheduled kickoff across all rostered players in `week`,
/// used as the as-of anchor: `as_of = kickoff(w) - publication_lag`.
/// Leagues with no scheduled kickoff data for that week fall back to
/// `None`, which resolves feeds as "no cutoff" / latest.
fn earliest_kickoff(league: &dyn LeagueContext, week: u32) -> Option<chrono::DateTime<chrono::Utc>> {
    league
        .teams()
        .iter()
        .flat_map(|t| t.roster.iter())
        .filter_map(|p| p.schedule.get(&week))
        .map(|g| g.kickoff)
        .min()
}

fn resolve_week_feeds(
    store: &SnapshotStore,
    league_id: u32,
    year: u16,
    week: u32,
    as_of: Option<chrono::DateTime<chrono::Utc>>,
    max_staleness_seconds_by_feed: &BTreeMap<String, i64>,
) -> BTreeMap<String, crate::feeds::FeedEnvelope> {
    FEED_DOMAINS
        .iter()
        .map(|&name| {
            let max_staleness = max_staleness_seconds_by_feed.get(name).copied();
            let envelope = resolve_as_of(store, league_id, year, week, name, as_of, max_staleness);
            (name.to_string(), envelope)
        })
        .collect()
}

fn week_player_errors(
    league: &dyn LeagueContext,
    provider: &AlphaSignalProvider,
    alpha_config: &AlphaConfig,
    feeds: &BTreeMap<String, crate::feeds::FeedEnvelope>,
    week: u32,
) -> (Vec<f64>, Vec<f64>, BTreeMap<crate::league::PlayerId, (f64, f64)>) {
    let box_scores = league.box_scores(week);
    let mut baseline_errors = Vec::new();
    let mut alpha_errors = Vec::new();
    let mut projections = BTreeMap::new();

    for team in league.teams() {
        for player in &team.roster {
            let Some(&actual) = box_scores.get(&player.player_id) else { continue };
            let baseline = player.projected_points(week).unwrap_or(0.0);

            let ctx = SignalContext {
                player,
                league,
                week,
                feeds: feeds.clone(),
                config: alpha_config,
            };
            let adjustment = provider.compute(&ctx);
            let blended = (baseline + adjustment.delta_mean_points) * adjustment.matchup_multiplier;
            let blended = blended.max(0.0);

            baseline_errors.push((baseline - actual).abs());
            alpha_errors.push((blended - actual).abs());
            projections.insert(player.player_id, (blended, crate::blend::baseline_stdev(player.position)));
        }
    }

    (baseline_errors, alpha_errors, projections)
}

/// Predicted win probability and realized outcome for every decided
/// matchup in `week`, using a single-draw-per-starter Monte Carlo over
/// each side's blended projections (`projections`, from
/// `week_player_errors`) as the `ScoreSampler` inputs.
fn week_win_predictions(
    league: &dyn LeagueContext,
    week: u32,
    projections: &BTreeMap<crate::league::PlayerId, (f64, f64)>,
    slots: &RosterSlots,
    num_simulations: u32,
    seed: u64,
) -> Vec<(f64, bool)> {
    let mut predictions = Vec::new();
    for team in league.teams() {
        let Some(&opponent_id) = team.schedule.get((week as usize).saturating_sub(1)) else { continue };
        if opponent_id >= team.team_id {
            continue;
        }
        let Some(opponent) = league.team(opponent_id) else { continue };
        let outcome = team.outcomes.get(&week);
        if !matches!(outcome, Some(WeekOutcome::Win | WeekOutcome::Loss | WeekOutcome::Tie)) {
            continue;
        }

        let my_lineup = crate::roster::select_optimal_lineup(&team.roster, slots, |p| {
            projections.get(&p.player_id).map(|(mean, _)| *mean).unwrap_or(0.0)
        });
        let their_lineup = crate::roster::select_optimal_lineup(&opponent.roster, slots, |p| {
            projections.get(&p.player_id).map(|(mean, _)| *mean).unwrap_or(0.0)
        });

        let my_models: Vec<GaussianScoreModel> = my_lineup
            .starter_players()
            .map(|p| {
                let (mean, stdev) = projections.get(&p.player_id).copied().unwrap_or((0.0, 5.0));
                GaussianScoreModel::new(mean, stdev)
            })
            .collect();
        let their_models: Vec<GaussianScoreModel> = their_lineup
            .starter_players()
            .map(|p| {
                let (mean, stdev) = projections.get(&p.player_id).copied().unwrap_or((0.0, 5.0));
                GaussianScoreModel::new(mean, stdev)
            })
            .collect();

        let my_samplers: Vec<&dyn ScoreSampler> = my_models.iter().map(|m| m as &dyn ScoreSampler).collect();
        let their_samplers: Vec<&dyn ScoreSampler> = their_models.iter().map(|m| m as &dyn ScoreSampler).collect();

        let result = simulate_matchup(&my_samplers, &their_samplers, num_simulations, seed ^ (team.team_id.as_u32() as u64));
        let realized_win = matches!(team.outcomes.get(&week), Some(WeekOutcome::Win));
        predictions.push((result.team_a_win_prob, realized_win));
    }
    predictions
}

fn build_reliability_table(predictions: &[(f64, bool)]) -> Vec<ReliabilityBucket> {
    const BUCKETS: usize = 10;
    let mut counts = vec![0u32; BUCKETS];
    let mut wins = vec![0u32; BUCKETS];
    for &(prob, win) in predictions {
        let idx = ((prob * BUCKETS as f64) as usize).min(BUCKETS - 1);
        counts[idx] += 1;
        if win {
            wins[idx] += 1;
        }
    }
    (0..BUCKETS)
        .map(|i| ReliabilityBucket {
            bucket_lo: i as f64 / BUCKETS as f64,
            bucket_hi: (i + 1) as f64 / BUCKETS as f64,
            predicted_count: counts[i],
            empirical_frequency: if counts[i] > 0 { wins[i] as f64 / counts[i] as f64 } else { 0.0 },
        })
        .collect()
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

fn brier_score(predictions: &[(f64, bool)]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let sum: f64 = predictions
        .iter()
        .map(|&(p, win)| {
            let outcome = if win { 1.0 } else { 0.0 };
            (p - outcome).powi(2)
        })
        .sum();
    sum / predictions.len() as f64
}

/// Run the backtest over `[start_week, end_week]` inclusive. Every feed
/// read inside this window goes through `resolve_as_of`, so no
/// publish-time-after-cutoff record can leak into a projection.
pub fn run_backtest(
    league: &dyn LeagueContext,
    store: &SnapshotStore,
    provider: &AlphaSignalProvider,
    alpha_config: &AlphaConfig,
    slots: &RosterSlots,
    league_id: u32,
    year: u16,
    start_week: u32,
    end_week: u32,
    publication_lag_seconds_by_feed: &BTreeMap<String, i64>,
    max_staleness_seconds_by_feed: &BTreeMap<String, i64>,
    num_simulations: u32,
    seed: u64,
) -> BacktestReport {
    let mut all_baseline_errors = Vec::new();
    let mut all_alpha_errors = Vec::new();
    let mut all_predictions = Vec::new();
    let mut weeks_evaluated = 0u32;

    for week in start_week..=end_week {
        let kickoff = earliest_kickoff(league, week);
        let as_of = kickoff.map(|k| {
            let max_lag = publication_lag_seconds_by_feed.values().copied().max().unwrap_or(0);
            k - chrono::Duration::seconds(max_lag)
        });

        let feeds = resolve_week_feeds(store, league_id, year, week, as_of, max_staleness_seconds_by_feed);
        let (baseline_errors, alpha_errors, projections) =
            week_player_errors(league, provider, alpha_config, &feeds, week);
        if baseline_errors.is_empty() {
            continue;
        }
        weeks_evaluated += 1;
        all_baseline_errors.extend(baseline_errors);
        all_alpha_errors.extend(alpha_errors);

        let predictions = week_win_predictions(league, week, &projections, slots, num_simulations, seed);
        all_predictions.extend(predictions);
    }

    let baseline_mae = mean(&all_baseline_errors);
    let alpha_mae = mean(&all_alpha_errors);

    BacktestReport {
        weeks_evaluated,
        baseline_mae,
        alpha_mae,
        alpha_lift: baseline_mae - alpha_mae,
        brier_score: brier_score(&all_predictions),
        reliability: build_reliability_table(&all_predictions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{InMemoryLeagueContext, LeagueSettings, Player, PlayerId, Position, Season, Team, WeekOutcome};

    fn league_with_one_decided_week() -> InMemoryLeagueContext {
        let mut team_a = Team::new(TeamId::new(1), "A", "East");
        let mut qb_a = Player::new(PlayerId::new(1), "QB A", Position::QB)
            .unwrap()
            .with_scored_week(1, 20.0, Some(18.0))
            .unwrap();
        qb_a.schedule.insert(
            1,
            crate::league::ScheduledGame { opponent_team_id: TeamId::new(2), kickoff: chrono::Utc::now() },
        );
        team_a.roster = vec![qb_a];
        team_a.schedule = vec![TeamId::new(2)];
        team_a.scores.insert(1, 20.0);
        team_a.outcomes.insert(1, WeekOutcome::Win);

        let mut team_b = Team::new(TeamId::new(2), "B", "West");
        let qb_b = Player::new(PlayerId::new(2), "QB B", Position::QB)
            .unwrap()
            .with_scored_week(1, 10.0, Some(12.0))
            .unwrap();
        team_b.roster = vec![qb_b];
        team_b.schedule = vec![TeamId::new(1)];
        team_b.scores.insert(1, 10.0);
        team_b.outcomes.insert(1, WeekOutcome::Loss);

        InMemoryLeagueContext::new(
            LeagueSettings {
                league_id: 1,
                season: Season::new(2026),
                current_week: 2,
                regular_season_final_week: 14,
                total_weeks: 1,
                playoff_team_count: 2,
                roster_slots: RosterSlots { starters: vec![(Position::QB, 1)], flex_slots: 0, flex_eligible: vec![], bench_size: 0 },
                scoring_format_id: 1,
            },
            vec![team_a, team_b],
        )
    }

    #[test]
    fn backtest_reports_nonzero_mae_and_bounded_brier_score() {
        let league = league_with_one_decided_week();
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let provider = AlphaSignalProvider::new();
        let alpha_config = AlphaConfig::default();
        let slots = RosterSlots { starters: vec![(Position::QB, 1)], flex_slots: 0, flex_eligible: vec![], bench_size: 0 };

        let report = run_backtest(
            &league,
            &store,
            &provider,
            &alpha_config,
            &slots,
            1,
            2026,
            1,
            1,
            &BTreeMap::new(),
            &BTreeMap::new(),
            200,
            7,
        );

        assert_eq!(report.weeks_evaluated, 1);
        assert!(report.baseline_mae >= 0.0);
        assert!(report.brier_score >= 0.0 && report.brier_score <= 1.0);
        assert_eq!(report.reliability.len(), 10);
    }
}
