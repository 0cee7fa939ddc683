//! Thin demonstration binary for the simulation and decision core.
//!
//! Real league ingestion, sportsbook/weather fetching, the interactive
//! menu, and config file loading live in collaborators this crate only
//! consumes through narrow interfaces. This binary wires a couple of
//! those interfaces against small in-process `InMemoryLeagueContext`
//! fixtures so the library can be exercised end to end, following the
//! teacher's `clap`-derive, subcommand-dispatch shape (`main.rs` +
//! `commands/*`) without reimplementing anything it only consumes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use ffl_sim_core::alpha::AlphaSignalProvider;
use ffl_sim_core::config::AlphaConfig;
use ffl_sim_core::feeds::{FeedEnvelope, SnapshotStore};
use ffl_sim_core::league::{
    InMemoryLeagueContext, LeagueSettings, Player, PlayerId, Position, RosterSlots, ScheduledGame, Season, Team,
    TeamId, WeekOutcome,
};
use ffl_sim_core::montecarlo::{simulate_matchup, GaussianScoreModel, ScoreSampler};

#[derive(Debug, Parser)]
#[command(name = "ffl-sim", about = "Simulation and decision core demonstration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate one matchup between two fixture teams and report win
    /// probabilities, score distributions, and percentile ranges.
    SimulateMatchup {
        /// Number of Monte Carlo draws.
        #[clap(long, default_value_t = 10_000)]
        num_simulations: u32,

        /// Root seed; identical seeds reproduce bitwise-identical
        /// aggregate statistics regardless of thread scheduling.
        #[clap(long, default_value_t = 42)]
        seed: u64,
    },

    /// Replay a small fixture league's past weeks through the as-of
    /// leakage guard and report baseline/alpha calibration.
    Backtest {
        #[clap(long, default_value_t = 1)]
        start_week: u32,

        #[clap(long, default_value_t = 2)]
        end_week: u32,

        #[clap(long, default_value_t = 10)]
        num_simulations: u32,

        #[clap(long, default_value_t = 7)]
        seed: u64,

        /// Directory to hold the feed snapshot store; a temp dir is used
        /// if omitted.
        #[clap(long)]
        snapshot_root: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::SimulateMatchup { num_simulations, seed } => run_simulate_matchup(num_simulations, seed),
        Command::Backtest {
            start_week,
            end_week,
            num_simulations,
            seed,
            snapshot_root,
        } => run_backtest_demo(start_week, end_week, num_simulations, seed, snapshot_root),
    }
}

/// Fixture scenario: team A mean 18 / stdev 4, team B mean 15 / stdev
/// 4, ten starters a side, seed 42 -> A's win probability lands around
/// 0.90-0.96.
fn run_simulate_matchup(num_simulations: u32, seed: u64) {
    let team_a: Vec<GaussianScoreModel> = (0..10).map(|_| GaussianScoreModel::new(18.0, 4.0)).collect();
    let team_b: Vec<GaussianScoreModel> = (0..10).map(|_| GaussianScoreModel::new(15.0, 4.0)).collect();

    let a_refs: Vec<&dyn ScoreSampler> = team_a.iter().map(|m| m as &dyn ScoreSampler).collect();
    let b_refs: Vec<&dyn ScoreSampler> = team_b.iter().map(|m| m as &dyn ScoreSampler).collect();

    let result = simulate_matchup(&a_refs, &b_refs, num_simulations, seed);

    log::info!(
        "simulated {num_simulations} matchups (seed {seed}): A win prob {:.4}",
        result.team_a_win_prob
    );
    println!(
        "{}",
        json!({
            "num_simulations": num_simulations,
            "seed": seed,
            "team_a_win_prob": result.team_a_win_prob,
            "team_b_win_prob": result.team_b_win_prob,
            "tie_prob": result.tie_prob,
            "team_a_mean": result.team_a_mean,
            "team_b_mean": result.team_b_mean,
            "team_a_percentiles": {
                "p10": result.team_a_percentiles.p10,
                "p50": result.team_a_percentiles.p50,
                "p90": result.team_a_percentiles.p90,
            },
            "team_b_percentiles": {
                "p10": result.team_b_percentiles.p10,
                "p50": result.team_b_percentiles.p50,
                "p90": result.team_b_percentiles.p90,
            },
        })
    );
}

const LEAGUE_ID: u32 = 1;
const YEAR: u16 = 2026;

fn fixture_player(id: u64, name: &str, position: Position, pro_team: u32, opponent: u32, base: f64) -> Player {
    let mut p = Player::new(PlayerId::new(id), name, position)
        .unwrap()
        .with_injury_status(None)
        .with_percent_started(55.0);
    p.pro_team_id = Some(TeamId::new(pro_team));
    for week in 1..=5u32 {
        let wobble = (week as f64 - 3.0) * 0.6;
        p = p
            .with_scored_week(week, (base + wobble).max(0.0), Some(base))
            .expect("fixture weekly score is valid");
    }
    p.with_schedule_entry(
        3,
        ScheduledGame {
            opponent_team_id: TeamId::new(opponent),
            kickoff: "2026-10-04T17:00:00Z".parse().unwrap(),
        },
    )
}

/// A two-team, six-player fixture league with five weeks of scored
/// history per player, used by the `backtest` subcommand in lieu of the
/// excluded league-ingestion collaborator.
fn fixture_league() -> InMemoryLeagueContext {
    let slots = RosterSlots {
        starters: vec![(Position::QB, 1), (Position::RB, 1), (Position::WR, 1)],
        flex_slots: 0,
        flex_eligible: vec![],
        bench_size: 0,
    };

    let settings = LeagueSettings {
        league_id: LEAGUE_ID,
        season: Season::new(YEAR),
        current_week: 3,
        regular_season_final_week: 3,
        total_weeks: 3,
        playoff_team_count: 2,
        roster_slots: slots,
        scoring_format_id: 1,
    };

    let mut sharks = Team::new(TeamId::new(1), "Sharks", "East");
    sharks.roster = vec![
        fixture_player(1, "Sharks QB", Position::QB, 1, 2, 22.0),
        fixture_player(2, "Sharks RB", Position::RB, 1, 2, 16.0),
        fixture_player(3, "Sharks WR", Position::WR, 1, 2, 14.0),
    ];
    sharks.schedule = vec![TeamId::new(2); 3];
    sharks.outcomes = BTreeMap::from([(1, WeekOutcome::Win), (2, WeekOutcome::Loss), (3, WeekOutcome::Undecided)]);
    sharks.scores = BTreeMap::from([(1, 55.0), (2, 48.0)]);

    let mut wolves = Team::new(TeamId::new(2), "Wolves", "West");
    wolves.roster = vec![
        fixture_player(4, "Wolves QB", Position::QB, 2, 1, 19.0),
        fixture_player(5, "Wolves RB", Position::RB, 2, 1, 15.0),
        fixture_player(6, "Wolves WR", Position::WR, 2, 1, 12.0),
    ];
    wolves.schedule = vec![TeamId::new(1); 3];
    wolves.outcomes = BTreeMap::from([(1, WeekOutcome::Loss), (2, WeekOutcome::Win), (3, WeekOutcome::Undecided)]);
    wolves.scores = BTreeMap::from([(1, 47.0), (2, 51.0)]);

    InMemoryLeagueContext::new(settings, vec![sharks, wolves])
}

fn run_backtest_demo(start_week: u32, end_week: u32, num_simulations: u32, seed: u64, snapshot_root: Option<PathBuf>) {
    let league = fixture_league();
    let slots = league.settings.roster_slots.clone();

    let root = snapshot_root.unwrap_or_else(|| std::env::temp_dir().join("ffl-sim-demo-snapshots"));
    let store = SnapshotStore::new(&root);

    // Seed one weather record per week so the as-of leakage guard has
    // something to resolve instead of degrading every signal to neutral.
    for week in start_week..=end_week {
        let envelope = FeedEnvelope::new(
            json!({"wind_mph": 6.0, "dome": false, "precip_probability": 0.1}),
            "2026-10-01T12:00:00Z".parse().unwrap(),
            "2026-10-01T12:00:00Z".parse().unwrap(),
        );
        let _ = store.record(LEAGUE_ID, YEAR, week, "weather", &envelope);
    }

    let provider = AlphaSignalProvider::new();
    let alpha_config = AlphaConfig::default();

    let report = ffl_sim_core::backtest::run_backtest(
        &league,
        &store,
        &provider,
        &alpha_config,
        &slots,
        LEAGUE_ID,
        YEAR,
        start_week,
        end_week,
        &BTreeMap::new(),
        &BTreeMap::new(),
        num_simulations,
        seed,
    );

    log::info!(
        "backtest weeks {start_week}-{end_week}: baseline MAE {:.2}, alpha MAE {:.2}",
        report.baseline_mae,
        report.alpha_mae
    );
    println!(
        "{}",
        json!({
            "weeks_evaluated": report.weeks_evaluated,
            "baseline_mae": report.baseline_mae,
            "alpha_mae": report.alpha_mae,
            "alpha_lift": report.alpha_lift,
            "brier_score": report.brier_score,
            "reliability": report.reliability.iter().map(|b| json!({
                "bucket_lo": b.bucket_lo,
                "bucket_hi": b.bucket_hi,
                "predicted_count": b.predicted_count,
                "empirical_frequency": b.empirical_frequency,
            })).collect::<Vec<_>>(),
        })
    );
}
