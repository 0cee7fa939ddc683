//! Single-matchup simulation (spec §4.6, testable property 3 and
//! scenario 1): draw every starter's score from its own `ScoreSampler`,
//! sum to a team total, and repeat `num_simulations` times.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::montecarlo::sampler::ScoreSampler;
use crate::montecarlo::{chunk_len, chunk_seed, num_chunks, percentile_sorted, DEFAULT_CHUNK_SIZE};

#[derive(Debug, Clone, Copy)]
pub struct PercentileRange {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchupResult {
    pub team_a_win_prob: f64,
    pub team_b_win_prob: f64,
    pub tie_prob: f64,
    pub team_a_mean: f64,
    pub team_b_mean: f64,
    pub team_a_percentiles: PercentileRange,
    pub team_b_percentiles: PercentileRange,
}

struct ChunkOutcome {
    a_wins: u32,
    b_wins: u32,
    ties: u32,
    a_scores: Vec<f64>,
    b_scores: Vec<f64>,
}

/// Run `num_simulations` independent draws of both lineups, deterministic
/// for a given `seed` regardless of the number of rayon worker threads
/// (spec §5 / testable property 3): simulations are split into
/// fixed-size chunks, each chunk reseeded from `chunk_seed(seed, idx)`
/// and run independently, then aggregated in chunk-index order.
pub fn simulate_matchup(
    team_a: &[&dyn ScoreSampler],
    team_b: &[&dyn ScoreSampler],
    num_simulations: u32,
    seed: u64,
) -> MatchupResult {
    let chunk_size = DEFAULT_CHUNK_SIZE.min(num_simulations.max(1));
    let chunks = num_chunks(num_simulations, chunk_size);

    let outcomes: Vec<ChunkOutcome> = (0..chunks)
        .into_par_iter()
        .map(|chunk_index| {
            let len = chunk_len(chunk_index, chunks, num_simulations, chunk_size);
            let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed(seed, chunk_index as u64));
            let mut outcome = ChunkOutcome {
                a_wins: 0,
                b_wins: 0,
                ties: 0,
                a_scores: Vec::with_capacity(len as usize),
                b_scores: Vec::with_capacity(len as usize),
            };
            for _ in 0..len {
                let a_total: f64 = team_a.iter().map(|s| s.draw(&mut rng)).sum();
                let b_total: f64 = team_b.iter().map(|s| s.draw(&mut rng)).sum();
                if a_total > b_total {
                    outcome.a_wins += 1;
                } else if b_total > a_total {
                    outcome.b_wins += 1;
                } else {
                    outcome.ties += 1;
                }
                outcome.a_scores.push(a_total);
                outcome.b_scores.push(b_total);
            }
            outcome
        })
        .collect();

    let mut a_wins = 0u32;
    let mut b_wins = 0u32;
    let mut ties = 0u32;
    let mut a_scores = Vec::with_capacity(num_simulations as usize);
    let mut b_scores = Vec::with_capacity(num_simulations as usize);
    for outcome in outcomes {
        a_wins += outcome.a_wins;
        b_wins += outcome.b_wins;
        ties += outcome.ties;
        a_scores.extend(outcome.a_scores);
        b_scores.extend(outcome.b_scores);
    }

    let n = num_simulations.max(1) as f64;
    a_scores.sort_by(|x, y| x.partial_cmp(y).unwrap());
    b_scores.sort_by(|x, y| x.partial_cmp(y).unwrap());

    MatchupResult {
        team_a_win_prob: a_wins as f64 / n,
        team_b_win_prob: b_wins as f64 / n,
        tie_prob: ties as f64 / n,
        team_a_mean: a_scores.iter().sum::<f64>() / n,
        team_b_mean: b_scores.iter().sum::<f64>() / n,
        team_a_percentiles: PercentileRange {
            p10: percentile_sorted(&a_scores, 0.10),
            p50: percentile_sorted(&a_scores, 0.50),
            p90: percentile_sorted(&a_scores, 0.90),
        },
        team_b_percentiles: PercentileRange {
            p10: percentile_sorted(&b_scores, 0.10),
            p50: percentile_sorted(&b_scores, 0.50),
            p90: percentile_sorted(&b_scores, 0.90),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::montecarlo::sampler::GaussianScoreModel;

    /// Scenario 1 (spec §8): Team A with 10 starters of mean 18 stdev 4
    /// vs Team B with 10 starters of mean 15 stdev 4, seed 42, N=10,000,
    /// Team A's win probability in [0.90, 0.96]. A single-starter-per-side
    /// comparison would only reach ~0.70 (the variance of a 10-player sum
    /// grows slower than its mean), so the full 10-starter lineup is what
    /// the band in spec §8 actually describes.
    #[test]
    fn scenario_one_win_probability_band() {
        let a = GaussianScoreModel::new(18.0, 4.0);
        let b = GaussianScoreModel::new(15.0, 4.0);
        let team_a: Vec<&dyn ScoreSampler> = (0..10).map(|_| &a as &dyn ScoreSampler).collect();
        let team_b: Vec<&dyn ScoreSampler> = (0..10).map(|_| &b as &dyn ScoreSampler).collect();
        let result = simulate_matchup(&team_a, &team_b, 10_000, 42);
        assert!(
            (0.90..=0.96).contains(&result.team_a_win_prob),
            "win prob {} not in expected band",
            result.team_a_win_prob
        );
    }

    #[test]
    fn same_seed_gives_bitwise_identical_results() {
        let a = GaussianScoreModel::new(20.0, 5.0);
        let b = GaussianScoreModel::new(20.0, 5.0);
        let team_a: Vec<&dyn ScoreSampler> = vec![&a];
        let team_b: Vec<&dyn ScoreSampler> = vec![&b];
        let first = simulate_matchup(&team_a, &team_b, 5_000, 7);
        let second = simulate_matchup(&team_a, &team_b, 5_000, 7);
        assert_eq!(first.team_a_win_prob, second.team_a_win_prob);
        assert_eq!(first.team_a_mean, second.team_a_mean);
        assert_eq!(first.team_a_percentiles.p50, second.team_a_percentiles.p50);
    }

    #[test]
    fn win_and_loss_and_tie_probabilities_sum_to_one() {
        let a = GaussianScoreModel::new(20.0, 5.0);
        let b = GaussianScoreModel::new(20.0, 5.0);
        let team_a: Vec<&dyn ScoreSampler> = vec![&a];
        let team_b: Vec<&dyn ScoreSampler> = vec![&b];
        let result = simulate_matchup(&team_a, &team_b, 2_000, 1);
        let total = result.team_a_win_prob + result.team_b_win_prob + result.tie_prob;
        assert!((total - 1.0).abs() < 1e-9);
    }
}
