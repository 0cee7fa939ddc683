//! Training and prediction entry points for C1 (spec §4.1).

use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::league::Player;
use crate::model::gmm::{deterministic_seed, fit_em, GaussianMixture, StateLabel};
use crate::model::state::detect_state;
use crate::model::store::{CachedPlayerModel, PlayerModelStore, MODEL_CACHE_SCHEMA_VERSION};

/// Minimum valid weeks of history required to fit a mixture (spec §4.1:
/// "fewer than 5 valid weeks of history" triggers `InsufficientData`).
pub const MIN_TRAINING_WEEKS: usize = 5;

/// A fitted model plus the state label assigned from recent form, ready
/// for Monte Carlo sampling.
#[derive(Debug, Clone)]
pub struct PlayerPerformanceModel {
    pub player_id: u64,
    pub year: u16,
    pub mixture: GaussianMixture,
    pub current_state: StateLabel,
}

impl PlayerPerformanceModel {
    /// Draw one projected score. `state_biased` selects spec §4.1's
    /// 70/30 state-weighted sampling instead of the unconditional mixture.
    pub fn sample(&self, rng: &mut rand_chacha::ChaCha8Rng, state_biased: bool) -> f64 {
        if state_biased {
            self.mixture.sample_state_biased(rng, self.current_state)
        } else {
            self.mixture.sample(rng)
        }
    }

    pub fn mean_projection(&self) -> f64 {
        self.mixture.season_mean()
    }
}

/// Fit a single player's mixture from actuals through `as_of_week`,
/// classify current state from the trailing `recent_weeks` window, and
/// return a ready-to-sample model. Fails with `InsufficientData` below
/// `MIN_TRAINING_WEEKS`.
pub fn train(player: &Player, year: u16, as_of_week: u32, recent_weeks: u32) -> Result<PlayerPerformanceModel> {
    let samples = player.actuals_through(as_of_week);
    if samples.len() < MIN_TRAINING_WEEKS {
        return Err(SimError::InsufficientData {
            player_id: player.player_id.as_u64(),
            weeks_available: samples.len(),
            weeks_required: MIN_TRAINING_WEEKS,
        });
    }

    let seed = deterministic_seed(player.player_id.as_u64(), year);
    let mixture = fit_em(&samples, seed)?;

    let window = recent_weeks.max(1) as usize;
    let recent: Vec<f64> = samples.iter().rev().take(window).copied().collect();
    let current_state = detect_state(&mixture, &recent);

    Ok(PlayerPerformanceModel {
        player_id: player.player_id.as_u64(),
        year,
        mixture,
        current_state,
    })
}

/// Fit models for many players in parallel (spec §5: "bulk training
/// fans out across players via a worker pool"). Each entry in the
/// returned `Vec` corresponds to the player at the same index in `players`;
/// a player with insufficient history yields `Err` rather than being
/// silently dropped, so callers can report which players were skipped.
pub fn bulk_train(
    players: &[Player],
    year: u16,
    as_of_week: u32,
    recent_weeks: u32,
) -> Vec<Result<PlayerPerformanceModel>> {
    players
        .par_iter()
        .map(|p| train(p, year, as_of_week, recent_weeks))
        .collect()
}

/// Load a cached model if fresh, otherwise train and persist one (spec
/// §4.1's `predict(..., use_cache=true)` path).
pub fn load_or_train(
    store: &PlayerModelStore,
    player: &Player,
    year: u16,
    as_of_week: u32,
    recent_weeks: u32,
) -> Result<PlayerPerformanceModel> {
    let player_id = player.player_id.as_u64();

    if let Some(cached) = store.load(player_id, year) {
        let samples = player.actuals_through(as_of_week);
        let window = recent_weeks.max(1) as usize;
        let recent: Vec<f64> = samples.iter().rev().take(window).copied().collect();
        let current_state = detect_state(&cached.mixture, &recent);
        return Ok(PlayerPerformanceModel {
            player_id,
            year,
            mixture: cached.mixture,
            current_state,
        });
    }

    let model = train(player, year, as_of_week, recent_weeks)?;
    let weeks_trained = player.actuals_through(as_of_week).len();
    store.store(&CachedPlayerModel {
        schema_version: MODEL_CACHE_SCHEMA_VERSION,
        player_id,
        year,
        weeks_trained,
        mixture: model.mixture.clone(),
    })?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{PlayerId, Position};

    fn player_with_weeks(weeks: &[f64]) -> Player {
        let mut p = Player::new(PlayerId::new(1), "Test Player", Position::RB).unwrap();
        for (i, &pts) in weeks.iter().enumerate() {
            p = p.with_scored_week((i + 1) as u32, pts, None).unwrap();
        }
        p
    }

    #[test]
    fn train_rejects_insufficient_history() {
        let p = player_with_weeks(&[10.0, 12.0, 11.0]);
        let err = train(&p, 2026, 3, 3).unwrap_err();
        assert!(matches!(err, SimError::InsufficientData { weeks_available: 3, weeks_required: 5, .. }));
    }

    #[test]
    fn train_succeeds_with_enough_history() {
        let p = player_with_weeks(&[10.0, 12.0, 11.0, 25.0, 27.0, 9.0, 13.0]);
        let model = train(&p, 2026, 7, 3).unwrap();
        assert!(model.mixture.is_well_formed());
    }

    #[test]
    fn train_is_deterministic_across_calls() {
        let p = player_with_weeks(&[10.0, 12.0, 11.0, 25.0, 27.0, 9.0, 13.0]);
        let a = train(&p, 2026, 7, 3).unwrap();
        let b = train(&p, 2026, 7, 3).unwrap();
        assert_eq!(a.mixture.season_mean(), b.mixture.season_mean());
    }

    #[test]
    fn bulk_train_reports_per_player_results() {
        let players = vec![
            player_with_weeks(&[10.0, 12.0, 11.0, 25.0, 27.0]),
            player_with_weeks(&[10.0, 12.0]),
        ];
        let results = bulk_train(&players, 2026, 5, 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SimError::InsufficientData { .. })));
    }

    #[test]
    fn load_or_train_persists_then_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlayerModelStore::new(dir.path(), std::time::Duration::from_secs(3600));
        let p = player_with_weeks(&[10.0, 12.0, 11.0, 25.0, 27.0, 9.0, 13.0]);

        let first = load_or_train(&store, &p, 2026, 7, 3).unwrap();
        assert!(store.load(p.player_id.as_u64(), 2026).is_some());

        let second = load_or_train(&store, &p, 2026, 7, 3).unwrap();
        assert_eq!(first.mixture.season_mean(), second.mixture.season_mean());
    }
}
