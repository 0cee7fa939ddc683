//! Player-level score sampling, abstracted behind `ScoreSampler` so C6
//! can draw from a trained C1 mixture or, where no history exists, a
//! simple Normal fallback (spec §4.6: "draw each starter's score from
//! C1's predictive distribution").
//!
//! The trait method is named `draw` rather than `sample` so it never
//! shadows `PlayerPerformanceModel::sample`'s own inherent method of
//! that name.

use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::model::PlayerPerformanceModel;

pub trait ScoreSampler {
    fn draw(&self, rng: &mut ChaCha8Rng) -> f64;
    fn mean(&self) -> f64;
    fn stdev(&self) -> f64;
}

impl ScoreSampler for PlayerPerformanceModel {
    fn draw(&self, rng: &mut ChaCha8Rng) -> f64 {
        self.sample(rng, true)
    }

    fn mean(&self) -> f64 {
        self.mean_projection()
    }

    fn stdev(&self) -> f64 {
        self.mixture.season_stdev()
    }
}

/// A plain Normal score model, used for the literal mean/stdev sanity
/// checks in spec §8's scenarios and anywhere a player has no C1 model
/// (`InsufficientData`, spec §4.1) but still needs a score drawn.
#[derive(Debug, Clone, Copy)]
pub struct GaussianScoreModel {
    pub mean: f64,
    pub stdev: f64,
}

impl GaussianScoreModel {
    pub fn new(mean: f64, stdev: f64) -> Self {
        Self { mean, stdev: stdev.max(0.0) }
    }
}

impl ScoreSampler for GaussianScoreModel {
    fn draw(&self, rng: &mut ChaCha8Rng) -> f64 {
        let normal = Normal::new(self.mean, self.stdev.max(1e-6)).unwrap();
        normal.sample(rng).max(0.0)
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn stdev(&self) -> f64 {
        self.stdev
    }
}
