//! A fixed, 3-component Gaussian mixture fit by EM (spec §4.1, glossary
//! "GMM"). No crate in the pack supplies a ready-made 1-D GMM fitter, so
//! this is hand-rolled the way `of_core`'s match engine hand-rolls its own
//! domain algorithms rather than reaching for a generic ML crate.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimError};

pub const NUM_COMPONENTS: usize = 3;
const EM_MAX_ITERS: usize = 200;
const EM_CONVERGENCE_EPS: f64 = 1e-6;
const EM_RESTARTS: usize = 4;
const VARIANCE_FLOOR: f64 = 0.25;

/// State labels, assigned by sorting the fitted components by mean
/// ascending (spec §4.1: "sort components by mean to assign labels
/// {cold, normal, hot}").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StateLabel {
    Cold,
    Normal,
    Hot,
}

impl StateLabel {
    pub const ALL: [StateLabel; 3] = [StateLabel::Cold, StateLabel::Normal, StateLabel::Hot];
}

/// One component of the mixture.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Component {
    pub weight: f64,
    pub mean: f64,
    pub variance: f64,
}

/// A fitted 3-component Gaussian mixture, sorted by `StateLabel`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GaussianMixture {
    pub components: [Component; NUM_COMPONENTS],
}

impl GaussianMixture {
    pub fn component(&self, label: StateLabel) -> &Component {
        &self.components[label as usize]
    }

    /// Testable property 1: weights sum to 1 within 1e-6, means strictly
    /// increasing, variances non-negative.
    pub fn is_well_formed(&self) -> bool {
        let weight_sum: f64 = self.components.iter().map(|c| c.weight).sum();
        if (weight_sum - 1.0).abs() > 1e-6 {
            return false;
        }
        if self.components.iter().any(|c| c.variance < 0.0) {
            return false;
        }
        self.components[0].mean < self.components[1].mean
            && self.components[1].mean < self.components[2].mean
    }

    /// Draw one sample from the full mixture (component chosen by weight).
    pub fn sample(&self, rng: &mut ChaCha8Rng) -> f64 {
        let u: f64 = rng.gen::<f64>();
        let mut acc = 0.0;
        for c in &self.components {
            acc += c.weight;
            if u <= acc {
                return sample_normal(rng, c.mean, c.variance);
            }
        }
        // Floating-point rounding may leave acc slightly under 1.0; fall
        // back to the last component rather than panicking.
        let last = &self.components[NUM_COMPONENTS - 1];
        sample_normal(rng, last.mean, last.variance)
    }

    /// Draw one sample biased toward a specific component, per spec
    /// §4.1's `predict(state_biased=true)`: 70% from the labeled state's
    /// component, 30% from the full mixture.
    pub fn sample_state_biased(&self, rng: &mut ChaCha8Rng, state: StateLabel) -> f64 {
        if rng.gen::<f64>() < 0.70 {
            let c = self.component(state);
            sample_normal(rng, c.mean, c.variance)
        } else {
            self.sample(rng)
        }
    }

    pub fn season_mean(&self) -> f64 {
        self.components.iter().map(|c| c.weight * c.mean).sum()
    }

    pub fn season_variance(&self) -> f64 {
        let mean = self.season_mean();
        self.components
            .iter()
            .map(|c| c.weight * (c.variance + (c.mean - mean).powi(2)))
            .sum()
    }

    pub fn season_stdev(&self) -> f64 {
        self.season_variance().max(0.0).sqrt()
    }
}

use rand::Rng;

fn sample_normal(rng: &mut ChaCha8Rng, mean: f64, variance: f64) -> f64 {
    let stdev = variance.max(VARIANCE_FLOOR).sqrt();
    let normal = Normal::new(mean, stdev).unwrap_or_else(|_| Normal::new(mean, 1.0).unwrap());
    let draw = normal.sample(rng);
    draw.max(0.0) // spec §4.1: negative samples are clamped to zero
}

/// Deterministic seed derivation from `(player_id, year)` (spec §4.1 /
/// Design Notes: "Seed the fitter from a hash of (player_id, year)").
pub fn deterministic_seed(player_id: u64, year: u16) -> u64 {
    // FNV-1a, good enough for a non-cryptographic, stable seed.
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in player_id
        .to_le_bytes()
        .iter()
        .chain(year.to_le_bytes().iter())
    {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Fit a 3-component GMM to `samples` by EM with deterministic random
/// restarts. Requires at least `NUM_COMPONENTS` + 2 samples so EM has
/// enough data to separate three components meaningfully; the minimum
/// training-sample gate (`InsufficientData`, 5 weeks) lives one layer up
/// in `train.rs` and is stricter than this structural floor.
pub fn fit_em(samples: &[f64], seed: u64) -> Result<GaussianMixture> {
    if samples.len() < NUM_COMPONENTS + 2 {
        return Err(SimError::NumericFailure {
            operation: "fit_em".into(),
            detail: format!("need at least {} samples, got {}", NUM_COMPONENTS + 2, samples.len()),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut best: Option<(f64, GaussianMixture)> = None;

    for restart in 0..EM_RESTARTS {
        if let Some(mixture) = run_em_once(samples, &mut rng, restart) {
            let ll = log_likelihood(samples, &mixture);
            if best.as_ref().map(|(best_ll, _)| ll > *best_ll).unwrap_or(true) {
                best = Some((ll, mixture));
            }
        }
    }

    match best {
        Some((_, mixture)) => Ok(sort_by_mean(mixture)),
        // EM non-convergence: spec §7 `NumericFailure` falls back to a
        // single-Gaussian fit replicated across the three components.
        None => Ok(single_gaussian_fallback(samples)),
    }
}

fn run_em_once(samples: &[f64], rng: &mut ChaCha8Rng, restart: usize) -> Option<GaussianMixture> {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = (samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n).max(VARIANCE_FLOOR);
    let stdev = var.sqrt();

    // Initialize means spread around the sample mean, jittered by a
    // restart-local draw from the seeded rng so each restart explores a
    // distinct basin while the whole fit stays reproducible for a fixed seed.
    let base_jitter = 0.25 * (restart as f64 + 1.0);
    let jitter = base_jitter * rng.gen_range(0.85..1.15);
    let mut means = [mean - stdev * jitter, mean, mean + stdev * jitter];
    let mut variances = [var, var, var];
    let mut weights = [1.0 / 3.0; NUM_COMPONENTS];

    let mut prev_ll = f64::NEG_INFINITY;
    for _ in 0..EM_MAX_ITERS {
        // E-step: responsibilities.
        let mut resp = vec![[0.0_f64; NUM_COMPONENTS]; samples.len()];
        for (i, &x) in samples.iter().enumerate() {
            let mut denom = 0.0;
            for k in 0..NUM_COMPONENTS {
                let p = weights[k] * gaussian_pdf(x, means[k], variances[k]);
                resp[i][k] = p;
                denom += p;
            }
            if denom > 0.0 {
                for k in 0..NUM_COMPONENTS {
                    resp[i][k] /= denom;
                }
            } else {
                // Degenerate responsibility (all pdfs underflowed to
                // zero); fall back to uniform assignment this step.
                resp[i] = [1.0 / 3.0; NUM_COMPONENTS];
            }
        }

        // M-step.
        for k in 0..NUM_COMPONENTS {
            let nk: f64 = resp.iter().map(|r| r[k]).sum();
            if nk < 1e-8 {
                continue;
            }
            let mean_k = resp.iter().zip(samples).map(|(r, &x)| r[k] * x).sum::<f64>() / nk;
            let var_k = resp
                .iter()
                .zip(samples)
                .map(|(r, &x)| r[k] * (x - mean_k).powi(2))
                .sum::<f64>()
                / nk;
            means[k] = mean_k;
            variances[k] = var_k.max(VARIANCE_FLOOR);
            weights[k] = nk / n;
        }
        renormalize_weights(&mut weights);

        let mixture = GaussianMixture {
            components: [
                Component { weight: weights[0], mean: means[0], variance: variances[0] },
                Component { weight: weights[1], mean: means[1], variance: variances[1] },
                Component { weight: weights[2], mean: means[2], variance: variances[2] },
            ],
        };
        let ll = log_likelihood(samples, &mixture);
        if (ll - prev_ll).abs() < EM_CONVERGENCE_EPS {
            prev_ll = ll;
            break;
        }
        prev_ll = ll;
    }

    if prev_ll.is_finite() {
        Some(GaussianMixture {
            components: [
                Component { weight: weights[0], mean: means[0], variance: variances[0] },
                Component { weight: weights[1], mean: means[1], variance: variances[1] },
                Component { weight: weights[2], mean: means[2], variance: variances[2] },
            ],
        })
    } else {
        None
    }
}

fn renormalize_weights(weights: &mut [f64; NUM_COMPONENTS]) {
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        for w in weights.iter_mut() {
            *w /= sum;
        }
    } else {
        *weights = [1.0 / 3.0; NUM_COMPONENTS];
    }
}

fn gaussian_pdf(x: f64, mean: f64, variance: f64) -> f64 {
    let variance = variance.max(VARIANCE_FLOOR);
    let coeff = 1.0 / (2.0 * std::f64::consts::PI * variance).sqrt();
    coeff * (-((x - mean).powi(2)) / (2.0 * variance)).exp()
}

fn log_likelihood(samples: &[f64], mixture: &GaussianMixture) -> f64 {
    samples
        .iter()
        .map(|&x| {
            let density: f64 = mixture
                .components
                .iter()
                .map(|c| c.weight * gaussian_pdf(x, c.mean, c.variance))
                .sum();
            density.max(1e-300).ln()
        })
        .sum()
}

/// `NumericFailure` fallback: a single Gaussian fit to all samples,
/// replicated across the three components with tiny mean offsets so
/// `is_well_formed`'s strictly-increasing-means invariant still holds.
fn single_gaussian_fallback(samples: &[f64]) -> GaussianMixture {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = (samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n).max(VARIANCE_FLOOR);
    let epsilon = var.sqrt().max(0.1) * 0.01;
    GaussianMixture {
        components: [
            Component { weight: 1.0 / 3.0, mean: mean - epsilon, variance: var },
            Component { weight: 1.0 / 3.0, mean, variance: var },
            Component { weight: 1.0 / 3.0, mean: mean + epsilon, variance: var },
        ],
    }
}

fn sort_by_mean(mut mixture: GaussianMixture) -> GaussianMixture {
    mixture.components.sort_by(|a, b| a.mean.partial_cmp(&b.mean).unwrap());
    // Guarantee strict ordering even when EM collapses two components to
    // near-identical means (spec invariant 1: strictly increasing means).
    for i in 1..NUM_COMPONENTS {
        if mixture.components[i].mean <= mixture.components[i - 1].mean {
            mixture.components[i].mean = mixture.components[i - 1].mean + 1e-6;
        }
    }
    mixture
}
