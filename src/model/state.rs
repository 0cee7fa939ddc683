//! Current-state detection (spec §4.1: "classify the player's current
//! state by comparing recent actuals against the fitted components").

use crate::model::gmm::{GaussianMixture, StateLabel};

/// Classify `recent` (most recent weeks first or last, order does not
/// matter here — the caller already windowed it) against `mixture` by
/// taking its mean and assigning that mean to its most likely component
/// (spec §4.1: "argmax label posterior given the last 3 weeks' mean").
pub fn detect_state(mixture: &GaussianMixture, recent: &[f64]) -> StateLabel {
    if recent.is_empty() {
        return StateLabel::Normal;
    }

    let mean = recent.iter().sum::<f64>() / recent.len() as f64;
    most_likely_component(mixture, mean)
}

fn most_likely_component(mixture: &GaussianMixture, x: f64) -> StateLabel {
    let mut best = StateLabel::Cold;
    let mut best_density = f64::NEG_INFINITY;
    for label in StateLabel::ALL {
        let c = mixture.component(label);
        let variance = c.variance.max(1e-6);
        let density = c.weight * (-((x - c.mean).powi(2)) / (2.0 * variance)).exp() / variance.sqrt();
        if density > best_density {
            best_density = density;
            best = label;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::gmm::Component;

    fn mixture() -> GaussianMixture {
        GaussianMixture {
            components: [
                Component { weight: 0.3, mean: 4.0, variance: 2.0 },
                Component { weight: 0.4, mean: 14.0, variance: 4.0 },
                Component { weight: 0.3, mean: 26.0, variance: 3.0 },
            ],
        }
    }

    #[test]
    fn detects_hot_state_from_recent_high_scores() {
        let label = detect_state(&mixture(), &[25.0, 27.0, 26.5]);
        assert_eq!(label, StateLabel::Hot);
    }

    #[test]
    fn detects_cold_state_from_recent_low_scores() {
        let label = detect_state(&mixture(), &[3.5, 4.5, 4.0]);
        assert_eq!(label, StateLabel::Cold);
    }

    #[test]
    fn empty_recent_window_defaults_to_normal() {
        assert_eq!(detect_state(&mixture(), &[]), StateLabel::Normal);
    }
}
