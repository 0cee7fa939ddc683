//! Alpha blending model. Fuses the baseline projection, shrunk recent
//! form, and the alpha signal provider's adjustment into a single
//! `PlayerProjection` with uncertainty and confidence.

use serde::{Deserialize, Serialize};

use crate::alpha::{AlphaAdjustment, SignalContribution};
use crate::config::AlphaConfig;
use crate::league::{InjuryStatus, Position};

/// Baseline projection stdev by position, used as the `var_baseline`
/// term in the uncertainty formula; a fixed table the way the
/// teacher's scoring tables are fixed constants rather than config
/// inputs.
pub(crate) fn baseline_stdev(position: Position) -> f64 {
    match position {
        Position::QB => 6.0,
        Position::RB => 7.0,
        Position::WR => 7.5,
        Position::TE => 5.5,
        Position::K => 3.0,
        Position::Def => 4.0,
    }
}

/// Position-dependent uncertainty floor.
fn uncertainty_floor(position: Position) -> f64 {
    baseline_stdev(position) * 0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProjection {
    pub player_id: u64,
    pub position: Position,
    pub baseline: f64,
    pub blended_mean: f64,
    pub uncertainty: f64,
    pub confidence: f64,
    pub contributions: Vec<SignalContribution>,
    pub warnings: Vec<String>,
}

pub struct BlendInputs<'a> {
    pub player_id: u64,
    pub position: Position,
    pub baseline: f64,
    pub recent_form_mean: f64,
    pub recent_form_stdev: f64,
    pub observed_weeks: u32,
    pub injury_status: Option<InjuryStatus>,
    pub alpha: &'a AlphaAdjustment,
}

/// `blended_mean = (1-α)·baseline + α·(shrunk_recent + alpha_delta)`,
/// then the matchup multiplier, then the injury penalty, in that order.
pub fn blend(inputs: BlendInputs, config: &AlphaConfig) -> PlayerProjection {
    let alpha = config.alpha_blend.clamp(0.0, 1.0);

    let shrinkage_factor = config.shrinkage_k / (config.shrinkage_k + inputs.observed_weeks as f64);
    let shrunk_recent =
        shrinkage_factor * inputs.baseline + (1.0 - shrinkage_factor) * inputs.recent_form_mean;

    let mut blended_mean = (1.0 - alpha) * inputs.baseline
        + alpha * (shrunk_recent + inputs.alpha.delta_mean_points);

    blended_mean *= inputs.alpha.matchup_multiplier;

    let penalty_fraction = inputs
        .injury_status
        .map(|status| {
            config
                .injury_penalties
                .get(&status.to_string())
                .copied()
                .unwrap_or_else(|| status.penalty_fraction())
        })
        .unwrap_or(0.0);
    blended_mean *= 1.0 - penalty_fraction;
    blended_mean = blended_mean.max(0.0);

    let var_baseline = baseline_stdev(inputs.position);
    let var_recent = inputs.recent_form_stdev;
    let var_alpha = inputs.alpha.delta_stdev_points;
    let uncertainty = (var_baseline.powi(2) + var_recent.powi(2) + var_alpha.powi(2))
        .sqrt()
        .max(uncertainty_floor(inputs.position));

    let confidence = weighted_confidence(&inputs.alpha.contributions);

    PlayerProjection {
        player_id: inputs.player_id,
        position: inputs.position,
        baseline: inputs.baseline,
        blended_mean,
        uncertainty,
        confidence,
        contributions: inputs.alpha.contributions.clone(),
        warnings: inputs.alpha.warnings.clone(),
    }
}

/// Mean of contribution confidences weighted by absolute clipped
/// contribution, rescaled into [0,1].
fn weighted_confidence(contributions: &[SignalContribution]) -> f64 {
    let total_weight: f64 = contributions.iter().map(|c| c.clipped.abs()).sum();
    let raw = if total_weight > 0.0 {
        contributions
            .iter()
            .map(|c| c.confidence * c.clipped.abs())
            .sum::<f64>()
            / total_weight
    } else if !contributions.is_empty() {
        contributions.iter().map(|c| c.confidence).sum::<f64>() / contributions.len() as f64
    } else {
        0.0
    };
    raw.clamp(0.0, 1.0)
}
