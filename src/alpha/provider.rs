//! Orchestrates the signal registry, clips and weights each
//! contribution, sums to a bounded `delta_mean_points`, and keeps the
//! last call's diagnostics queryable without recomputation.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::alpha::context::SignalContext;
use crate::alpha::signals::{position_points_allowed_multiplier, BASE_SIGNALS, EXTENDED_SIGNALS};

/// One signal's contribution to a player's adjustment, in registry
/// order — an ordered list, not a map, since decision factors rely on
/// stable ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalContribution {
    pub signal_name: String,
    pub raw: f64,
    pub clipped: f64,
    pub weight: f64,
    pub confidence: f64,
    pub source: String,
    pub quality_flags: Vec<String>,
}

/// A fixed per-signal variance used to build `delta_stdev_points`; a
/// signal that fell back to neutral contributes zero variance since it
/// carries no information.
const SIGNAL_VARIANCE: f64 = 0.35;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaAdjustment {
    pub delta_mean_points: f64,
    pub delta_stdev_points: f64,
    /// The matchup_unit signal's multiplier, exposed separately in
    /// [0.85, 1.15].
    pub matchup_multiplier: f64,
    pub contributions: Vec<SignalContribution>,
    pub warnings: Vec<String>,
}

pub struct AlphaSignalProvider {
    last_diagnostics: RefCell<Option<AlphaAdjustment>>,
}

impl Default for AlphaSignalProvider {
    fn default() -> Self {
        Self {
            last_diagnostics: RefCell::new(None),
        }
    }
}

impl AlphaSignalProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the adjustment for one (player, week) context. Never
    /// fails: a signal exception becomes a neutral, zero-weighted
    /// contribution with a warning.
    pub fn compute(&self, ctx: &SignalContext) -> AlphaAdjustment {
        let mut contributions = Vec::new();
        let mut warnings = Vec::new();
        let mut delta_mean = 0.0;
        let mut variance_sum = 0.0;

        let mut specs = BASE_SIGNALS.to_vec();
        if ctx.config.enable_extended_signals {
            specs.extend(EXTENDED_SIGNALS.to_vec());
        }

        for spec in specs {
            let weight = ctx
                .config
                .signal_weights
                .get(spec.name)
                .copied()
                .unwrap_or(spec.default_weight);
            let (clip_lo, clip_hi) = ctx
                .config
                .signal_caps
                .get(spec.name)
                .copied()
                .unwrap_or(spec.default_clip);

            match (spec.compute)(ctx) {
                Ok(output) => {
                    let clipped = output.raw.clamp(clip_lo, clip_hi);
                    delta_mean += clipped * weight;
                    variance_sum += (weight * SIGNAL_VARIANCE).powi(2);
                    for flag in &output.flags {
                        warnings.push(format!("{}: {}", spec.name, flag));
                    }
                    contributions.push(SignalContribution {
                        signal_name: spec.name.to_string(),
                        raw: output.raw,
                        clipped,
                        weight,
                        confidence: output.confidence,
                        source: output.source,
                        quality_flags: output.flags,
                    });
                }
                Err(reason) => {
                    warnings.push(format!("{}: defaulted to neutral ({reason})", spec.name));
                    contributions.push(SignalContribution {
                        signal_name: spec.name.to_string(),
                        raw: 0.0,
                        clipped: 0.0,
                        weight: 0.0,
                        confidence: 0.0,
                        source: "fallback".to_string(),
                        quality_flags: vec!["fallback_neutral".to_string()],
                    });
                }
            }
        }

        let total_cap = ctx.config.total_cap.max(0.0);
        let delta_mean_points = delta_mean.clamp(-total_cap, total_cap);

        let matchup_multiplier = ctx
            .player
            .schedule
            .get(&ctx.week)
            .map(|game| {
                let (m, _) = position_points_allowed_multiplier(
                    ctx.league,
                    ctx.player.position,
                    game.opponent_team_id,
                    ctx.week.saturating_sub(1),
                );
                m.clamp(0.85, 1.15)
            })
            .unwrap_or(1.0);

        let adjustment = AlphaAdjustment {
            delta_mean_points,
            delta_stdev_points: variance_sum.sqrt(),
            matchup_multiplier,
            contributions,
            warnings,
        };

        *self.last_diagnostics.borrow_mut() = Some(adjustment.clone());
        adjustment
    }

    pub fn last_diagnostics(&self) -> Option<AlphaAdjustment> {
        self.last_diagnostics.borrow().clone()
    }

    pub fn last_warnings(&self) -> Vec<String> {
        self.last_diagnostics
            .borrow()
            .as_ref()
            .map(|d| d.warnings.clone())
            .unwrap_or_default()
    }
}
