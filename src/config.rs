//! The configuration surface every component consumes.
//!
//! Loading these from a JSON file on disk is an external collaborator's
//! job; this module only owns the typed surface the components
//! consume, built with the teacher's fluent `with_*` builder style
//! (`commands/common.rs::CommandParamsBuilder`) instead of a config-file
//! parser.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Monte Carlo engine and model-fitting knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_simulations: u32,
    pub seed: u64,
    pub use_gmm: bool,
    pub cache_dir: Option<String>,
    pub cache_ttl_hours: u32,
    pub ratings_blend: f64,
    pub score_variance_floor: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_simulations: 10_000,
            seed: 0,
            use_gmm: true,
            cache_dir: None,
            cache_ttl_hours: 24,
            ratings_blend: 0.0,
            score_variance_floor: 4.0,
        }
    }
}

/// Alpha signal blending knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaConfig {
    pub alpha_mode: bool,
    pub alpha_blend: f64,
    pub shrinkage_k: f64,
    pub recent_weeks: u32,
    pub injury_penalties: BTreeMap<String, f64>,
    pub signal_weights: BTreeMap<String, f64>,
    pub signal_caps: BTreeMap<String, (f64, f64)>,
    pub total_cap: f64,
    pub enable_extended_signals: bool,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            alpha_mode: true,
            alpha_blend: 0.35,
            shrinkage_k: 3.0,
            recent_weeks: 3,
            injury_penalties: BTreeMap::new(),
            signal_weights: BTreeMap::new(),
            signal_caps: BTreeMap::new(),
            total_cap: 6.0,
            enable_extended_signals: false,
        }
    }
}

/// Feed resolution and as-of cutoff knobs. `as_of_utc`/`as_of_date`
/// are mutually exclusive; `validate()` enforces this as a startup
/// error (`ConfigConflict`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub timeout_seconds: f64,
    pub retries: u32,
    pub cache_ttl_seconds: u64,
    pub as_of_utc: Option<chrono::DateTime<chrono::Utc>>,
    pub as_of_date: Option<chrono::NaiveDate>,
    pub as_of_missing_policy: AsOfMissingPolicy,
    pub publication_lag_seconds_by_feed: BTreeMap<String, i64>,
    pub max_staleness_seconds_by_feed: BTreeMap<String, i64>,
    pub snapshot_root: Option<String>,
    pub snapshot_retention_days: i64,
}

/// The as-of policy is fixed at backward-publish-time resolution with
/// a degrade-to-neutral-and-warn fallback; this enum exists so the
/// fixed choice is still a typed, inspectable value rather than an
/// implicit behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsOfMissingPolicy {
    DegradeWarn,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 2.0,
            retries: 2,
            cache_ttl_seconds: 24 * 3600,
            as_of_utc: None,
            as_of_date: None,
            as_of_missing_policy: AsOfMissingPolicy::DegradeWarn,
            publication_lag_seconds_by_feed: BTreeMap::new(),
            max_staleness_seconds_by_feed: BTreeMap::new(),
            snapshot_root: None,
            snapshot_retention_days: 45,
        }
    }
}

impl RuntimeConfig {
    /// Resolve the effective as-of cutoff, combining `as_of_utc` and
    /// `as_of_date` (already validated to be mutually exclusive).
    pub fn as_of_cutoff(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        if let Some(t) = self.as_of_utc {
            return Some(t);
        }
        self.as_of_date
            .map(|d| d.and_hms_opt(23, 59, 59).unwrap().and_utc())
    }
}

/// Decision-service filtering and ranking knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub min_advantage: f64,
    pub max_trades_per_team: u32,
    pub max_total_opportunities: u32,
    pub min_acceptance_probability: f64,
    pub top_n_recommendations: u32,
    pub positions_filter: Option<Vec<crate::league::Position>>,
    pub exclude_injured: bool,
    pub use_ros: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_advantage: 3.0,
            max_trades_per_team: 2,
            max_total_opportunities: 10,
            min_acceptance_probability: 0.30,
            top_n_recommendations: 10,
            positions_filter: None,
            exclude_injured: true,
            use_ros: true,
        }
    }
}

/// The full configuration surface, bundling all four namespaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub simulation: SimulationConfig,
    pub alpha: AlphaConfig,
    pub runtime: RuntimeConfig,
    pub analysis: AnalysisConfig,
}

impl CoreConfig {
    /// Enforce the startup-error invariants across all four namespaces.
    pub fn validate(&self) -> Result<()> {
        if self.runtime.as_of_utc.is_some() && self.runtime.as_of_date.is_some() {
            return Err(SimError::ConfigConflict {
                detail: "as_of_utc and as_of_date are mutually exclusive".into(),
            });
        }
        if self.runtime.snapshot_retention_days < 0 {
            return Err(SimError::ConfigConflict {
                detail: "snapshot_retention_days must be non-negative".into(),
            });
        }
        for (feed, lag) in &self.runtime.publication_lag_seconds_by_feed {
            if *lag < 0 {
                return Err(SimError::ConfigConflict {
                    detail: format!("publication lag for feed {feed} must be non-negative"),
                });
            }
        }
        for (feed, staleness) in &self.runtime.max_staleness_seconds_by_feed {
            if *staleness < 0 {
                return Err(SimError::ConfigConflict {
                    detail: format!("max staleness for feed {feed} must be non-negative"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.alpha.alpha_blend) {
            return Err(SimError::ConfigConflict {
                detail: "alpha_blend must be within [0, 1]".into(),
            });
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulation.seed = seed;
        self
    }

    pub fn with_num_simulations(mut self, n: u32) -> Self {
        self.simulation.num_simulations = n;
        self
    }

    pub fn with_as_of_utc(mut self, at: chrono::DateTime<chrono::Utc>) -> Self {
        self.runtime.as_of_utc = Some(at);
        self.runtime.as_of_date = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn as_of_utc_and_date_conflict_is_rejected() {
        let mut cfg = CoreConfig::default();
        cfg.runtime.as_of_utc = Some(chrono::Utc::now());
        cfg.runtime.as_of_date = Some(chrono::Utc::now().date_naive());
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, SimError::ConfigConflict { .. }));
    }

    #[test]
    fn negative_retention_is_rejected() {
        let mut cfg = CoreConfig::default();
        cfg.runtime.snapshot_retention_days = -1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn with_as_of_utc_clears_as_of_date() {
        let cfg = CoreConfig::default().with_as_of_utc(chrono::Utc::now());
        assert!(cfg.runtime.as_of_date.is_none());
        assert!(cfg.runtime.as_of_utc.is_some());
    }
}
