//! On-disk cache lifecycle for fitted player models (spec §4.1's
//! `predict(..., use_cache=true)` path and spec §5's cache contract),
//! built on the shared write discipline in [`crate::cache`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache;
use crate::error::Result;
use crate::model::gmm::GaussianMixture;

/// Schema version stamped into every cached artifact; bumped whenever the
/// on-disk shape changes so a stale cache surfaces as `CacheStale` instead
/// of a silent misparse.
pub const MODEL_CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPlayerModel {
    pub schema_version: u32,
    pub player_id: u64,
    pub year: u16,
    pub weeks_trained: usize,
    pub mixture: GaussianMixture,
}

/// Persists and retrieves fitted mixtures by `(player_id, year)`.
pub struct PlayerModelStore {
    root: PathBuf,
    ttl: Duration,
}

impl PlayerModelStore {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { root: root.into(), ttl }
    }

    pub fn with_default_root(ttl: Duration) -> Self {
        Self::new(cache::default_cache_root(), ttl)
    }

    fn path(&self, player_id: u64, year: u16) -> PathBuf {
        cache::player_model_path(&self.root, player_id, year)
    }

    /// Load a cached model if present, fresh, and schema-current. Returns
    /// `None` on any miss (absent, stale by TTL, or schema mismatch) —
    /// callers decide whether a miss is fatal or triggers a retrain.
    pub fn load(&self, player_id: u64, year: u16) -> Option<CachedPlayerModel> {
        let path = self.path(player_id, year);
        if !cache::is_fresh(&path, self.ttl) {
            return None;
        }
        let contents = cache::try_read_to_string(&path)?;
        let model: CachedPlayerModel = serde_json::from_str(&contents).ok()?;
        if model.schema_version != MODEL_CACHE_SCHEMA_VERSION {
            return None;
        }
        Some(model)
    }

    pub fn store(&self, model: &CachedPlayerModel) -> Result<()> {
        let path = self.path(model.player_id, model.year);
        let contents = serde_json::to_string_pretty(model)?;
        cache::write_string_atomic(&path, &contents)?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::gmm::{fit_em, deterministic_seed};
    use tempfile::tempdir;

    fn sample_mixture() -> GaussianMixture {
        let samples = vec![4.0, 4.5, 3.8, 14.0, 14.5, 13.2, 26.0, 25.1, 27.3, 4.2];
        fit_em(&samples, deterministic_seed(1, 2026)).unwrap()
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = PlayerModelStore::new(dir.path(), Duration::from_secs(3600));
        let model = CachedPlayerModel {
            schema_version: MODEL_CACHE_SCHEMA_VERSION,
            player_id: 42,
            year: 2026,
            weeks_trained: 10,
            mixture: sample_mixture(),
        };
        store.store(&model).unwrap();
        let loaded = store.load(42, 2026).unwrap();
        assert_eq!(loaded.player_id, 42);
        assert_eq!(loaded.weeks_trained, 10);
    }

    #[test]
    fn load_misses_when_absent() {
        let dir = tempdir().unwrap();
        let store = PlayerModelStore::new(dir.path(), Duration::from_secs(3600));
        assert!(store.load(99, 2026).is_none());
    }

    #[test]
    fn load_misses_when_ttl_expired() {
        let dir = tempdir().unwrap();
        let store = PlayerModelStore::new(dir.path(), Duration::from_secs(0));
        let model = CachedPlayerModel {
            schema_version: MODEL_CACHE_SCHEMA_VERSION,
            player_id: 7,
            year: 2026,
            weeks_trained: 6,
            mixture: sample_mixture(),
        };
        store.store(&model).unwrap();
        assert!(store.load(7, 2026).is_none());
    }

    #[test]
    fn load_misses_on_schema_mismatch() {
        let dir = tempdir().unwrap();
        let store = PlayerModelStore::new(dir.path(), Duration::from_secs(3600));
        let mut model = CachedPlayerModel {
            schema_version: MODEL_CACHE_SCHEMA_VERSION,
            player_id: 13,
            year: 2026,
            weeks_trained: 6,
            mixture: sample_mixture(),
        };
        model.schema_version = MODEL_CACHE_SCHEMA_VERSION + 1;
        store.store(&model).unwrap();
        assert!(store.load(13, 2026).is_none());
    }
}
