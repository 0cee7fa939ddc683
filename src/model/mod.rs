//! C1: Player Performance Model.
//!
//! A per-player 3-component Gaussian mixture fit by EM over weekly
//! actuals, with a current-state classifier and an on-disk cache so
//! repeated Monte Carlo runs don't refit every call (spec §4.1).

pub mod gmm;
pub mod state;
pub mod store;
pub mod train;

pub use gmm::{GaussianMixture, StateLabel};
pub use store::{CachedPlayerModel, PlayerModelStore};
pub use train::{bulk_train, load_or_train, train, PlayerPerformanceModel, MIN_TRAINING_WEEKS};
