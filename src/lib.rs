//! Simulation and decision core for fantasy football weekly management.
//!
//! Covers per-player performance modeling, a feed snapshot store with an
//! as-of leakage guard, an alpha signal provider, an alpha blending
//! model, a schedule-aware rest-of-season valuator, a Monte Carlo
//! engine, decision services, and a backtest evaluator. League
//! ingestion, the interactive CLI/menu, JSON config loading, and report
//! rendering are external collaborators this crate consumes through
//! narrow interfaces (`league::LeagueContext`, `feeds::FeedAdapter`)
//! rather than implementing itself.

pub mod alpha;
pub mod backtest;
pub mod blend;
pub mod cache;
pub mod config;
pub mod decisions;
pub mod error;
pub mod feeds;
pub mod league;
pub mod model;
pub mod montecarlo;
pub mod ros;
pub mod roster;
pub mod storage;

pub use config::CoreConfig;
pub use error::{Result, SimError};
pub use league::{LeagueContext, Player, PlayerId, Position, Season, Team, TeamId, Week};
