//! Decision services. Lineup recommendation, free-agent ranking, trade
//! analysis, and draft strategy ranking, all layered on top of the
//! blended projections, ROS values, and Monte Carlo simulations rather
//! than recomputing any of them.

pub mod draft;
pub mod free_agent;
pub mod lineup;
pub mod trade;

pub use draft::rank_strategies;
pub use free_agent::{recommend_free_agents, FreeAgentRecommendation, Priority};
pub use lineup::{recommend_lineup, ConfidenceLevel, LineupAudit, LineupRecommendation, SlotRecommendation};
pub use trade::{analyze_trade, search_trades, TradeAnalysis, TradeInputs, TradeRecommendation};
