//! The read-only context every alpha signal computes against: a pure
//! function of player features, league context, and resolved feed
//! data.

use std::collections::BTreeMap;

use crate::config::AlphaConfig;
use crate::feeds::FeedEnvelope;
use crate::league::{LeagueContext, Player};

pub struct SignalContext<'a> {
    pub player: &'a Player,
    pub league: &'a dyn LeagueContext,
    pub week: u32,
    /// Resolved envelopes by feed domain name (weather, market, odds,
    /// injury_news, nextgenstats), already passed through C2's as-of
    /// resolution by the caller.
    pub feeds: BTreeMap<String, FeedEnvelope>,
    pub config: &'a AlphaConfig,
}

impl<'a> SignalContext<'a> {
    pub fn feed(&self, name: &str) -> Option<&FeedEnvelope> {
        self.feeds.get(name)
    }

    pub fn feed_number(&self, name: &str, field: &str) -> Option<f64> {
        self.feed(name)?.data.get(field)?.as_f64()
    }

    pub fn feed_is_unavailable(&self, name: &str) -> bool {
        match self.feed(name) {
            None => true,
            Some(e) => {
                e.has_flag("feed_unavailable") || e.has_flag("as_of_miss") || e.has_flag("schema_invalid")
            }
        }
    }

    /// Recent actual points through the context week, most recent last.
    pub fn recent_actuals(&self) -> Vec<f64> {
        self.player.actuals_through(self.week)
    }
}

/// Confidence for recent-form-derived signals: >=4 weeks high (0.95),
/// 2-3 weeks medium (0.75), 1 week low (0.40), 0 weeks none (0.0).
pub fn recent_form_confidence(weeks_observed: usize) -> f64 {
    match weeks_observed {
        0 => 0.0,
        1 => 0.40,
        2 | 3 => 0.75,
        _ => 0.95,
    }
}
