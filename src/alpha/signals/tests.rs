use super::*;
use crate::alpha::context::SignalContext;
use crate::config::AlphaConfig;
use crate::feeds::FeedEnvelope;
use crate::league::{InMemoryLeagueContext, LeagueSettings, Player, PlayerId, RosterSlots, Season, Team};
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;

fn empty_league() -> InMemoryLeagueContext {
    InMemoryLeagueContext::new(
        LeagueSettings {
            league_id: 1,
            season: Season::new(2026),
            current_week: 4,
            regular_season_final_week: 14,
            total_weeks: 17,
            playoff_team_count: 6,
            roster_slots: RosterSlots::default(),
            scoring_format_id: 1,
        },
        vec![Team::new(crate::league::TeamId::new(1), "A", "East")],
    )
}

fn base_player() -> Player {
    Player::new(PlayerId::new(1), "Test WR", Position::WR)
        .unwrap()
        .with_scored_week(1, 10.0, Some(9.0))
        .unwrap()
        .with_scored_week(2, 18.0, Some(12.0))
        .unwrap()
        .with_scored_week(3, 14.0, Some(11.0))
        .unwrap()
}

#[test]
fn usage_trend_reflects_positive_recent_momentum() {
    let player = base_player();
    let league = empty_league();
    let config = AlphaConfig::default();
    let ctx = SignalContext {
        player: &player,
        league: &league,
        week: 3,
        feeds: BTreeMap::new(),
        config: &config,
    };
    let out = usage_trend(&ctx).unwrap();
    assert!(out.raw > 0.0);
    assert_eq!(out.confidence, recent_form_confidence(3));
}

#[test]
fn projection_residual_errs_without_market_feed() {
    let player = base_player();
    let league = empty_league();
    let config = AlphaConfig::default();
    let ctx = SignalContext {
        player: &player,
        league: &league,
        week: 3,
        feeds: BTreeMap::new(),
        config: &config,
    };
    assert!(projection_residual(&ctx).is_err());
}

#[test]
fn projection_residual_uses_market_feed_when_present() {
    let player = base_player();
    let league = empty_league();
    let config = AlphaConfig::default();
    let mut feeds = BTreeMap::new();
    feeds.insert(
        "market".to_string(),
        FeedEnvelope::new(json!({"market_projection": 20.0}), Utc::now(), Utc::now()),
    );
    let ctx = SignalContext {
        player: &player,
        league: &league,
        week: 3,
        feeds,
        config: &config,
    };
    let out = projection_residual(&ctx).unwrap();
    // baseline for week 3 is 11.0, market is 20.0 -> positive residual
    assert!(out.raw > 0.0);
}

#[test]
fn injury_opportunity_penalizes_own_injury_status() {
    let player = base_player().with_injury_status(Some(crate::league::InjuryStatus::Doubtful));
    let league = empty_league();
    let config = AlphaConfig::default();
    let ctx = SignalContext {
        player: &player,
        league: &league,
        week: 3,
        feeds: BTreeMap::new(),
        config: &config,
    };
    let out = injury_opportunity(&ctx).unwrap();
    assert!(out.raw < 0.0);
    assert_eq!(out.confidence, 0.95);
}

#[test]
fn weather_venue_is_neutral_in_a_dome() {
    let player = base_player();
    let league = empty_league();
    let config = AlphaConfig::default();
    let mut feeds = BTreeMap::new();
    feeds.insert(
        "weather".to_string(),
        FeedEnvelope::new(json!({"dome": 1}), Utc::now(), Utc::now()),
    );
    let ctx = SignalContext {
        player: &player,
        league: &league,
        week: 3,
        feeds,
        config: &config,
    };
    let out = weather_venue(&ctx).unwrap();
    assert_eq!(out.raw, 0.0);
}

#[test]
fn weather_venue_penalizes_high_wind_for_pass_catchers() {
    let player = base_player();
    let league = empty_league();
    let config = AlphaConfig::default();
    let mut feeds = BTreeMap::new();
    feeds.insert(
        "weather".to_string(),
        FeedEnvelope::new(json!({"dome": 0, "wind_mph": 25.0}), Utc::now(), Utc::now()),
    );
    let ctx = SignalContext {
        player: &player,
        league: &league,
        week: 3,
        feeds,
        config: &config,
    };
    let out = weather_venue(&ctx).unwrap();
    assert!(out.raw < 0.0);
}

#[test]
fn position_points_allowed_multiplier_defaults_to_neutral_without_data() {
    let league = empty_league();
    let (multiplier, thin) = position_points_allowed_multiplier(&league, Position::WR, crate::league::TeamId::new(2), 3);
    assert_eq!(multiplier, 1.0);
    assert!(thin);
}
