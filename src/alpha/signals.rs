//! The 10 base signals and 7 extended signals.
//!
//! Each is a pure function `SignalContext -> Result<SignalOutput, String>`.
//! A signal never panics its way out of a bad input; it returns `Err`
//! and the provider converts that into a neutral default plus a
//! warning.

use crate::alpha::context::{recent_form_confidence, SignalContext};
use crate::league::Position;

#[derive(Debug, Clone)]
pub struct SignalOutput {
    pub raw: f64,
    pub confidence: f64,
    pub source: String,
    pub flags: Vec<String>,
}

impl SignalOutput {
    fn new(raw: f64, confidence: f64, source: &str) -> Self {
        Self {
            raw,
            confidence,
            source: source.to_string(),
            flags: Vec::new(),
        }
    }

    fn with_flag(mut self, flag: &str) -> Self {
        self.flags.push(flag.to_string());
        self
    }
}

pub type SignalFn = fn(&SignalContext) -> Result<SignalOutput, String>;

/// One entry in the signal registry: name, the base (pre-configuration)
/// clip range and weight, and the pure function implementing it.
#[derive(Clone, Copy)]
pub struct SignalSpec {
    pub name: &'static str,
    pub default_clip: (f64, f64),
    pub default_weight: f64,
    pub compute: SignalFn,
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

fn stdev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    (xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64).sqrt()
}

// --- Base set (10) -------------------------------------------------------

fn projection_residual(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let baseline = ctx.player.projected_points(ctx.week).unwrap_or(0.0);
    let market = ctx
        .feed_number("market", "market_projection")
        .ok_or_else(|| "market projection unavailable".to_string())?;
    let explosive_rate = ctx.feed_number("market", "explosive_play_rate").unwrap_or(0.0);
    let raw = (market - baseline) * 0.6 + explosive_rate * 4.0;
    let confidence = if ctx.feed_is_unavailable("market") { 0.3 } else { 0.85 };
    Ok(SignalOutput::new(raw, confidence, "market"))
}

fn usage_trend(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let actuals = ctx.recent_actuals();
    let recent: Vec<f64> = actuals.iter().rev().take(3).copied().collect();
    let prior: Vec<f64> = actuals.iter().rev().skip(3).take(3).copied().collect();
    if recent.is_empty() {
        return Err("no recent weeks to derive usage trend".into());
    }
    let trend = mean(&recent) - mean(&prior);
    let raw = trend * ctx.player.position.scarcity_weight() * 0.3;
    Ok(SignalOutput::new(raw, recent_form_confidence(recent.len()), "scoring_history"))
}

fn injury_opportunity(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let own_penalty = ctx
        .player
        .injury_status
        .map(|s| s.penalty_fraction())
        .unwrap_or(0.0);
    let own_component = -own_penalty * 8.0;

    let teammate_boost = ctx
        .player
        .pro_team_id
        .map(|pro_team| {
            ctx.league
                .teams()
                .iter()
                .flat_map(|t| t.roster.iter())
                .filter(|p| {
                    p.pro_team_id == Some(pro_team)
                        && p.position == ctx.player.position
                        && p.player_id != ctx.player.player_id
                })
                .filter(|p| p.injury_status.map(|s| s.penalty_fraction() >= 0.65).unwrap_or(false))
                .count()
        })
        .unwrap_or(0) as f64
        * 1.5;

    let confidence = if ctx.player.injury_status.is_some() { 0.95 } else { 0.70 };
    Ok(SignalOutput::new(own_component + teammate_boost, confidence, "league_context"))
}

/// Points-allowed-to-position multiplier, the same computation spec
/// §4.5 describes for C5, computed independently here since C3's base
/// signals are each specified as self-contained pure functions.
pub fn position_points_allowed_multiplier(
    league: &dyn crate::league::LeagueContext,
    position: Position,
    opponent_team_id: crate::league::TeamId,
    through_week: u32,
) -> (f64, bool) {
    use std::collections::BTreeMap;

    let mut allowed_by_team: BTreeMap<crate::league::TeamId, f64> = BTreeMap::new();
    let mut weeks_with_data = 0u32;

    for week in 1..=through_week {
        let box_scores = league.box_scores(week);
        if box_scores.is_empty() {
            continue;
        }
        weeks_with_data += 1;
        for team in league.teams() {
            for player in &team.roster {
                if player.position != position {
                    continue;
                }
                if let Some(&pts) = box_scores.get(&player.player_id) {
                    // The defending team faced is whichever opponent this
                    // player's own team played that week.
                    if let Some(opp) = team.schedule.get((week as usize).saturating_sub(1)) {
                        *allowed_by_team.entry(*opp).or_insert(0.0) += pts;
                    }
                }
            }
        }
    }

    if allowed_by_team.is_empty() {
        return (1.0, weeks_with_data < 3);
    }
    let league_mean = mean(&allowed_by_team.values().copied().collect::<Vec<_>>());
    if league_mean <= 0.0 {
        return (1.0, weeks_with_data < 3);
    }
    let team_allowed = *allowed_by_team.get(&opponent_team_id).unwrap_or(&league_mean);
    let multiplier = (team_allowed / league_mean).clamp(0.70, 1.30);
    (multiplier, weeks_with_data < 3)
}

fn matchup_unit(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let opponent = ctx
        .player
        .schedule
        .get(&ctx.week)
        .map(|g| g.opponent_team_id)
        .ok_or_else(|| "no scheduled opponent this week".to_string())?;

    let (multiplier, thin_dvp) = position_points_allowed_multiplier(
        ctx.league,
        ctx.player.position,
        opponent,
        ctx.week.saturating_sub(1).max(0),
    );
    let clamped_multiplier = multiplier.clamp(0.85, 1.15);
    let raw = (clamped_multiplier - 1.0) * 10.0;
    let mut out = SignalOutput::new(raw, 0.80, "league_context");
    if thin_dvp {
        out = out.with_flag("thin_dvp");
    }
    Ok(out)
}

fn game_script(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let spread = ctx
        .feed_number("odds", "spread")
        .ok_or_else(|| "odds spread unavailable".to_string())?;
    let implied_total = ctx.feed_number("odds", "implied_total").unwrap_or(22.0);

    let direction = match ctx.player.position {
        Position::RB => -spread * 0.25,     // favored (negative spread) -> positive script
        Position::WR | Position::TE => spread.abs() * 0.08,
        Position::QB => (implied_total - 22.0) * 0.15,
        _ => 0.0,
    };
    let confidence = if ctx.feed_is_unavailable("odds") { 0.3 } else { 0.80 };
    Ok(SignalOutput::new(direction, confidence, "odds"))
}

fn volatility_aware(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let actuals = ctx.recent_actuals();
    let recent_stdev = stdev(&actuals.iter().rev().take(6).copied().collect::<Vec<_>>());
    let nextgen_volatility = ctx.feed_number("nextgenstats", "volatility_index").unwrap_or(recent_stdev);
    // Mildly negative: higher volatility is a mild penalty, preserved
    // even for boom/bust ceiling plays per the open design question.
    let raw = -(recent_stdev * 0.5 + nextgen_volatility * 0.2);
    Ok(SignalOutput::new(raw, recent_form_confidence(actuals.len().min(6)), "nextgenstats"))
}

fn weather_venue(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let dome = ctx.feed_number("weather", "dome").map(|v| v != 0.0).unwrap_or(false);
    if dome {
        return Ok(SignalOutput::new(0.0, 0.9, "weather"));
    }
    let wind = ctx
        .feed_number("weather", "wind_mph")
        .ok_or_else(|| "wind data unavailable".to_string())?;
    let precipitation = ctx.feed_number("weather", "precipitation_pct").unwrap_or(0.0);

    let wind_penalty = match ctx.player.position {
        Position::QB | Position::WR | Position::K => -(wind - 10.0).max(0.0) * 0.12,
        _ => -(wind - 10.0).max(0.0) * 0.04,
    };
    let rain_penalty = -(precipitation / 100.0) * 1.5;
    Ok(SignalOutput::new(wind_penalty + rain_penalty, 0.75, "weather"))
}

fn market_sentiment_contrarian(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let residual = projection_residual(ctx).map(|r| r.raw).unwrap_or(0.0);
    // High ownership dampens the contrarian read; low ownership with a
    // positive residual amplifies it.
    let crowd_factor = 1.0 - (ctx.player.percent_started / 100.0).clamp(0.0, 1.0);
    Ok(SignalOutput::new(residual * crowd_factor * 0.3, 0.6, "market_sentiment"))
}

fn waiver_replacement_value(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let mut peers: Vec<f64> = ctx
        .league
        .teams()
        .iter()
        .flat_map(|t| t.roster.iter())
        .chain(ctx.league.free_agents(ctx.week))
        .filter(|p| p.position == ctx.player.position)
        .map(|p| mean(&p.actuals_through(ctx.week)))
        .collect();
    if peers.is_empty() {
        return Err("no positional peers to compute replacement level".into());
    }
    peers.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let idx = ((peers.len() as f64) * 0.35).floor() as usize;
    let replacement = peers[idx.min(peers.len() - 1)];
    let player_mean = mean(&ctx.player.actuals_through(ctx.week));
    Ok(SignalOutput::new((player_mean - replacement) * 0.2, 0.65, "league_context"))
}

fn short_term_schedule_cluster(ctx: &SignalContext) -> Result<SignalOutput, String> {
    const HORIZON: u32 = 3;
    let mut multipliers = Vec::new();
    for offset in 0..HORIZON {
        let week = ctx.week + offset;
        if let Some(game) = ctx.player.schedule.get(&week) {
            let (m, _) = position_points_allowed_multiplier(
                ctx.league,
                ctx.player.position,
                game.opponent_team_id,
                ctx.week.saturating_sub(1),
            );
            multipliers.push(m);
        }
    }
    if multipliers.is_empty() {
        return Err("no upcoming schedule data".into());
    }
    let avg = mean(&multipliers);
    Ok(SignalOutput::new((avg - 1.0) * 8.0, 0.70, "league_context"))
}

pub const BASE_SIGNALS: &[SignalSpec] = &[
    SignalSpec { name: "projection_residual", default_clip: (-6.0, 6.0), default_weight: 1.0, compute: projection_residual },
    SignalSpec { name: "usage_trend", default_clip: (-4.0, 4.0), default_weight: 1.0, compute: usage_trend },
    SignalSpec { name: "injury_opportunity", default_clip: (-10.0, 6.0), default_weight: 1.0, compute: injury_opportunity },
    SignalSpec { name: "matchup_unit", default_clip: (-3.0, 3.0), default_weight: 1.0, compute: matchup_unit },
    SignalSpec { name: "game_script", default_clip: (-3.0, 3.0), default_weight: 1.0, compute: game_script },
    SignalSpec { name: "volatility_aware", default_clip: (-3.0, 1.0), default_weight: 1.0, compute: volatility_aware },
    SignalSpec { name: "weather_venue", default_clip: (-3.0, 0.5), default_weight: 1.0, compute: weather_venue },
    SignalSpec { name: "market_sentiment_contrarian", default_clip: (-2.0, 2.0), default_weight: 1.0, compute: market_sentiment_contrarian },
    SignalSpec { name: "waiver_replacement_value", default_clip: (-2.0, 4.0), default_weight: 1.0, compute: waiver_replacement_value },
    SignalSpec { name: "short_term_schedule_cluster", default_clip: (-2.0, 2.0), default_weight: 1.0, compute: short_term_schedule_cluster },
];

// --- Extended set (7), gated by `enable_extended_signals` ---------------

fn player_tilt_leverage(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let tilt = ctx
        .feed_number("market", "ownership_leverage")
        .ok_or_else(|| "ownership leverage unavailable".to_string())?;
    Ok(SignalOutput::new(tilt * 2.0, 0.55, "market"))
}

fn vegas_props(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let prop_line = ctx
        .feed_number("odds", "player_prop_line")
        .ok_or_else(|| "player prop line unavailable".to_string())?;
    let baseline = ctx.player.projected_points(ctx.week).unwrap_or(prop_line);
    Ok(SignalOutput::new((prop_line - baseline) * 0.5, 0.70, "odds"))
}

fn win_probability_script(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let win_prob = ctx
        .feed_number("odds", "implied_win_probability")
        .ok_or_else(|| "implied win probability unavailable".to_string())?;
    let direction = match ctx.player.position {
        Position::RB => (win_prob - 0.5) * 4.0,
        Position::WR | Position::TE => (0.5 - win_prob) * 3.0,
        _ => 0.0,
    };
    Ok(SignalOutput::new(direction, 0.6, "odds"))
}

fn backup_quality_adjustment(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let backup_quality = ctx
        .feed_number("nextgenstats", "backup_quality_index")
        .unwrap_or(0.5);
    let is_starter_out = ctx
        .player
        .pro_team_id
        .map(|pro_team| {
            ctx.league
                .teams()
                .iter()
                .flat_map(|t| t.roster.iter())
                .any(|p| {
                    p.pro_team_id == Some(pro_team)
                        && p.position == ctx.player.position
                        && p.injury_status.map(|s| s.penalty_fraction() >= 0.65).unwrap_or(false)
                })
        })
        .unwrap_or(false);
    if !is_starter_out {
        return Ok(SignalOutput::new(0.0, 0.5, "league_context"));
    }
    Ok(SignalOutput::new((1.0 - backup_quality) * 5.0, 0.6, "nextgenstats"))
}

fn red_zone_opportunity(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let rz_share = ctx
        .feed_number("nextgenstats", "red_zone_share")
        .ok_or_else(|| "red zone share unavailable".to_string())?;
    Ok(SignalOutput::new(rz_share * 6.0, 0.65, "nextgenstats"))
}

fn snap_count_percentage(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let snap_pct = ctx
        .feed_number("nextgenstats", "snap_count_pct")
        .ok_or_else(|| "snap count unavailable".to_string())?;
    Ok(SignalOutput::new((snap_pct - 0.65) * 4.0, 0.6, "nextgenstats"))
}

fn line_movement(ctx: &SignalContext) -> Result<SignalOutput, String> {
    let open_spread = ctx
        .feed_number("odds", "open_spread")
        .ok_or_else(|| "opening spread unavailable".to_string())?;
    let current_spread = ctx.feed_number("odds", "spread").unwrap_or(open_spread);
    let movement = current_spread - open_spread;
    let direction = match ctx.player.position {
        Position::RB => -movement * 0.5,
        Position::WR | Position::TE => movement.abs() * 0.2,
        _ => 0.0,
    };
    Ok(SignalOutput::new(direction, 0.55, "odds"))
}

pub const EXTENDED_SIGNALS: &[SignalSpec] = &[
    SignalSpec { name: "player_tilt_leverage", default_clip: (-2.0, 2.0), default_weight: 0.5, compute: player_tilt_leverage },
    SignalSpec { name: "vegas_props", default_clip: (-3.0, 3.0), default_weight: 0.5, compute: vegas_props },
    SignalSpec { name: "win_probability_script", default_clip: (-2.0, 2.0), default_weight: 0.5, compute: win_probability_script },
    SignalSpec { name: "backup_quality_adjustment", default_clip: (-5.0, 5.0), default_weight: 0.5, compute: backup_quality_adjustment },
    SignalSpec { name: "red_zone_opportunity", default_clip: (-1.0, 3.0), default_weight: 0.5, compute: red_zone_opportunity },
    SignalSpec { name: "snap_count_percentage", default_clip: (-2.0, 2.0), default_weight: 0.5, compute: snap_count_percentage },
    SignalSpec { name: "line_movement", default_clip: (-1.5, 1.5), default_weight: 0.5, compute: line_movement },
];

#[cfg(test)]
mod tests;
