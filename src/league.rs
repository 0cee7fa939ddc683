//! The closed data model, plus the opaque `LeagueContext` collaborator.
//!
//! A parsing step at the league-collaborator boundary validates and
//! normalizes data instead of scattering defensive field access
//! throughout callers, and composition replaces inheritance for the
//! lineup-entry/player relationship: `Player`/`Team` are constructed
//! only through validating constructors, and `WeeklyLineupEntry` wraps
//! a `Player` rather than subclassing it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};


/// Type-safe wrapper for player identifiers, mirroring the teacher's
/// `PlayerId`/`LeagueId` newtype style (`cli/types/ids.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe wrapper for season years, matching the teacher's `Season`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(pub u16);

impl Season {
    pub fn new(year: u16) -> Self {
        Self(year)
    }
    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe wrapper for week numbers, matching the teacher's `Week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Week(pub u16);

impl Week {
    pub fn new(week: u16) -> Self {
        Self(week)
    }
    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Known fantasy lineup positions (spec §3). Reuses the teacher's
/// `Position` shape (`cli/types/position.rs`) but drops the ESPN slot-id
/// discriminants since this crate never talks ESPN's wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    #[serde(rename = "DEF")]
    Def,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::K,
        Position::Def,
    ];

    /// Scarcity weight used by C5's ROS roster valuation.
    pub fn scarcity_weight(&self) -> f64 {
        match self {
            Position::QB | Position::TE => 1.2,
            Position::RB | Position::WR => 1.1,
            Position::K => 0.5,
            Position::Def => 0.7,
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "QB" => Ok(Self::QB),
            "RB" => Ok(Self::RB),
            "WR" => Ok(Self::WR),
            "TE" => Ok(Self::TE),
            "K" => Ok(Self::K),
            "DEF" | "D" | "D/ST" | "DST" => Ok(Self::Def),
            other => Err(format!("Unrecognized player position: {other:?}")),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::Def => "DEF",
        };
        write!(f, "{s}")
    }
}

/// Injury status, the closed set from spec §3. Open question #3:
/// normalize to uppercase, keep the full `INJURY_RESERVE` token (never
/// rewritten to `IR`), and let the free-agent whitelist rule (spec §4.7)
/// decide who counts as healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryStatus {
    Active,
    Normal,
    Out,
    Questionable,
    Doubtful,
    InjuryReserve,
    Suspension,
    DayToDay,
}

impl InjuryStatus {
    /// Whitelist used by free-agent filtering: only these count as healthy.
    pub fn is_healthy(&self) -> bool {
        matches!(self, InjuryStatus::Active | InjuryStatus::Normal)
    }

    /// Injury penalty multiplier applied last in C4's blend (spec §4.4).
    pub fn penalty_fraction(&self) -> f64 {
        match self {
            InjuryStatus::Out | InjuryStatus::InjuryReserve | InjuryStatus::Suspension => 1.0,
            InjuryStatus::Doubtful => 0.65,
            InjuryStatus::Questionable => 0.15,
            InjuryStatus::DayToDay => 0.10,
            InjuryStatus::Active | InjuryStatus::Normal => 0.0,
        }
    }
}

impl FromStr for InjuryStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "NORMAL" | "" => Ok(Self::Normal),
            "OUT" => Ok(Self::Out),
            "QUESTIONABLE" => Ok(Self::Questionable),
            "DOUBTFUL" => Ok(Self::Doubtful),
            "INJURY_RESERVE" => Ok(Self::InjuryReserve),
            "SUSPENSION" => Ok(Self::Suspension),
            "DAY_TO_DAY" => Ok(Self::DayToDay),
            other => Err(format!("Unrecognized injury status: {other:?}")),
        }
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InjuryStatus::Active => "ACTIVE",
            InjuryStatus::Normal => "NORMAL",
            InjuryStatus::Out => "OUT",
            InjuryStatus::Questionable => "QUESTIONABLE",
            InjuryStatus::Doubtful => "DOUBTFUL",
            InjuryStatus::InjuryReserve => "INJURY_RESERVE",
            InjuryStatus::Suspension => "SUSPENSION",
            InjuryStatus::DayToDay => "DAY_TO_DAY",
        };
        write!(f, "{s}")
    }
}

/// A single scoring-period entry in a player's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeeklyScore {
    pub points: f64,
    pub projected_points: Option<f64>,
}

/// A scheduled opponent for a given week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub opponent_team_id: TeamId,
    pub kickoff: chrono::DateTime<chrono::Utc>,
}

/// Outcome of a team's week, per spec §3: `{W, L, T, U}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekOutcome {
    Win,
    Loss,
    Tie,
    Undecided,
}

/// A player, validated at construction (Design Notes: no scattered
/// defensive field access downstream).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub pro_team_id: Option<TeamId>,
    pub scoring_history: BTreeMap<u32, WeeklyScore>,
    pub schedule: BTreeMap<u32, ScheduledGame>,
    pub injury_status: Option<InjuryStatus>,
    pub active: bool,
    pub percent_started: f64,
}

impl Player {
    /// Construct a player, enforcing the invariants from spec §3: scoring
    /// period keys are positive and points are non-negative.
    pub fn new(
        player_id: PlayerId,
        name: impl Into<String>,
        position: Position,
    ) -> Result<Self> {
        Ok(Self {
            player_id,
            name: name.into(),
            position,
            pro_team_id: None,
            scoring_history: BTreeMap::new(),
            schedule: BTreeMap::new(),
            injury_status: None,
            active: true,
            percent_started: 0.0,
        })
    }

    /// Record a scored week, rejecting a non-positive period or negative
    /// points (spec §3 invariant), surfaced as `IntegrityViolation`.
    pub fn with_scored_week(
        mut self,
        period: u32,
        points: f64,
        projected_points: Option<f64>,
    ) -> Result<Self> {
        if period == 0 {
            return Err(SimError::IntegrityViolation {
                detail: format!("scoring period must be positive, got {period}"),
            });
        }
        if points < 0.0 {
            return Err(SimError::IntegrityViolation {
                detail: format!(
                    "player {} week {period}: points must be >= 0, got {points}",
                    self.player_id
                ),
            });
        }
        self.scoring_history.insert(
            period,
            WeeklyScore {
                points,
                projected_points,
            },
        );
        Ok(self)
    }

    pub fn with_schedule_entry(mut self, week: u32, game: ScheduledGame) -> Self {
        self.schedule.insert(week, game);
        self
    }

    pub fn with_injury_status(mut self, status: Option<InjuryStatus>) -> Self {
        self.injury_status = status;
        self
    }

    pub fn with_percent_started(mut self, pct: f64) -> Self {
        self.percent_started = pct;
        self
    }

    /// Actual points scored in `week`, if any.
    pub fn actual_points(&self, week: u32) -> Option<f64> {
        self.scoring_history.get(&week).map(|w| w.points)
    }

    /// Projected ("ESPN baseline" in spec terms) points for `week`, if any.
    pub fn projected_points(&self, week: u32) -> Option<f64> {
        self.scoring_history.get(&week).and_then(|w| w.projected_points)
    }

    /// Weekly actual points for weeks `1..=through_week`, in week order —
    /// the series C1 training extracts (spec §4.1).
    pub fn actuals_through(&self, through_week: u32) -> Vec<f64> {
        self.scoring_history
            .range(1..=through_week)
            .map(|(_, w)| w.points)
            .collect()
    }

    /// Whether the free-agent whitelist (spec §4.7) would keep this player.
    pub fn is_healthy_for_waiver(&self) -> bool {
        self.injury_status.map(|s| s.is_healthy()).unwrap_or(true)
    }
}

/// A `Player` wrapped with week-specific lineup fields — the Design Notes'
/// replacement for the original's `BoxPlayer extends Player` inheritance.
#[derive(Debug, Clone)]
pub struct WeeklyLineupEntry {
    pub player: Player,
    pub week: u32,
    pub slot: Position,
    pub opponent_team_id: Option<TeamId>,
}

impl WeeklyLineupEntry {
    pub fn new(player: Player, week: u32, slot: Position) -> Self {
        let opponent_team_id = player.schedule.get(&week).map(|g| g.opponent_team_id);
        Self {
            player,
            week,
            slot,
            opponent_team_id,
        }
    }
}

/// A fantasy team, validated at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub name: String,
    pub division: String,
    pub roster: Vec<Player>,
    pub schedule: Vec<TeamId>,
    pub scores: BTreeMap<u32, f64>,
    pub outcomes: BTreeMap<u32, WeekOutcome>,
    pub acquisitions: u32,
    pub drops: u32,
    pub trades: u32,
}

impl Team {
    pub fn new(team_id: TeamId, name: impl Into<String>, division: impl Into<String>) -> Self {
        Self {
            team_id,
            name: name.into(),
            division: division.into(),
            roster: Vec::new(),
            schedule: Vec::new(),
            scores: BTreeMap::new(),
            outcomes: BTreeMap::new(),
            acquisitions: 0,
            drops: 0,
            trades: 0,
        }
    }

    /// Validate spec §3's team invariants: schedule length equals the
    /// league's total weeks, and a score at week `w` exists iff the
    /// outcome at `w` is decided (`W`/`L`/`T`).
    pub fn validate(&self, total_weeks: usize) -> Result<()> {
        if self.schedule.len() != total_weeks {
            return Err(SimError::IntegrityViolation {
                detail: format!(
                    "team {} schedule has {} weeks, expected {total_weeks}",
                    self.team_id,
                    self.schedule.len()
                ),
            });
        }
        let mut seen = std::collections::HashSet::new();
        for p in &self.roster {
            if !seen.insert(p.player_id) {
                return Err(SimError::IntegrityViolation {
                    detail: format!("duplicate player id {} on team {} roster", p.player_id, self.team_id),
                });
            }
        }
        for (week, outcome) in &self.outcomes {
            let decided = matches!(outcome, WeekOutcome::Win | WeekOutcome::Loss | WeekOutcome::Tie);
            let has_score = self.scores.contains_key(week);
            if decided != has_score {
                return Err(SimError::IntegrityViolation {
                    detail: format!(
                        "team {} week {week}: score presence ({has_score}) must match decided outcome ({decided})",
                        self.team_id
                    ),
                });
            }
        }
        Ok(())
    }

    /// Players eligible for a given slot (exact position match, or any
    /// position for `FLEX`-style slots handled by the caller).
    pub fn players_at(&self, position: Position) -> impl Iterator<Item = &Player> {
        self.roster.iter().filter(move |p| p.position == position)
    }

    pub fn weeks_remaining(&self, current_week: u32) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter(|(week, outcome)| **week >= current_week && **outcome == WeekOutcome::Undecided)
            .map(|(week, _)| *week)
            .collect()
    }
}

/// League-wide roster slot requirements for the optimal-lineup search in
/// C5/C6/C7 (e.g. `{QB: 1, RB: 2, WR: 2, TE: 1, FLEX: 1, K: 1, DEF: 1}`).
/// `FLEX` slots are modeled as extra eligible positions rather than a
/// distinct `Position` variant, resolved by `RosterSlots::flex_eligible`.
#[derive(Debug, Clone)]
pub struct RosterSlots {
    pub starters: Vec<(Position, u8)>,
    pub flex_slots: u8,
    pub flex_eligible: Vec<Position>,
    pub bench_size: u8,
}

impl Default for RosterSlots {
    fn default() -> Self {
        Self {
            starters: vec![
                (Position::QB, 1),
                (Position::RB, 2),
                (Position::WR, 2),
                (Position::TE, 1),
                (Position::K, 1),
                (Position::Def, 1),
            ],
            flex_slots: 1,
            flex_eligible: vec![Position::RB, Position::WR, Position::TE],
            bench_size: 6,
        }
    }
}

/// Immutable league-wide settings for a given snapshot (spec §3).
#[derive(Debug, Clone)]
pub struct LeagueSettings {
    pub league_id: u32,
    pub season: Season,
    pub current_week: u32,
    pub regular_season_final_week: u32,
    pub total_weeks: u32,
    pub playoff_team_count: u8,
    pub roster_slots: RosterSlots,
    pub scoring_format_id: u32,
}

/// The opaque external collaborator from spec §6. The core never
/// constructs network requests for league data itself; it only consumes
/// whatever implements this trait (teams, free agents, box scores, recent
/// activity, player lookup).
pub trait LeagueContext: Send + Sync {
    fn settings(&self) -> &LeagueSettings;
    fn teams(&self) -> &[Team];
    fn team(&self, team_id: TeamId) -> Option<&Team>;
    fn free_agents(&self, week: u32) -> Vec<&Player>;
    /// Actual points for every player in a given week's box scores.
    fn box_scores(&self, week: u32) -> BTreeMap<PlayerId, f64>;
    fn player(&self, player_id: PlayerId) -> Option<&Player>;
    fn player_by_name(&self, name: &str) -> Option<&Player>;
}

/// A concrete, in-process `LeagueContext` used by tests, backtests, and the
/// demonstration binary — the counterpart to the teacher's
/// `storage::PlayerDatabase` bundling data access behind one struct.
#[derive(Debug, Clone)]
pub struct InMemoryLeagueContext {
    pub settings: LeagueSettings,
    pub teams: Vec<Team>,
    pub free_agent_pool: Vec<Player>,
}

impl InMemoryLeagueContext {
    pub fn new(settings: LeagueSettings, teams: Vec<Team>) -> Self {
        Self {
            settings,
            teams,
            free_agent_pool: Vec::new(),
        }
    }

    pub fn with_free_agents(mut self, players: Vec<Player>) -> Self {
        self.free_agent_pool = players;
        self
    }
}

impl LeagueContext for InMemoryLeagueContext {
    fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    fn teams(&self) -> &[Team] {
        &self.teams
    }

    fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    fn free_agents(&self, _week: u32) -> Vec<&Player> {
        self.free_agent_pool.iter().collect()
    }

    fn box_scores(&self, week: u32) -> BTreeMap<PlayerId, f64> {
        let mut out = BTreeMap::new();
        for team in &self.teams {
            for player in &team.roster {
                if let Some(pts) = player.actual_points(week) {
                    out.insert(player.player_id, pts);
                }
            }
        }
        out
    }

    fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.teams
            .iter()
            .flat_map(|t| t.roster.iter())
            .find(|p| p.player_id == player_id)
    }

    fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.teams
            .iter()
            .flat_map(|t| t.roster.iter())
            .find(|p| p.name == name)
    }
}
