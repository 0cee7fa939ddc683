//! Lineup recommendation. Reuses the shared greedy lineup-selection
//! routine with "value" defined as
//! `blended_mean - λ·uncertainty` (λ = 0 is ceiling play, λ > 0 is
//! floor play), then reports bench alternatives and an audit summary
//! for each slot.

use std::collections::BTreeMap;

use crate::blend::PlayerProjection;
use crate::league::{Player, PlayerId, RosterSlots};
use crate::roster::{select_optimal_lineup, SlotLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    fn from_score(confidence: f64) -> Self {
        if confidence >= 0.75 {
            ConfidenceLevel::High
        } else if confidence >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchAlternative<'p> {
    pub player: &'p Player,
    pub baseline: f64,
    pub alpha_projection: f64,
}

#[derive(Debug, Clone)]
pub struct SlotRecommendation<'p> {
    pub label: SlotLabel,
    pub recommended: Option<&'p Player>,
    pub baseline: f64,
    pub alpha_projection: f64,
    pub bench_alternatives: Vec<BenchAlternative<'p>>,
    /// Boundary case (spec §8): every eligible player for this slot,
    /// recommended and alternatives alike, carries an unhealthy injury
    /// status. The recommended player is still whichever is
    /// least-penalized (the blend's injury penalty already shows up in
    /// `alpha_projection`); this flag just surfaces that the slot has no
    /// clean option.
    pub all_candidates_injured: bool,
}

fn is_unhealthy(player: &Player) -> bool {
    player.injury_status.map(|s| !s.is_healthy()).unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct LineupAudit {
    pub total_baseline: f64,
    pub total_alpha: f64,
    pub alpha_lift: f64,
    pub confidence_level: ConfidenceLevel,
    pub decision_factors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LineupRecommendation<'p> {
    pub slots: Vec<SlotRecommendation<'p>>,
    pub audit: LineupAudit,
}

fn value_of(projections: &BTreeMap<PlayerId, PlayerProjection>, player: &Player, lambda: f64) -> f64 {
    projections
        .get(&player.player_id)
        .map(|p| p.blended_mean - lambda * p.uncertainty)
        .unwrap_or(f64::MIN)
}

/// Build the recommended starting lineup. `lambda` defaults to 0.0
/// (ceiling play); a positive value trades mean for lower variance
/// (floor play). Every slot a roster can fill gets a player — a slot is
/// only left empty when no eligible candidate exists at all.
pub fn recommend_lineup<'p>(
    roster: &'p [Player],
    slots: &RosterSlots,
    projections: &BTreeMap<PlayerId, PlayerProjection>,
    lambda: f64,
) -> LineupRecommendation<'p> {
    let lineup = select_optimal_lineup(roster, slots, |p| value_of(projections, p, lambda));

    let mut slot_recs = Vec::with_capacity(lineup.starters.len());
    let mut total_baseline = 0.0;
    let mut total_alpha = 0.0;
    let mut confidences = Vec::new();
    let mut factor_weight: BTreeMap<String, f64> = BTreeMap::new();

    for assignment in &lineup.starters {
        let eligible_position = match assignment.label {
            SlotLabel::Position(pos, _) => Some(pos),
            SlotLabel::Flex(_) => None,
        };
        let mut alternatives: Vec<&Player> = roster
            .iter()
            .filter(|p| match eligible_position {
                Some(pos) => p.position == pos,
                None => slots.flex_eligible.contains(&p.position),
            })
            .filter(|p| assignment.player.map(|chosen| chosen.player_id != p.player_id).unwrap_or(true))
            .collect();
        alternatives.sort_by(|a, b| {
            value_of(projections, b, lambda)
                .partial_cmp(&value_of(projections, a, lambda))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let (baseline, alpha_projection) = assignment
            .player
            .and_then(|p| projections.get(&p.player_id))
            .map(|proj| (proj.baseline, proj.blended_mean))
            .unwrap_or((0.0, 0.0));
        total_baseline += baseline;
        total_alpha += alpha_projection;

        if let Some(p) = assignment.player {
            if let Some(proj) = projections.get(&p.player_id) {
                confidences.push(proj.confidence);
                for c in &proj.contributions {
                    *factor_weight.entry(c.signal_name.clone()).or_insert(0.0) += c.clipped.abs() * c.weight;
                }
            }
        }

        let all_candidates_injured = assignment.player.map(is_unhealthy).unwrap_or(false)
            && alternatives.iter().all(|p| is_unhealthy(p));

        slot_recs.push(SlotRecommendation {
            label: assignment.label,
            recommended: assignment.player,
            baseline,
            alpha_projection,
            bench_alternatives: alternatives
                .into_iter()
                .map(|p| {
                    let (baseline, alpha_projection) = projections
                        .get(&p.player_id)
                        .map(|proj| (proj.baseline, proj.blended_mean))
                        .unwrap_or((0.0, 0.0));
                    BenchAlternative { player: p, baseline, alpha_projection }
                })
                .collect(),
            all_candidates_injured,
        });
    }

    let avg_confidence = if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64
    };

    let mut ranked_factors: Vec<(String, f64)> = factor_weight.into_iter().collect();
    ranked_factors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let decision_factors = ranked_factors.into_iter().take(3).map(|(name, _)| name).collect();

    LineupRecommendation {
        slots: slot_recs,
        audit: LineupAudit {
            total_baseline,
            total_alpha,
            alpha_lift: total_alpha - total_baseline,
            confidence_level: ConfidenceLevel::from_score(avg_confidence),
            decision_factors,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{PlayerId, Position};

    fn projection(player_id: u64, blended_mean: f64, uncertainty: f64, confidence: f64) -> PlayerProjection {
        PlayerProjection {
            player_id,
            position: Position::RB,
            baseline: blended_mean - 1.0,
            blended_mean,
            uncertainty,
            confidence,
            contributions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn ceiling_play_picks_highest_mean_regardless_of_uncertainty() {
        let roster = vec![
            Player::new(PlayerId::new(1), "Boom", Position::RB).unwrap(),
            Player::new(PlayerId::new(2), "Steady", Position::RB).unwrap(),
        ];
        let mut projections = BTreeMap::new();
        projections.insert(PlayerId::new(1), projection(1, 20.0, 10.0, 0.6));
        projections.insert(PlayerId::new(2), projection(2, 15.0, 1.0, 0.9));

        let slots = RosterSlots {
            starters: vec![(Position::RB, 1)],
            flex_slots: 0,
            flex_eligible: vec![],
            bench_size: 1,
        };
        let rec = recommend_lineup(&roster, &slots, &projections, 0.0);
        assert_eq!(rec.slots[0].recommended.unwrap().player_id, PlayerId::new(1));
    }

    #[test]
    fn floor_play_with_positive_lambda_can_flip_the_pick() {
        let roster = vec![
            Player::new(PlayerId::new(1), "Boom", Position::RB).unwrap(),
            Player::new(PlayerId::new(2), "Steady", Position::RB).unwrap(),
        ];
        let mut projections = BTreeMap::new();
        projections.insert(PlayerId::new(1), projection(1, 20.0, 10.0, 0.6));
        projections.insert(PlayerId::new(2), projection(2, 15.0, 1.0, 0.9));

        let slots = RosterSlots {
            starters: vec![(Position::RB, 1)],
            flex_slots: 0,
            flex_eligible: vec![],
            bench_size: 1,
        };
        let rec = recommend_lineup(&roster, &slots, &projections, 1.0);
        assert_eq!(rec.slots[0].recommended.unwrap().player_id, PlayerId::new(2));
    }

    #[test]
    fn audit_reports_alpha_lift_and_confidence_level() {
        let roster = vec![Player::new(PlayerId::new(1), "Only", Position::RB).unwrap()];
        let mut projections = BTreeMap::new();
        projections.insert(PlayerId::new(1), projection(1, 18.0, 3.0, 0.8));

        let slots = RosterSlots {
            starters: vec![(Position::RB, 1)],
            flex_slots: 0,
            flex_eligible: vec![],
            bench_size: 0,
        };
        let rec = recommend_lineup(&roster, &slots, &projections, 0.0);
        assert!((rec.audit.alpha_lift - 1.0).abs() < 1e-9);
        assert_eq!(rec.audit.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn all_starters_injured_still_picks_least_penalized_and_flags_the_slot() {
        use crate::league::InjuryStatus;

        let roster = vec![
            Player::new(PlayerId::new(1), "Hurt1", Position::RB)
                .unwrap()
                .with_injury_status(Some(InjuryStatus::Questionable)),
            Player::new(PlayerId::new(2), "Hurt2", Position::RB)
                .unwrap()
                .with_injury_status(Some(InjuryStatus::Doubtful)),
        ];
        let mut projections = BTreeMap::new();
        // Blend already applied each injury penalty; #1 is the least-penalized.
        projections.insert(PlayerId::new(1), projection(1, 12.0, 3.0, 0.6));
        projections.insert(PlayerId::new(2), projection(2, 6.0, 3.0, 0.6));

        let slots = RosterSlots {
            starters: vec![(Position::RB, 1)],
            flex_slots: 0,
            flex_eligible: vec![],
            bench_size: 1,
        };
        let rec = recommend_lineup(&roster, &slots, &projections, 0.0);
        assert_eq!(rec.slots[0].recommended.unwrap().player_id, PlayerId::new(1));
        assert!(rec.slots[0].all_candidates_injured);
    }
}
