//! Greedy optimal-lineup selection, shared by C5 (ROS roster valuation),
//! C6 (team ratings / matchup sampling), and C7 (lineup recommendation).
//!
//! Spec §4.5: "optimal starting lineup chosen greedily by position slot
//! counts". This is the one routine that picks a lineup; each caller
//! supplies its own notion of "value" (a season mean, a blended
//! projection, a ceiling-vs-floor score) via the `value` closure.

use crate::league::{Player, Position, RosterSlots};

/// Where a starter sits: a named position slot (with its 0-based index
/// among that position's slots) or a `FLEX` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLabel {
    Position(Position, u8),
    Flex(u8),
}

#[derive(Debug, Clone)]
pub struct SlotAssignment<'p> {
    pub label: SlotLabel,
    pub player: Option<&'p Player>,
}

#[derive(Debug, Clone)]
pub struct OptimalLineup<'p> {
    pub starters: Vec<SlotAssignment<'p>>,
    pub bench: Vec<&'p Player>,
}

impl<'p> OptimalLineup<'p> {
    pub fn starter_players(&self) -> impl Iterator<Item = &'p Player> + '_ {
        self.starters.iter().filter_map(|s| s.player)
    }
}

/// Fill each named position slot, highest `value` first, then the FLEX
/// slots from whatever `flex_eligible` players remain, then whatever's
/// left over is bench. Never leaves a slot filled with a worse player
/// than one left on the bench (ties broken by roster order, which is
/// stable since `sort_by` is a stable sort).
pub fn select_optimal_lineup<'p, F>(
    roster: &'p [Player],
    slots: &RosterSlots,
    mut value: F,
) -> OptimalLineup<'p>
where
    F: FnMut(&Player) -> f64,
{
    let mut available: Vec<&Player> = roster.iter().collect();
    let mut starters = Vec::new();

    for (position, count) in &slots.starters {
        let mut candidates: Vec<&Player> = available
            .iter()
            .copied()
            .filter(|p| p.position == *position)
            .collect();
        candidates.sort_by(|a, b| value(b).partial_cmp(&value(a)).unwrap_or(std::cmp::Ordering::Equal));

        for i in 0..*count {
            let chosen = candidates.get(i as usize).copied();
            if let Some(p) = chosen {
                available.retain(|x| x.player_id != p.player_id);
            }
            starters.push(SlotAssignment {
                label: SlotLabel::Position(*position, i),
                player: chosen,
            });
        }
    }

    let mut flex_candidates: Vec<&Player> = available
        .iter()
        .copied()
        .filter(|p| slots.flex_eligible.contains(&p.position))
        .collect();
    flex_candidates.sort_by(|a, b| value(b).partial_cmp(&value(a)).unwrap_or(std::cmp::Ordering::Equal));

    for i in 0..slots.flex_slots {
        let chosen = flex_candidates.get(i as usize).copied();
        if let Some(p) = chosen {
            available.retain(|x| x.player_id != p.player_id);
        }
        starters.push(SlotAssignment {
            label: SlotLabel::Flex(i),
            player: chosen,
        });
    }

    OptimalLineup {
        starters,
        bench: available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{PlayerId, RosterSlots};
    use std::collections::BTreeMap;

    fn player(id: u64, position: Position) -> Player {
        Player::new(PlayerId::new(id), format!("P{id}"), position).unwrap()
    }

    #[test]
    fn fills_named_slots_before_flex_by_value_descending() {
        let roster = vec![
            player(1, Position::RB),
            player(2, Position::RB),
            player(3, Position::RB),
            player(4, Position::WR),
            player(5, Position::WR),
        ];
        let mut values: BTreeMap<u64, f64> = BTreeMap::new();
        values.insert(1, 20.0);
        values.insert(2, 10.0);
        values.insert(3, 15.0);
        values.insert(4, 12.0);
        values.insert(5, 8.0);

        let slots = RosterSlots::default();
        let lineup = select_optimal_lineup(&roster, &slots, |p| values[&p.player_id.as_u64()]);

        let rb_starters: Vec<u64> = lineup
            .starters
            .iter()
            .filter(|s| matches!(s.label, SlotLabel::Position(Position::RB, _)))
            .filter_map(|s| s.player.map(|p| p.player_id.as_u64()))
            .collect();
        assert_eq!(rb_starters, vec![1, 3]);

        // RB #2 (value 10.0) didn't make a named slot; it's eligible for FLEX.
        let flex: Vec<u64> = lineup
            .starters
            .iter()
            .filter(|s| matches!(s.label, SlotLabel::Flex(_)))
            .filter_map(|s| s.player.map(|p| p.player_id.as_u64()))
            .collect();
        assert_eq!(flex, vec![2]);
        assert_eq!(lineup.bench.len(), 0);
    }

    #[test]
    fn missing_players_leave_the_slot_empty_not_panicking() {
        let roster = vec![player(1, Position::QB)];
        let slots = RosterSlots::default();
        let lineup = select_optimal_lineup(&roster, &slots, |_| 10.0);
        let rb_slot = lineup
            .starters
            .iter()
            .find(|s| matches!(s.label, SlotLabel::Position(Position::RB, 0)))
            .unwrap();
        assert!(rb_slot.player.is_none());
    }
}
