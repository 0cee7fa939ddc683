//! Draft strategy comparison, presentation layer. The Monte Carlo
//! simulation itself lives in `montecarlo::draft`; this module just
//! ranks the resulting metric distributions for a decision.

use crate::montecarlo::DraftStrategyOutcome;

/// Rank strategies by championship probability, then playoff
/// probability, then expected wins, and return the label of the best
/// one plus the full ranked list.
pub fn rank_strategies(
    outcomes: &[(String, DraftStrategyOutcome)],
) -> Vec<(&str, DraftStrategyOutcome)> {
    let mut ranked: Vec<(&str, DraftStrategyOutcome)> =
        outcomes.iter().map(|(label, outcome)| (label.as_str(), *outcome)).collect();
    ranked.sort_by(|a, b| {
        b.1.championship_probability
            .partial_cmp(&a.1.championship_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.1.playoff_probability.partial_cmp(&a.1.playoff_probability).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| b.1.expected_wins.partial_cmp(&a.1.expected_wins).unwrap_or(std::cmp::Ordering::Equal))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_championship_probability_ranks_first() {
        let outcomes = vec![
            ("a".to_string(), DraftStrategyOutcome { expected_wins: 8.0, playoff_probability: 0.5, championship_probability: 0.05 }),
            ("b".to_string(), DraftStrategyOutcome { expected_wins: 7.0, playoff_probability: 0.4, championship_probability: 0.20 }),
        ];
        let ranked = rank_strategies(&outcomes);
        assert_eq!(ranked[0].0, "b");
    }
}
