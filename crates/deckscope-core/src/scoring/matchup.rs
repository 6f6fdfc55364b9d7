use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::LabelWeights;
use super::aggregate::AggregateReport;

/// Coarse meta archetypes a deck is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetaArchetype {
    Aggro,
    Control,
    Combo,
    Engine,
}

impl MetaArchetype {
    pub const ALL: [Self; 4] = [Self::Aggro, Self::Control, Self::Combo, Self::Engine];

    /// Raw score terms. Aggro is penalized by interaction and may go negative.
    #[must_use]
    pub fn weights(self) -> LabelWeights {
        match self {
            Self::Aggro => &[("IsCreature", 1), ("Counterspell", -1), ("BoardWipe", -1)],
            Self::Control => &[("Counterspell", 1), ("BoardWipe", 1), ("free_interaction", 1)],
            Self::Combo => &[("Tutor", 1), ("TutorAny", 1), ("fast_mana", 1), ("ManaRock", 1)],
            Self::Engine => &[("Draw", 1), ("Recursion", 1)],
        }
    }
}

impl fmt::Display for MetaArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Relative strength of a deck against each meta archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupProfile {
    /// Raw score divided by the highest raw score.
    pub scores: BTreeMap<MetaArchetype, f64>,
    pub strongest: MetaArchetype,
    pub weakest: MetaArchetype,
    pub rationale: String,
}

/// Scores the deck against each meta archetype.
///
/// Ties resolve by declaration order: the strongest is the first maximum,
/// the weakest the last minimum.
#[must_use]
pub fn matchup(aggregate: &AggregateReport) -> MatchupProfile {
    let raw: Vec<(MetaArchetype, i64)> = MetaArchetype::ALL
        .iter()
        .map(|&archetype| (archetype, aggregate.weighted_sum(archetype.weights())))
        .collect();

    let max = raw.iter().map(|(_, score)| *score).max().unwrap_or(0);
    let divisor = if max == 0 { 1.0 } else { max as f64 };
    let normalized: Vec<(MetaArchetype, f64)> = raw
        .iter()
        .map(|&(archetype, score)| (archetype, score as f64 / divisor))
        .collect();

    let mut strongest = normalized[0];
    let mut weakest = normalized[0];
    for &entry in &normalized[1..] {
        if entry.1 > strongest.1 {
            strongest = entry;
        }
        if entry.1 <= weakest.1 {
            weakest = entry;
        }
    }

    MatchupProfile {
        scores: normalized.into_iter().collect(),
        strongest: strongest.0,
        weakest: weakest.0,
        rationale: format!(
            "High {} signals and lower {} signals based on labels.",
            strongest.0, weakest.0
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(counts: &[(&str, u64)]) -> AggregateReport {
        AggregateReport {
            counts: counts
                .iter()
                .map(|(label, count)| (label.to_string(), *count))
                .collect(),
            percentages: BTreeMap::new(),
            total: 100,
        }
    }

    #[test]
    fn highest_raw_score_normalizes_to_one() {
        let profile = matchup(&report(&[
            ("IsCreature", 30),
            ("Counterspell", 4),
            ("BoardWipe", 2),
            ("Draw", 12),
            ("ManaRock", 6),
        ]));

        // Aggro = 30 - 6 = 24, Control = 6, Combo = 6, Engine = 12
        assert_eq!(profile.scores[&MetaArchetype::Aggro], 1.0);
        assert_eq!(profile.scores[&MetaArchetype::Control], 0.25);
        assert_eq!(profile.scores[&MetaArchetype::Engine], 0.5);
        assert_eq!(profile.strongest, MetaArchetype::Aggro);
        // Control and Combo tie; the later one is reported.
        assert_eq!(profile.weakest, MetaArchetype::Combo);
        assert_eq!(
            profile.rationale,
            "High Aggro signals and lower Combo signals based on labels."
        );
    }

    #[test]
    fn aggro_can_go_negative() {
        let profile = matchup(&report(&[("Counterspell", 8), ("BoardWipe", 4), ("IsCreature", 2)]));
        // Aggro = -10, Control = 12
        assert_eq!(profile.scores[&MetaArchetype::Control], 1.0);
        assert!(profile.scores[&MetaArchetype::Aggro] < 0.0);
        assert_eq!(profile.strongest, MetaArchetype::Control);
        assert_eq!(profile.weakest, MetaArchetype::Aggro);
    }

    #[test]
    fn all_zero_scores_stay_zero() {
        let profile = matchup(&report(&[]));
        assert!(profile.scores.values().all(|s| *s == 0.0));
        assert_eq!(profile.strongest, MetaArchetype::Aggro);
        assert_eq!(profile.weakest, MetaArchetype::Engine);
    }

    #[test]
    fn scores_serialize_by_name() {
        let profile = matchup(&report(&[("Draw", 3)]));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["scores"]["Engine"], 1.0);
        assert_eq!(json["strongest"], "Engine");
    }
}
