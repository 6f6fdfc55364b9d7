use std::fmt;

use serde::{Deserialize, Serialize};

use super::aggregate::AggregateReport;
use super::{LabelWeights, percent_of};

/// Strategic categories a deck's cards are bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypeCategory {
    Ramp,
    Tutors,
    Interaction,
    Draw,
    Stax,
    Recursion,
    Combo,
}

impl ArchetypeCategory {
    /// All categories in display order.
    pub const ALL: [Self; 7] = [
        Self::Ramp,
        Self::Tutors,
        Self::Interaction,
        Self::Draw,
        Self::Stax,
        Self::Recursion,
        Self::Combo,
    ];

    /// Label counts summed into this category.
    #[must_use]
    pub fn weights(self) -> LabelWeights {
        match self {
            Self::Ramp => &[
                ("ManaRock", 1),
                ("ManaDork", 1),
                ("RampLand", 1),
                ("fast_mana", 1),
                ("Ritual", 1),
            ],
            Self::Tutors => &[
                ("TutorAny", 1),
                ("TutorCreature", 1),
                ("Tutor", 1),
                ("TutorRestricted", 1),
                ("unconditional_tutors", 1),
            ],
            Self::Interaction => &[
                ("Counterspell", 1),
                ("SpotRemoval", 1),
                ("BoardWipe", 1),
                ("free_interaction", 1),
            ],
            Self::Draw => &[("Draw", 1), ("Loot", 1)],
            Self::Stax => &[("staple_stax", 1), ("Stax", 1), ("Hatebear", 1)],
            Self::Recursion => &[("Recursion", 1)],
            Self::Combo => &[("ComboPiece", 1), ("ComboEnabler", 1), ("combo_enablers", 1)],
        }
    }
}

impl fmt::Display for ArchetypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Category shares of a deck, in percent of total copies (1 decimal).
///
/// A card can count toward several categories, so `other` (copies not
/// claimed by any category) is a lower bound floored at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DerivedProfile {
    pub ramp: f64,
    pub tutors: f64,
    pub interaction: f64,
    pub draw: f64,
    pub stax: f64,
    pub recursion: f64,
    pub combo: f64,
    pub other: f64,
}

impl DerivedProfile {
    /// Share of one category.
    #[must_use]
    pub fn get(&self, category: ArchetypeCategory) -> f64 {
        match category {
            ArchetypeCategory::Ramp => self.ramp,
            ArchetypeCategory::Tutors => self.tutors,
            ArchetypeCategory::Interaction => self.interaction,
            ArchetypeCategory::Draw => self.draw,
            ArchetypeCategory::Stax => self.stax,
            ArchetypeCategory::Recursion => self.recursion,
            ArchetypeCategory::Combo => self.combo,
        }
    }

    fn set(&mut self, category: ArchetypeCategory, value: f64) {
        let slot = match category {
            ArchetypeCategory::Ramp => &mut self.ramp,
            ArchetypeCategory::Tutors => &mut self.tutors,
            ArchetypeCategory::Interaction => &mut self.interaction,
            ArchetypeCategory::Draw => &mut self.draw,
            ArchetypeCategory::Stax => &mut self.stax,
            ArchetypeCategory::Recursion => &mut self.recursion,
            ArchetypeCategory::Combo => &mut self.combo,
        };
        *slot = value;
    }

    /// `(name, percent)` pairs in display order, `Other` last.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, f64)> {
        ArchetypeCategory::ALL
            .iter()
            .map(|c| (c.to_string(), self.get(*c)))
            .chain(std::iter::once(("Other".to_string(), self.other)))
            .collect()
    }
}

/// Maps aggregate label counts onto the fixed strategic categories.
#[must_use]
pub fn derive(aggregate: &AggregateReport) -> DerivedProfile {
    let total = aggregate.total.max(1);
    let mut profile = DerivedProfile::default();
    let mut claimed: i64 = 0;

    for category in ArchetypeCategory::ALL {
        let raw = aggregate.weighted_sum(category.weights());
        claimed += raw;
        profile.set(category, percent_of(raw as f64, total, 1));
    }

    let other = (total as i64 - claimed).max(0);
    profile.other = percent_of(other as f64, total, 1);
    profile
}
