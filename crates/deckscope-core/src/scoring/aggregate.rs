use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{LabelWeights, percent_of};
use crate::types::LabelSet;

/// Deck-wide label totals, weighted by copy count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Label to number of card copies carrying it.
    pub counts: BTreeMap<String, u64>,
    /// Label to share of total copies, in percent (2 decimals).
    pub percentages: BTreeMap<String, f64>,
    /// Total card copies, at least 1.
    pub total: u64,
}

impl AggregateReport {
    /// Copies carrying `label`, zero if none.
    #[must_use]
    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Evaluates a linear combination of label counts.
    #[must_use]
    pub fn weighted_sum(&self, weights: LabelWeights) -> i64 {
        weights
            .iter()
            .map(|(label, coefficient)| coefficient * self.count(label) as i64)
            .sum()
    }
}

/// Folds per-card labels into deck-wide counts and percentages.
///
/// Every label of a card contributes that card's quantity; cards missing
/// from `quantities` count once.
#[must_use]
pub fn aggregate(
    labels_by_card: &BTreeMap<String, LabelSet>,
    quantities: &BTreeMap<String, u32>,
) -> AggregateReport {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for (name, labels) in labels_by_card {
        let quantity = u64::from(quantities.get(name).copied().unwrap_or(1));
        for label in labels {
            *counts.entry(label.label.clone()).or_insert(0) += quantity;
        }
    }

    let total = quantities.values().map(|&q| u64::from(q)).sum::<u64>().max(1);
    let percentages = counts
        .iter()
        .map(|(label, &count)| (label.clone(), percent_of(count as f64, total, 2)))
        .collect();

    AggregateReport {
        counts,
        percentages,
        total,
    }
}
