//! The structured document produced by one analysis run.

use serde::{Deserialize, Serialize};

use crate::scoring::{AggregateReport, DerivedProfile, MatchupProfile};
use crate::types::{CardRecord, LabelSet};

/// Selected remote attributes of a card, as written to the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    pub type_line: Option<String>,
    pub cmc: Option<f64>,
    pub keywords: Vec<String>,
    pub produced_mana: Vec<String>,
    /// Normalized oracle text.
    pub oracle_text: String,
}

impl From<&CardRecord> for CardDetails {
    fn from(record: &CardRecord) -> Self {
        Self {
            type_line: record.type_line.clone(),
            cmc: record.cmc,
            keywords: record.keywords.clone(),
            produced_mana: record.produced_mana.clone(),
            oracle_text: record.normalized_oracle_text(),
        }
    }
}

/// One unique card of the deck with its labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardReport {
    pub name: String,
    pub quantity: u32,
    pub card: CardDetails,
    /// Lookup failure, if the card could not be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub labels: LabelSet,
}

/// Full analysis of one deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub deck_name: String,
    pub commanders: Vec<String>,
    /// Image of the first commander, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commander_image: Option<String>,
    pub cards: Vec<CardReport>,
    pub aggregate: AggregateReport,
    pub derived: DerivedProfile,
    pub matchup: MatchupProfile,
}

impl AnalysisReport {
    /// File stem for the report, derived from the deck name.
    #[must_use]
    pub fn file_stem(&self) -> String {
        sanitize_file_stem(&self.deck_name)
    }
}

/// Keeps ASCII letters, digits, `_`, `-` and spaces; falls back to `deck`.
#[must_use]
pub fn sanitize_file_stem(name: &str) -> String {
    let safe: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect();
    if safe.trim().is_empty() {
        "deck".to_string()
    } else {
        safe
    }
}
