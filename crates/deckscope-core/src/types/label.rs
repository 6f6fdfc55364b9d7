use std::fmt;

use serde::{Deserialize, Serialize};

/// A functional label attached to a card, with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Label identifier, e.g. `"ManaRock"` or `"fast_mana"`.
    pub label: String,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f32,
    /// Rule or source that produced the label.
    pub evidence: String,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}, {})", self.label, self.confidence, self.evidence)
    }
}

/// The labels of one card, unique by identifier, in first-seen order.
///
/// Re-adding an identifier only replaces the stored label when the new
/// confidence is strictly higher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a label, keeping the highest confidence seen for its identifier.
    ///
    /// Returns `true` if the set changed.
    pub fn add(
        &mut self,
        label: impl Into<String>,
        confidence: f32,
        evidence: impl Into<String>,
    ) -> bool {
        let label = label.into();
        let confidence = confidence.clamp(0.0, 1.0);

        match self.labels.iter_mut().find(|l| l.label == label) {
            Some(existing) if existing.confidence < confidence => {
                existing.confidence = confidence;
                existing.evidence = evidence.into();
                true
            }
            Some(_) => false,
            None => {
                self.labels.push(Label {
                    label,
                    confidence,
                    evidence: evidence.into(),
                });
                true
            }
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.label == label)
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    /// Label identifiers in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.label.as_str())
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Label> {
        self.labels
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}
