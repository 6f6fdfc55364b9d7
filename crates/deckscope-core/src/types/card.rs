use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator placed between face texts of a multi-faced card.
pub const FACE_SEPARATOR: &str = "\n//\n";

/// Format legality as reported by the card data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Legality {
    Legal,
    NotLegal,
    Banned,
    Restricted,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Legality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legal => write!(f, "legal"),
            Self::NotLegal => write!(f, "not_legal"),
            Self::Banned => write!(f, "banned"),
            Self::Restricted => write!(f, "restricted"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Image references for a card or card face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageUris {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

impl ImageUris {
    fn preferred(&self) -> Option<&str> {
        self.normal.as_deref().or(self.large.as_deref())
    }
}

/// One face of a multi-faced card (split, transform, adventure, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
}

/// Structured card attributes as returned by the remote card data source.
///
/// A lookup that failed is still a `CardRecord`: it carries an error marker
/// (`object == "error"` from the remote, or a local `error` reason) and
/// otherwise empty attributes, so every downstream stage can treat it like
/// any other card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    /// Mana value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmc: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produced_mana: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub legalities: BTreeMap<String, Legality>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<CardFace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    /// Local failure reason (`request_failed`, `HTTP 404`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Remote error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CardRecord {
    /// Creates an error-marked record carrying only the failure reason.
    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if this record marks a failed lookup.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.object.as_deref() == Some("error")
    }

    /// Human-readable description of the failure, if any.
    #[must_use]
    pub fn error_details(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        self.details
            .as_deref()
            .or(self.error.as_deref())
            .or(Some("unknown error"))
    }

    /// Lower-cased type line, empty when absent.
    #[must_use]
    pub fn type_line_lower(&self) -> String {
        self.type_line.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Returns `true` if the record reports the card as legal in commander.
    #[must_use]
    pub fn is_commander_legal(&self) -> bool {
        self.legalities.get("commander") == Some(&Legality::Legal)
    }

    /// Combined oracle text of the card, normalized for pattern matching.
    ///
    /// Multi-faced cards without top-level text contribute every face,
    /// joined by [`FACE_SEPARATOR`] before normalization.
    #[must_use]
    pub fn normalized_oracle_text(&self) -> String {
        match self.oracle_text.as_deref() {
            Some(text) if !text.is_empty() => normalize_oracle_text(text),
            _ => {
                let faces: Vec<&str> = self
                    .card_faces
                    .iter()
                    .map(|face| face.oracle_text.as_deref().unwrap_or_default())
                    .collect();
                normalize_oracle_text(&faces.join(FACE_SEPARATOR))
            }
        }
    }

    /// URL of the card image, preferring the `normal` size.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        if let Some(uris) = &self.image_uris {
            return uris.preferred();
        }
        self.card_faces
            .first()
            .and_then(|face| face.image_uris.as_ref())
            .and_then(ImageUris::preferred)
    }
}

/// Strips parenthesized reminder text, collapses whitespace and lower-cases.
///
/// An opening parenthesis without a matching close is kept verbatim.
#[must_use]
pub fn normalize_oracle_text(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                stripped.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    stripped.push_str(rest);

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
