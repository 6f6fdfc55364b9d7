//! Hosted-deck providers.
//!
//! Provider APIs change shape between versions, so each adapter lists the
//! response layouts it understands as [`CardStrategy`] values, tried in
//! order until one yields cards.

pub mod archidekt;
pub mod moxfield;

use std::collections::BTreeMap;
use std::fmt;

use deckscope_core::Deck;
use serde_json::Value;

use crate::config::Endpoints;

/// A supported hosted-deck service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Moxfield,
    Archidekt,
}

impl Provider {
    /// Providers in the order deck text is checked against them.
    pub const PRIORITY: [Self; 2] = [Self::Moxfield, Self::Archidekt];

    /// Fragment that identifies a deck URL of this provider.
    #[must_use]
    pub fn url_marker(self) -> &'static str {
        match self {
            Self::Moxfield => "moxfield.com/decks/",
            Self::Archidekt => "archidekt.com/decks/",
        }
    }

    /// API endpoints to try for `deck_id`, in order.
    #[must_use]
    pub fn candidates(self, endpoints: &Endpoints, deck_id: &str) -> Vec<String> {
        match self {
            Self::Moxfield => endpoints.moxfield_deck(deck_id),
            Self::Archidekt => endpoints.archidekt_deck(deck_id),
        }
    }

    /// Builds a deck from one API response, if it holds any cards.
    #[must_use]
    pub fn extract(self, payload: &Value, deck_id: &str) -> Option<Deck> {
        match self {
            Self::Moxfield => moxfield::extract(payload, deck_id),
            Self::Archidekt => archidekt::extract(payload, deck_id),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Card quantities by name.
pub type CardCounts = BTreeMap<String, u32>;

/// One known response layout.
#[derive(Debug, Clone, Copy)]
pub struct CardStrategy {
    /// Where the layout keeps its cards, for logs and tests.
    pub name: &'static str,
    /// Returns `None` when the layout is absent or holds no usable entry.
    pub extract: fn(&Value) -> Option<CardCounts>,
}

/// Runs `strategies` in order and returns the first hit.
#[must_use]
pub fn first_match(
    strategies: &[CardStrategy],
    payload: &Value,
) -> Option<(&'static str, CardCounts)> {
    strategies
        .iter()
        .find_map(|s| (s.extract)(payload).map(|cards| (s.name, cards)))
}

/// Where to look for an entry's name and quantity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntryShape {
    /// JSON pointers tried in order for the card name.
    pub names: &'static [&'static str],
    /// Keys tried in order for the copy count; absent means one copy.
    pub quantities: &'static [&'static str],
}

impl EntryShape {
    fn name<'a>(&self, entry: &'a Value) -> Option<&'a str> {
        self.names
            .iter()
            .filter_map(|pointer| entry.pointer(pointer).and_then(Value::as_str))
            .map(str::trim)
            .find(|name| !name.is_empty())
    }

    /// `None` for zero, negative or non-numeric counts.
    fn quantity(&self, entry: &Value) -> Option<u32> {
        match self.quantities.iter().find_map(|key| entry.get(*key)) {
            None | Some(Value::Null) => Some(1),
            Some(value) => value
                .as_u64()
                .filter(|&q| q > 0)
                .and_then(|q| u32::try_from(q).ok()),
        }
    }

    /// Accumulates usable entries; `None` if none were usable.
    pub fn collect<'a>(&self, entries: impl IntoIterator<Item = &'a Value>) -> Option<CardCounts> {
        let mut cards = CardCounts::new();
        for entry in entries {
            let (Some(name), Some(quantity)) = (self.name(entry), self.quantity(entry)) else {
                continue;
            };
            let total = cards.entry(name.to_string()).or_insert(0);
            *total = total.saturating_add(quantity);
        }
        (!cards.is_empty()).then_some(cards)
    }

    /// Names of all usable entries, in order, without duplicates.
    pub fn names<'a>(&self, entries: impl IntoIterator<Item = &'a Value>) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in entries.into_iter().filter_map(|e| self.name(e)) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

/// Items of a JSON array, or values of a JSON object.
pub(crate) fn entries_of(container: Option<&Value>) -> Vec<&Value> {
    match container {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    }
}

/// First non-blank string among `keys`.
pub(crate) fn first_string<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

pub(crate) fn build_deck(name: String, commanders: Vec<String>, cards: CardCounts) -> Deck {
    let mut deck = Deck::new(name);
    deck.set_commanders(commanders);
    for (card, quantity) in cards {
        deck.add_card(card, quantity);
    }
    deck
}
