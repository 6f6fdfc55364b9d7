use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name given to decks that declare none.
pub const DEFAULT_DECK_NAME: &str = "Untitled";

/// A normalized deck: name, commanders and card quantities.
///
/// Quantities are always positive; adding a zero count is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    /// Commander names in declaration order, without duplicates.
    pub commanders: Vec<String>,
    /// Card name to number of copies.
    pub cards: BTreeMap<String, u32>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(DEFAULT_DECK_NAME)
    }
}

impl Deck {
    /// Creates an empty deck with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commanders: Vec::new(),
            cards: BTreeMap::new(),
        }
    }

    /// Adds `quantity` copies of `name`, accumulating with earlier entries.
    ///
    /// Totals saturate at `u32::MAX`.
    pub fn add_card(&mut self, name: impl Into<String>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let total = self.cards.entry(name.into()).or_insert(0);
        *total = total.saturating_add(quantity);
    }

    /// Appends a commander unless it is already listed.
    pub fn add_commander(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.commanders.contains(&name) {
            self.commanders.push(name);
        }
    }

    /// Replaces the commander list, dropping blanks and duplicates.
    pub fn set_commanders<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commanders.clear();
        for name in names {
            let name = name.into();
            if !name.trim().is_empty() {
                self.add_commander(name.trim());
            }
        }
    }

    /// Number of copies of `name`, zero if absent.
    #[must_use]
    pub fn quantity(&self, name: &str) -> u32 {
        self.cards.get(name).copied().unwrap_or(0)
    }

    /// Total number of card copies.
    #[must_use]
    pub fn total_cards(&self) -> u64 {
        self.cards.values().map(|&q| u64::from(q)).sum()
    }

    /// Returns `true` if the deck has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deck({:?}, {} unique, {} total",
            self.name,
            self.cards.len(),
            self.total_cards()
        )?;
        if !self.commanders.is_empty() {
            write!(f, ", commanders={}", self.commanders.join(" / "))?;
        }
        write!(f, ")")
    }
}
