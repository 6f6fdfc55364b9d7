use serde_json::Value;

use super::{CardCounts, CardStrategy, EntryShape, build_deck, entries_of, first_match, first_string};
use deckscope_core::Deck;

const ENTRY: EntryShape = EntryShape {
    names: &["/card/name", "/card/oracleCard/name", "/cardName"],
    quantities: &["quantity"],
};

const COMMANDER: EntryShape = EntryShape {
    names: &["/cardName", "/name"],
    quantities: &[],
};

/// Response layouts in the order they are probed.
pub const STRATEGIES: &[CardStrategy] = &[
    CardStrategy {
        name: "cards",
        extract: from_cards,
    },
    CardStrategy {
        name: "slots",
        extract: from_slots,
    },
];

fn from_cards(payload: &Value) -> Option<CardCounts> {
    ENTRY.collect(entries_of(payload.get("cards")))
}

fn from_slots(payload: &Value) -> Option<CardCounts> {
    ENTRY.collect(entries_of(payload.get("slots")))
}

/// Commander names listed under `metadata.commanderCards`.
#[must_use]
pub fn commanders(payload: &Value) -> Vec<String> {
    COMMANDER.names(entries_of(payload.pointer("/metadata/commanderCards")))
}

/// Builds a deck from an Archidekt deck response.
#[must_use]
pub fn extract(payload: &Value, deck_id: &str) -> Option<Deck> {
    let (_, cards) = first_match(STRATEGIES, payload)?;
    let name = first_string(payload, &["name"])
        .map_or_else(|| format!("Archidekt_{deck_id}"), str::to_string);
    Some(build_deck(name, commanders(payload), cards))
}
