pub mod plain;

pub use plain::{PlainDeckParser, Section};

use crate::error::Result;
use crate::types::Deck;

/// Convenience function to parse a freeform decklist with a fresh parser.
pub fn parse_plain_deck(text: &str) -> Result<Deck> {
    Ok(PlainDeckParser::new()?.parse(text))
}
