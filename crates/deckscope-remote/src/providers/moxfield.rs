use serde_json::Value;

use super::{CardCounts, CardStrategy, EntryShape, build_deck, entries_of, first_match, first_string};
use deckscope_core::Deck;

const ENTRY: EntryShape = EntryShape {
    names: &["/card/name", "/name"],
    quantities: &["count", "quantity"],
};

/// Response layouts in the order they are probed.
pub const STRATEGIES: &[CardStrategy] = &[
    CardStrategy {
        name: "boards.mainboard",
        extract: from_boards,
    },
    CardStrategy {
        name: "sections",
        extract: from_sections,
    },
    CardStrategy {
        name: "cards",
        extract: from_flat_list,
    },
];

fn from_boards(payload: &Value) -> Option<CardCounts> {
    let boards = payload.get("boards")?;
    let main = boards
        .get("mainboard")
        .filter(|b| is_present(b))
        .or_else(|| boards.get("main").filter(|b| is_present(b)))?;
    ENTRY.collect(entries_of(main.get("cards")))
}

/// False for null, false, and empty objects, arrays or strings.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

fn from_sections(payload: &Value) -> Option<CardCounts> {
    let sections = payload.get("sections")?.as_array()?;
    ENTRY.collect(
        sections
            .iter()
            .flat_map(|section| entries_of(section.get("cards"))),
    )
}

fn from_flat_list(payload: &Value) -> Option<CardCounts> {
    ENTRY.collect(entries_of(payload.get("cards")))
}

/// Commander names; the list may be an array or a map of entries.
#[must_use]
pub fn commanders(payload: &Value) -> Vec<String> {
    ENTRY.names(entries_of(payload.get("commanders")))
}

/// Builds a deck from a Moxfield deck response.
#[must_use]
pub fn extract(payload: &Value, deck_id: &str) -> Option<Deck> {
    let (_, cards) = first_match(STRATEGIES, payload)?;
    let name = first_string(payload, &["name", "deckName"])
        .map_or_else(|| format!("Moxfield_{deck_id}"), str::to_string);
    Some(build_deck(name, commanders(payload), cards))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn boards_layout_with_map_of_cards() {
        let payload = json!({
            "name": "Atraxa Superfriends",
            "commanders": [{"name": "Atraxa, Praetors' Voice"}],
            "boards": {
                "mainboard": {
                    "cards": {
                        "x1": {"count": 1, "card": {"name": "Sol Ring"}},
                        "x2": {"count": 3, "card": {"name": "Forest"}},
                    }
                }
            }
        });
        let deck = extract(&payload, "abc").unwrap();
        assert_eq!(deck.name, "Atraxa Superfriends");
        assert_eq!(deck.commanders, vec!["Atraxa, Praetors' Voice"]);
        assert_eq!(deck.quantity("Forest"), 3);
        assert_eq!(deck.total_cards(), 4);
    }

    #[test]
    fn main_board_alias_and_list() {
        let payload = json!({
            "deckName": "Alias",
            "boards": {"main": {"cards": [{"name": "Island"}]}}
        });
        let deck = extract(&payload, "abc").unwrap();
        assert_eq!(deck.name, "Alias");
        assert_eq!(deck.quantity("Island"), 1);
    }

    #[test]
    fn empty_mainboard_falls_back_to_main() {
        for mainboard in [json!({}), json!([]), json!(null), json!(false)] {
            let payload = json!({
                "boards": {
                    "mainboard": mainboard,
                    "main": {"cards": {"a": {"count": 2, "card": {"name": "Swamp"}}}},
                }
            });
            assert_eq!(first_match(STRATEGIES, &payload).unwrap().0, "boards.mainboard");
            assert_eq!(extract(&payload, "abc").unwrap().quantity("Swamp"), 2);
        }
    }

    #[test]
    fn falls_through_to_sections_then_flat_cards() {
        let sections = json!({
            "boards": {"mainboard": {"cards": {}}},
            "sections": [
                {"cards": [{"name": "Brainstorm", "count": 1}]},
                {"cards": [{"card": {"name": "Brainstorm"}, "count": 1}]},
            ]
        });
        assert_eq!(first_match(STRATEGIES, &sections).unwrap().0, "sections");
        assert_eq!(extract(&sections, "id").unwrap().quantity("Brainstorm"), 2);

        let flat = json!({"cards": [{"name": "Mountain", "count": 7}]});
        assert_eq!(first_match(STRATEGIES, &flat).unwrap().0, "cards");
        let deck = extract(&flat, "zz9").unwrap();
        assert_eq!(deck.name, "Moxfield_zz9");
        assert_eq!(deck.quantity("Mountain"), 7);
    }

    #[test]
    fn commanders_from_map() {
        let payload = json!({
            "commanders": {"k": {"quantity": 1, "card": {"name": "Kenrith, the Returned King"}}}
        });
        assert_eq!(commanders(&payload), vec!["Kenrith, the Returned King"]);
    }

    #[test]
    fn no_cards_is_no_deck() {
        assert!(extract(&json!({"name": "Empty", "boards": {}}), "id").is_none());
        assert!(extract(&json!({"error": "not found"}), "id").is_none());
    }
}
