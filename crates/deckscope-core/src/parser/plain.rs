use regex::Regex;

use crate::error::Result;
use crate::types::Deck;

/// Section of a freeform decklist the parser is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Cards counted into the deck.
    Main,
    /// Cards counted into the deck and listed as commanders.
    Commander,
    /// Sideboard / maybeboard cards, dropped.
    Ignore,
}

impl Section {
    /// Maps a header line (already lower-cased) to the section it opens.
    ///
    /// Only bare words are headers; `Commander:` and `Deck:` are metadata.
    fn from_header(low: &str) -> Option<Self> {
        match low {
            "commander" | "commanders" => Some(Self::Commander),
            "mainboard" | "main deck" | "maindeck" | "main" => Some(Self::Main),
            "sideboard" | "maybeboard" | "maybe board" | "may be board" => Some(Self::Ignore),
            _ => None,
        }
    }
}

/// Line-oriented parser for pasted decklists.
///
/// Understands the usual export shapes (`1 Sol Ring`, `1x Sol Ring`,
/// `Sol Ring x1`, `1 Island (M21) 123 *F*`), section headers
/// (`Commander`, `Mainboard`, `Sideboard`, ...), and metadata lines
/// (`Name: ...`, `Commander: A, B`).
#[derive(Debug)]
pub struct PlainDeckParser {
    re_annotation: Regex,
    re_qty_prefix: Regex,
    re_qty_suffix: Regex,
    re_set_code: Regex,
    re_foil: Regex,
}

impl PlainDeckParser {
    /// Constructs a new `PlainDeckParser` with pre-compiled regex patterns.
    ///
    /// # Errors
    ///
    /// Returns `DeckscopeError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_annotation: Regex::new(r"^[a-z ].*\(\d+\)$")?,
            re_qty_prefix: Regex::new(r"(?i)^(\d+)x?\s+(.+)$")?,
            re_qty_suffix: Regex::new(r"(?i)^(.+?)\s+x(\d+)$")?,
            re_set_code: Regex::new(r"\s+[(\[][^()\[\]]*[)\]](?:\s*[^\s()\[\]]+)?$")?,
            re_foil: Regex::new(r"\s+\*?F\*?$")?,
        })
    }

    /// Parses a freeform decklist into a [`Deck`].
    ///
    /// Never fails: unrecognized lines are treated as single card names.
    pub fn parse(&self, text: &str) -> Deck {
        let mut deck = Deck::default();
        let mut section = Section::Main;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let low = line.to_lowercase();

            if let Some(next) = Section::from_header(&low) {
                section = next;
                continue;
            }
            if let Some(value) = metadata_value(line, &low, &["name:", "deck:"]) {
                deck.name = value.to_string();
                continue;
            }
            if let Some(value) = metadata_value(line, &low, &["commander:", "commanders:"]) {
                deck.set_commanders(value.split(','));
                section = Section::Main;
                continue;
            }
            if low.starts_with("//") || low.starts_with('#') {
                continue;
            }
            if self.re_annotation.is_match(&low) {
                continue;
            }
            if section == Section::Ignore {
                continue;
            }

            let (quantity, name) = self.parse_entry(line);
            if name.is_empty() || quantity == 0 {
                continue;
            }
            if section == Section::Commander {
                deck.add_commander(name.as_str());
            }
            deck.add_card(name, quantity);
        }

        deck
    }

    /// Splits a card line into quantity and cleaned name.
    fn parse_entry(&self, line: &str) -> (u32, String) {
        if let Some(caps) = self.re_qty_prefix.captures(line) {
            if let Ok(quantity) = caps[1].parse() {
                return (quantity, self.clean_name(&caps[2]));
            }
        }
        if let Some(caps) = self.re_qty_suffix.captures(line) {
            if let Ok(quantity) = caps[2].parse() {
                return (quantity, self.clean_name(&caps[1]));
            }
        }
        (1, self.clean_name(line))
    }

    /// Strips trailing set codes, collector numbers, category tags and
    /// foil markers from a card name.
    pub fn clean_name(&self, raw: &str) -> String {
        let mut name = raw.trim().to_string();
        loop {
            let stripped = self.re_foil.replace(&name, "");
            let stripped = self.re_set_code.replace(&stripped, "").trim().to_string();
            if stripped == name {
                return name;
            }
            name = stripped;
        }
    }
}

/// Returns the trimmed value of a `key: value` line when `low` starts with one of `keys`.
fn metadata_value<'a>(line: &'a str, low: &str, keys: &[&str]) -> Option<&'a str> {
    let key = keys.iter().find(|k| low.starts_with(*k))?;
    line.get(key.len()..).map(str::trim)
}
