use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Current label config schema version.
pub const CONFIG_VERSION: u32 = 1;

/// Curated lists and pattern rules driving the label engine.
///
/// Label identifiers are open strings: every curated list name and every
/// rule name becomes a label. Tables keep their file order, which is the
/// order the engine evaluates them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// List name to exact card names.
    #[serde(default)]
    pub curated_lists: IndexMap<String, Vec<String>>,
    /// Rule name to case-insensitive pattern alternatives.
    #[serde(default)]
    pub regex_rules: IndexMap<String, Vec<String>>,
    /// Rule name to veto patterns; any match suppresses the rule.
    #[serde(default)]
    pub regex_negative: IndexMap<String, Vec<String>>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl LabelConfig {
    /// Loads the config at `path`, writing the built-in defaults there first
    /// if the file does not exist.
    ///
    /// A leading UTF-8 byte order mark is tolerated. Failure to persist the
    /// defaults is logged and the defaults are returned anyway.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let raw = fs::read_to_string(path)?;
            let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
            let config: Self = serde_json::from_str(raw)?;
            info!(path = %path.display(), rules = config.regex_rules.len(), "loaded label config");
            return Ok(config);
        }

        let config = Self::default();
        if let Err(err) = config.save(path) {
            warn!(path = %path.display(), error = %err, "could not write default label config");
        } else {
            info!(path = %path.display(), "wrote default label config");
        }
        Ok(config)
    }

    /// Writes the config as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn table(entries: Vec<(&str, Vec<String>)>) -> IndexMap<String, Vec<String>> {
    entries
        .into_iter()
        .map(|(name, items)| (name.to_string(), items))
        .collect()
}

impl Default for LabelConfig {
    fn default() -> Self {
        let curated_lists = table(vec![
            ("fast_mana", owned(&["Sol Ring", "Mana Crypt", "Mana Vault", "Grim Monolith"])),
            (
                "unconditional_tutors",
                owned(&["Demonic Tutor", "Vampiric Tutor", "Enlightened Tutor"]),
            ),
            (
                "free_interaction",
                owned(&["Force of Will", "Force of Negation", "Fierce Guardianship", "Swan Song"]),
            ),
            (
                "staple_board_wipes",
                owned(&["Wrath of God", "Supreme Verdict", "Damnation", "Toxic Deluge"]),
            ),
            ("staple_stax", owned(&["Smokestack", "Winter Orb", "Stasis", "Rule of Law"])),
            ("combo_enablers", owned(&["Underworld Breach", "Dockside Extortionist"])),
            (
                "mill_staples",
                owned(&[
                    "Bruvac the Grandiloquent",
                    "Maddening Cacophony",
                    "Mesmeric Orb",
                    "Mindcrank",
                    "Ruin Crab",
                    "Fractured Sanity",
                ]),
            ),
            (
                "wheel_staples",
                owned(&["Wheel of Fortune", "Windfall", "Wheel of Misfortune", "Reforge the Soul"]),
            ),
            (
                "aristocrats_staples",
                owned(&["Blood Artist", "Zulaport Cutthroat", "Cruel Celebrant", "Bastion of Remembrance"]),
            ),
            (
                "tokens_staples",
                owned(&["Doubling Season", "Anointed Procession", "Parallel Lives", "Mondrak, Glory Dominus"]),
            ),
            (
                "lifegain_staples",
                owned(&["Soul Warden", "Soul's Attendant", "Authority of the Consuls", "Ajani's Pridemate"]),
            ),
            (
                "reanimator_staples",
                owned(&["Reanimate", "Animate Dead", "Necromancy", "Dance of the Dead"]),
            ),
        ]);

        let regex_rules = table(vec![
            ("TutorAny", owned(&["search your library for a card"])),
            ("Tutor", owned(&["search your library for", "search .*library for"])),
            ("TutorCreature", owned(&["search your library for a creature card"])),
            (
                "TutorRestricted",
                owned(&["search your library for an? (artifact|enchantment|instant|sorcery|land) card"]),
            ),
            ("Counterspell", owned(&["counter target", "countered"])),
            ("SpotRemoval", owned(&["destroy target", "exile target", r"deals? \d+ damage to target"])),
            ("BoardWipe", owned(&["destroy all", "exile all", "destroy each"])),
            (
                "Recursion",
                owned(&["return target .* from your graveyard", "return .* card from your graveyard"]),
            ),
            (
                "Mill",
                owned(&[
                    "mill",
                    r"put the top .* cards? of .* library into .* graveyard",
                    r"puts? the top .* cards? of .* library into .* graveyard",
                ]),
            ),
            (
                "Discard",
                owned(&[
                    "target player discards",
                    "each opponent discards",
                    "each player discards",
                    "discard a card",
                ]),
            ),
            (
                "Wheel",
                owned(&[
                    "discard .* hand, then draw",
                    "each player discards .* and draws",
                    "then draws? that many cards",
                ]),
            ),
            (
                "Aristocrats",
                owned(&[
                    r"whenever .* dies, .* loses? \d+ life",
                    r"whenever .* dies, you gain \d+ life",
                    "sacrifice a creature:",
                ]),
            ),
            ("Tokens", owned(&["create .* token", "create one or more", "populate"])),
            ("Lifegain", owned(&[r"gain \d+ life", "you gain life", "whenever you gain life"])),
            (
                "Reanimator",
                owned(&[
                    "return target creature card from your graveyard to the battlefield",
                    "return target creature card from a graveyard to the battlefield",
                    "return target creature from your graveyard to the battlefield",
                    "put target creature card from a graveyard onto the battlefield",
                ]),
            ),
            ("Draw", owned(&["draw (?:one|two|three|[0-9]+) card", "draw cards", "draw a card"])),
            ("Loot", owned(&["draw .* then discard", "draw a card, then discard a card"])),
            (
                "RampLand",
                owned(&["search your library for a land card", "put a land card onto the battlefield"]),
            ),
            ("Ritual", owned(&[r"add (?:\w+ )?mana", r"add \w+ to your mana pool"])),
            ("SacOutlet", owned(&["sacrifice .*:"])),
            ("Stax", owned(&["players? can'?t", "skip your untap step", "tax", r"costs? \d+ more"])),
            (
                "Hatebear",
                owned(&["noncreature spells? cost", "activated abilities? of artifacts? can'?t"]),
            ),
            (
                "ComboPiece",
                owned(&["if you control .* then", "if you have .* you win", "infinite"]),
            ),
            (
                "ComboEnabler",
                owned(&["you may cast from your graveyard", "cast cards? from your graveyard"]),
            ),
            ("ProduceMana", owned(&["tap: add", "add .*mana"])),
        ]);

        let regex_negative = table(vec![
            ("Draw", owned(&["you may draw"])),
            ("Tutor", owned(&["may search for a basic land card"])),
            ("ProduceMana", owned(&["add mana equal to"])),
        ]);

        Self {
            version: CONFIG_VERSION,
            curated_lists,
            regex_rules,
            regex_negative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_shape() {
        let config = LabelConfig::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.curated_lists.len(), 12);
        assert_eq!(config.regex_rules.len(), 25);
        assert!(config.regex_negative.contains_key("Draw"));
        assert!(config.curated_lists["fast_mana"].contains(&"Sol Ring".to_string()));
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("labels_config.json");

        let config = LabelConfig::load_or_create(&path).unwrap();
        assert_eq!(config, LabelConfig::default());
        assert!(path.exists());

        let reloaded = LabelConfig::load_or_create(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn existing_file_with_bom_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels_config.json");
        fs::write(
            &path,
            "\u{feff}{\"curated_lists\": {\"pets\": [\"Ornithopter\"]}, \"regex_rules\": {}}",
        )
        .unwrap();

        let config = LabelConfig::load_or_create(&path).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.curated_lists["pets"], vec!["Ornithopter"]);
        assert!(config.regex_rules.is_empty());
        assert!(config.regex_negative.is_empty());
    }

    #[test]
    fn tables_keep_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels_config.json");
        fs::write(
            &path,
            r#"{"curated_lists": {"zeta": ["Sol Ring"], "alpha": ["Sol Ring"]},
                "regex_rules": {"Tutor": ["search your library"], "Draw": ["draw"]}}"#,
        )
        .unwrap();

        let config = LabelConfig::load_or_create(&path).unwrap();
        let lists: Vec<&str> = config.curated_lists.keys().map(String::as_str).collect();
        assert_eq!(lists, vec!["zeta", "alpha"]);
        let rules: Vec<&str> = config.regex_rules.keys().map(String::as_str).collect();
        assert_eq!(rules, vec!["Tutor", "Draw"]);

        config.save(&path).unwrap();
        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.find("\"zeta\"").unwrap() < saved.find("\"alpha\"").unwrap());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels_config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(LabelConfig::load_or_create(&path).is_err());
    }
}
