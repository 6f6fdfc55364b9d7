use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::error::{DeckscopeError, Result};
use crate::labels::config::LabelConfig;
use crate::types::{CardRecord, LabelSet};

/// Confidence of a curated-list membership label.
pub const CONFIDENCE_CURATED: f32 = 0.95;
pub const CONFIDENCE_LEGENDARY: f32 = 0.9;
pub const CONFIDENCE_MANA_SOURCE: f32 = 0.88;
pub const CONFIDENCE_LAND: f32 = 0.85;
pub const CONFIDENCE_CREATURE: f32 = 0.85;
pub const CONFIDENCE_COMMANDER_LEGAL: f32 = 0.8;
pub const CONFIDENCE_KEYWORD: f32 = 0.8;
pub const CONFIDENCE_PRODUCES_MANA: f32 = 0.8;
pub const CONFIDENCE_CMC: f32 = 0.7;
pub const CONFIDENCE_ARTIFACT: f32 = 0.7;
/// Confidence of a label produced by an oracle-text rule.
pub const CONFIDENCE_RULE: f32 = 0.6;

struct CuratedList {
    name: String,
    /// Lower-cased card names.
    members: HashSet<String>,
}

struct CompiledRule {
    name: String,
    positive: Vec<Regex>,
    negative: Vec<Regex>,
}

impl CompiledRule {
    /// A rule fires when any alternative matches and no veto matches.
    fn fires(&self, oracle: &str) -> bool {
        self.positive.iter().any(|re| re.is_match(oracle))
            && !self.negative.iter().any(|re| re.is_match(oracle))
    }
}

/// Turns card attributes and oracle text into weighted, evidenced labels.
///
/// Evaluation runs in tiers: curated lists, type-line structure, keywords,
/// mana production, then oracle-text rules. Within a card, each label keeps
/// the highest confidence any tier assigned it.
pub struct LabelEngine {
    curated: Vec<CuratedList>,
    rules: Vec<CompiledRule>,
}

impl LabelEngine {
    /// Compiles the curated lists and rule patterns of `config`.
    ///
    /// # Errors
    ///
    /// Returns `DeckscopeError::InvalidRule` naming the first rule whose
    /// positive or negative pattern fails to compile.
    pub fn new(config: &LabelConfig) -> Result<Self> {
        let curated = config
            .curated_lists
            .iter()
            .map(|(name, cards)| CuratedList {
                name: name.clone(),
                members: cards.iter().map(|c| c.trim().to_lowercase()).collect(),
            })
            .collect();

        let mut rules = Vec::with_capacity(config.regex_rules.len());
        for (name, patterns) in &config.regex_rules {
            let negative = config
                .regex_negative
                .get(name)
                .map(|p| compile_all(name, p))
                .transpose()?
                .unwrap_or_default();
            rules.push(CompiledRule {
                name: name.clone(),
                positive: compile_all(name, patterns)?,
                negative,
            });
        }

        Ok(Self { curated, rules })
    }

    /// Engine over the built-in [`LabelConfig`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(&LabelConfig::default())
    }

    /// Number of compiled oracle-text rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Labels one card.
    ///
    /// `name` is the deck's spelling of the card and drives curated-list
    /// matching, so error-marked records still pick up curated labels.
    #[must_use]
    pub fn label_card(&self, record: &CardRecord, name: &str) -> LabelSet {
        let mut labels = LabelSet::new();

        let lowered = name.trim().to_lowercase();
        for list in &self.curated {
            if list.members.contains(&lowered) {
                labels.add(&list.name, CONFIDENCE_CURATED, format!("curated:{}", list.name));
            }
        }

        let type_line = record.type_line_lower();
        let is_creature = type_line.contains("creature");
        let is_artifact = type_line.contains("artifact");

        if type_line.contains("land") && !is_creature {
            labels.add("IsLand", CONFIDENCE_LAND, "type_line:land");
        }
        if is_creature {
            labels.add("IsCreature", CONFIDENCE_CREATURE, "type_line:creature");
        }
        if type_line.contains("legendary") {
            labels.add("IsLegendary", CONFIDENCE_LEGENDARY, "type_line:legendary");
        }
        if record.is_commander_legal() {
            labels.add("CommanderLegal", CONFIDENCE_COMMANDER_LEGAL, "legalities:commander");
        }
        if let Some(cmc) = record.cmc.filter(|c| c.is_finite()) {
            labels.add(format!("CMC:{}", cmc.trunc() as i64), CONFIDENCE_CMC, "cmc");
        }

        for keyword in &record.keywords {
            labels.add(
                format!("HasKeyword:{}", keyword.to_lowercase()),
                CONFIDENCE_KEYWORD,
                "keywords",
            );
        }

        let oracle = record.normalized_oracle_text();
        let produces_mana =
            !record.produced_mana.is_empty() || (oracle.contains("add") && oracle.contains("mana"));
        if produces_mana {
            labels.add("ProducesMana", CONFIDENCE_PRODUCES_MANA, "produced_mana/oracle");
        }
        if is_artifact {
            if produces_mana {
                labels.add("ManaRock", CONFIDENCE_MANA_SOURCE, "artifact+produces_mana");
            } else {
                labels.add("Artifact", CONFIDENCE_ARTIFACT, "type_line:artifact");
            }
        }
        if is_creature && produces_mana {
            labels.add("ManaDork", CONFIDENCE_MANA_SOURCE, "creature+produces_mana");
        }

        for rule in &self.rules {
            if rule.fires(&oracle) {
                labels.add(&rule.name, CONFIDENCE_RULE, format!("regex:{}", rule.name));
            }
        }

        labels
    }
}

fn compile_all(rule: &str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|source| DeckscopeError::InvalidRule {
                    rule: rule.to_string(),
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::types::Legality;

    fn engine() -> LabelEngine {
        LabelEngine::with_defaults().unwrap()
    }

    fn card(type_line: &str, oracle: &str) -> CardRecord {
        CardRecord {
            object: Some("card".into()),
            type_line: Some(type_line.into()),
            oracle_text: Some(oracle.into()),
            ..CardRecord::default()
        }
    }

    #[test]
    fn sol_ring_is_fast_mana_rock() {
        let mut record = card("Artifact", "{T}: Add {C}{C}.");
        record.cmc = Some(1.0);
        record.produced_mana = vec!["C".into()];
        record.legalities = BTreeMap::from([("commander".to_string(), Legality::Legal)]);

        let labels = engine().label_card(&record, "Sol Ring");

        let fast = labels.get("fast_mana").unwrap();
        assert_eq!(fast.confidence, CONFIDENCE_CURATED);
        assert_eq!(fast.evidence, "curated:fast_mana");
        assert_eq!(labels.get("ManaRock").unwrap().confidence, 0.88);
        assert!(labels.contains("ProducesMana"));
        assert!(labels.contains("CommanderLegal"));
        assert!(labels.contains("CMC:1"));
        assert!(!labels.contains("Artifact"));
        assert!(!labels.contains("IsCreature"));
    }

    #[test]
    fn curated_match_is_case_insensitive() {
        let labels = engine().label_card(&CardRecord::error("request_failed"), "  sol RING ");
        assert!(labels.contains("fast_mana"));
        // Error records carry no attributes to label.
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn mana_dork_from_oracle_text() {
        let record = card("Creature — Bird", "Flying\n{T}: Add one mana of any color.");
        let labels = engine().label_card(&record, "Birds of Paradise");

        assert!(labels.contains("IsCreature"));
        assert!(labels.contains("ProducesMana"));
        assert!(labels.contains("ManaDork"));
        assert!(!labels.contains("ManaRock"));
        assert!(!labels.contains("IsLand"));
    }

    #[test]
    fn plain_artifact_without_mana() {
        let record = card("Artifact", "Creatures you control get +1/+1.");
        let labels = engine().label_card(&record, "Glorious Anthem Rock");
        assert_eq!(labels.get("Artifact").unwrap().confidence, CONFIDENCE_ARTIFACT);
        assert!(!labels.contains("ManaRock"));
    }

    #[test]
    fn land_creature_is_not_land() {
        let record = card("Land Creature — Forest Dryad", "");
        let labels = engine().label_card(&record, "Dryad Arbor");
        assert!(labels.contains("IsCreature"));
        assert!(!labels.contains("IsLand"));

        let record = card("Legendary Land", "");
        let labels = engine().label_card(&record, "Gaea's Cradle");
        assert!(labels.contains("IsLand"));
        assert!(labels.contains("IsLegendary"));
    }

    #[test]
    fn keywords_are_lowercased() {
        let mut record = card("Creature — Angel", "Flying, vigilance");
        record.keywords = vec!["Flying".into(), "Vigilance".into()];
        let labels = engine().label_card(&record, "Serra Angel");
        assert_eq!(labels.get("HasKeyword:flying").unwrap().evidence, "keywords");
        assert!(labels.contains("HasKeyword:vigilance"));
    }

    #[test]
    fn tutor_rules_fire() {
        let record = card(
            "Sorcery",
            "Search your library for a card, put that card into your hand, then shuffle.",
        );
        let labels = engine().label_card(&record, "Demonic Tutor");
        assert!(labels.contains("unconditional_tutors"));
        assert!(labels.contains("TutorAny"));
        assert_eq!(labels.get("Tutor").unwrap().evidence, "regex:Tutor");
        assert!(!labels.contains("TutorCreature"));
    }

    #[test]
    fn negation_vetoes_rule_entirely() {
        // Matches both "draw a card" and the "you may draw" veto.
        let record = card("Enchantment", "Whenever an opponent casts a spell, you may draw a card.");
        let labels = engine().label_card(&record, "Rhystic-ish");
        assert!(!labels.contains("Draw"));

        let record = card("Instant", "Draw a card.");
        let labels = engine().label_card(&record, "Opt-ish");
        assert!(labels.contains("Draw"));
    }

    #[test]
    fn custom_rule_with_veto() {
        let mut config = LabelConfig::default();
        config.regex_rules.clear();
        config
            .regex_rules
            .insert("Removal".into(), vec!["destroy target".into(), "exile target".into()]);
        config
            .regex_negative
            .insert("Removal".into(), vec!["exile target card from a graveyard".into()]);
        let engine = LabelEngine::new(&config).unwrap();

        let hit = card("Instant", "Exile target creature.");
        assert!(engine.label_card(&hit, "Path").contains("Removal"));

        // Veto wins even though a positive alternative also matches.
        let vetoed = card("Instant", "Destroy target artifact. Exile target card from a graveyard.");
        assert!(!engine.label_card(&vetoed, "Nope").contains("Removal"));
    }

    #[test]
    fn reminder_text_does_not_trigger_rules() {
        let record = card("Creature — Human", "Ward {2} (Whenever this becomes the target of a spell, counter target spell unless its controller pays {2}.)");
        let labels = engine().label_card(&record, "Warded");
        assert!(!labels.contains("Counterspell"));
    }

    #[test]
    fn confidence_is_max_over_tiers() {
        let mut config = LabelConfig::default();
        config
            .curated_lists
            .insert("Draw".into(), vec!["Brainstorm".into()]);
        let engine = LabelEngine::new(&config).unwrap();

        let record = card("Instant", "Draw three cards, then put two cards from your hand on top of your library in any order.");
        let labels = engine.label_card(&record, "Brainstorm");
        let draw = labels.get("Draw").unwrap();
        assert_eq!(draw.confidence, CONFIDENCE_CURATED);
        assert_eq!(draw.evidence, "curated:Draw");
    }

    #[test]
    fn labels_follow_config_order() {
        let mut config = LabelConfig::default();
        config.curated_lists.clear();
        config.curated_lists.insert("zeta".into(), vec!["Sol Ring".into()]);
        config.curated_lists.insert("alpha".into(), vec!["Sol Ring".into()]);
        config.regex_rules.clear();
        config.regex_rules.insert("Zap".into(), vec!["damage".into()]);
        config.regex_rules.insert("Aim".into(), vec!["target".into()]);
        let engine = LabelEngine::new(&config).unwrap();

        let record = card("Instant", "Deal 3 damage to any target.");
        let labels = engine.label_card(&record, "Sol Ring");
        let order: Vec<&str> = labels
            .iter()
            .map(|l| l.label.as_str())
            .filter(|l| ["zeta", "alpha", "Zap", "Aim"].contains(l))
            .collect();
        assert_eq!(order, vec!["zeta", "alpha", "Zap", "Aim"]);
    }

    #[test]
    fn labeling_is_deterministic() {
        let engine = engine();
        let mut record = card("Legendary Creature — Elf Druid", "{T}: Add {G}. Whenever you cast a creature spell, draw a card.");
        record.cmc = Some(2.0);
        record.keywords = vec!["Landfall".into()];

        let first = engine.label_card(&record, "Some Elf");
        let second = engine.label_card(&record, "Some Elf");
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_pattern_names_rule() {
        let mut config = LabelConfig::default();
        config.regex_rules.insert("Broken".into(), vec!["(unclosed".into()]);
        match LabelEngine::new(&config) {
            Err(DeckscopeError::InvalidRule { rule, .. }) => assert_eq!(rule, "Broken"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected invalid rule error"),
        }
    }
}
