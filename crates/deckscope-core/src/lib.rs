//! # Deckscope Core
//!
//! The offline half of the Deckscope deck labeler. Parses freeform
//! decklists, attaches heuristic labels to card records, and folds those
//! labels into deck-wide aggregate, archetype and matchup profiles.
//!
//! ## Quick Start
//!
//! ```rust
//! use deckscope_core::{CardRecord, LabelEngine, parse_plain_deck};
//!
//! let deck = parse_plain_deck("Commander: Atraxa, Praetors' Voice\n1 Sol Ring\n").unwrap();
//! assert_eq!(deck.commanders, vec!["Atraxa", "Praetors' Voice"]);
//! assert_eq!(deck.quantity("Sol Ring"), 1);
//!
//! let engine = LabelEngine::with_defaults().unwrap();
//! let labels = engine.label_card(&CardRecord::error("offline"), "Sol Ring");
//! assert!(labels.contains("fast_mana"));
//! ```
pub mod error;
pub mod events;
pub mod labels;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod types;

// Re-export primary API
pub use error::{DeckscopeError, Result};
pub use events::{AnalysisEvent, EventSink};
pub use labels::{LabelConfig, LabelEngine};
pub use parser::{PlainDeckParser, parse_plain_deck};
pub use report::{AnalysisReport, CardDetails, CardReport, sanitize_file_stem};
pub use scoring::{
    AggregateReport, ArchetypeCategory, DerivedProfile, MatchupProfile, MetaArchetype, aggregate,
    derive, matchup,
};
pub use types::{CardRecord, Deck, Label, LabelSet, Legality};
