//! # Deckscope
//!
//! Commander deck labeler. Takes a hosted-deck URL (Moxfield, Archidekt) or
//! a pasted decklist, looks every card up, labels it by function
//! (`ManaRock`, `Tutor`, `BoardWipe`, ...) and profiles the deck as a whole.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use deckscope::{
//!     AnalysisEvent, Analyzer, CardCache, Endpoints, FetcherConfig, LabelEngine,
//!     RateLimitedFetcher,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = Analyzer::new(
//!     Arc::new(RateLimitedFetcher::new(FetcherConfig::default())?),
//!     Arc::new(CardCache::load("cards.json")),
//!     Endpoints::default(),
//!     LabelEngine::with_defaults()?,
//! )?;
//!
//! let mut events = Arc::new(analyzer).spawn("1 Sol Ring\n1 Command Tower".to_string());
//! while let Some(event) = events.recv().await {
//!     if let AnalysisEvent::Finished(report) = event {
//!         println!("{}", report.matchup.rationale);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
pub mod analyzer;

pub use analyzer::Analyzer;

pub use deckscope_core::{
    AggregateReport, AnalysisEvent, AnalysisReport, ArchetypeCategory, CardDetails, CardRecord,
    CardReport, Deck, DeckscopeError, DerivedProfile, EventSink, Label, LabelConfig, LabelEngine,
    LabelSet, MatchupProfile, MetaArchetype, aggregate, derive, matchup, parse_plain_deck,
    sanitize_file_stem,
};
pub use deckscope_remote::{
    CardCache, CardSource, DeckResolver, Endpoints, FetcherConfig, JsonFetch, RateLimitedFetcher,
    RemoteError,
};
