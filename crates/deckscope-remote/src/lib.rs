//! # Deckscope Remote
//!
//! The part of Deckscope that talks to the network: a throttled, retrying
//! JSON fetcher, a persistent card cache, the cache-first card data source,
//! and the deck resolver with its Moxfield and Archidekt adapters.
//!
//! Nothing here returns an error for a failed lookup. Failures travel
//! in-band as error-marked JSON or [`deckscope_core::CardRecord`]s so an
//! analysis always completes.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use deckscope_core::EventSink;
//! use deckscope_remote::{CardCache, CardSource, Endpoints, FetcherConfig, RateLimitedFetcher};
//!
//! # async fn run() -> deckscope_remote::Result<()> {
//! let fetcher = Arc::new(RateLimitedFetcher::new(FetcherConfig::default())?);
//! let cache = Arc::new(CardCache::load("cards.json"));
//! let source = CardSource::new(fetcher, cache, Endpoints::default());
//!
//! let card = source.fetch_card("Sol Ring", &EventSink::noop()).await;
//! println!("{:?}", card.type_line);
//! # Ok(())
//! # }
//! ```
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod providers;
pub mod resolver;
pub mod source;

pub use cache::CardCache;
pub use config::{Endpoints, FetcherConfig};
pub use error::{RemoteError, Result};
pub use fetcher::{JsonFetch, RateLimitedFetcher, is_error_payload};
pub use providers::Provider;
pub use resolver::DeckResolver;
pub use source::CardSource;
