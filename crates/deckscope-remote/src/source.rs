use std::sync::Arc;

use deckscope_core::{CardRecord, EventSink};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::CardCache;
use crate::config::Endpoints;
use crate::fetcher::JsonFetch;

/// Resolves card names to records, cache first.
///
/// Failed lookups are cached like any other record and are not retried
/// until the cache entry is purged.
#[derive(Debug)]
pub struct CardSource<F> {
    fetcher: Arc<F>,
    cache: Arc<CardCache>,
    endpoints: Endpoints,
}

impl<F> Clone for CardSource<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            cache: Arc::clone(&self.cache),
            endpoints: self.endpoints.clone(),
        }
    }
}

impl<F: JsonFetch> CardSource<F> {
    #[must_use]
    pub fn new(fetcher: Arc<F>, cache: Arc<CardCache>, endpoints: Endpoints) -> Self {
        Self {
            fetcher,
            cache,
            endpoints,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &CardCache {
        &self.cache
    }

    #[must_use]
    pub fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns the record for `name`, fetching and caching it on a miss.
    pub async fn fetch_card(&self, name: &str, sink: &EventSink) -> CardRecord {
        if let Some(cached) = self.cache.get(name) {
            debug!(card = name, "card cache hit");
            return cached;
        }

        let url = self.endpoints.card_named(name);
        let payload = self.fetcher.get_json(&url, sink).await;
        let record = into_record(payload);
        self.cache.set(name, record.clone());
        record
    }
}

/// Decodes a card payload; anything that is not a card object becomes an
/// error record.
fn into_record(payload: Value) -> CardRecord {
    if !payload.is_object() {
        return CardRecord::error("malformed_response");
    }
    match serde_json::from_value(payload) {
        Ok(record) => record,
        Err(error) => {
            warn!(%error, "card payload does not match the expected shape");
            CardRecord::error("malformed_response")
        }
    }
}
