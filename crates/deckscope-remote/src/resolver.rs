use std::sync::Arc;

use deckscope_core::{Deck, EventSink, PlainDeckParser};
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use crate::config::Endpoints;
use crate::error::Result;
use crate::fetcher::{JsonFetch, is_error_payload};
use crate::providers::Provider;

/// Turns pasted text into a [`Deck`].
///
/// Hosted-deck URLs are tried first, provider by provider; anything else,
/// or a hosted deck that cannot be fetched, is parsed as a freeform list.
#[derive(Debug)]
pub struct DeckResolver<F> {
    fetcher: Arc<F>,
    endpoints: Endpoints,
    parser: PlainDeckParser,
    re_url: Regex,
}

impl<F: JsonFetch> DeckResolver<F> {
    pub fn new(fetcher: Arc<F>, endpoints: Endpoints) -> Result<Self> {
        Ok(Self {
            fetcher,
            endpoints,
            parser: PlainDeckParser::new()?,
            re_url: Regex::new(r"https?://\S+")?,
        })
    }

    /// Finds the deck URL for `provider` in `text`.
    ///
    /// Prefers a full `http(s)://` URL; otherwise takes the first
    /// whitespace-separated token carrying the provider's deck marker.
    #[must_use]
    pub fn find_deck_url<'a>(&self, text: &'a str, provider: Provider) -> Option<&'a str> {
        let marker = provider.url_marker();
        self.re_url
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|url| url.contains(marker))
            .or_else(|| text.split_whitespace().find(|token| token.contains(marker)))
    }

    /// Resolves `text` to a deck. Never fails: the freeform parser is the
    /// last resort.
    pub async fn resolve(&self, text: &str, sink: &EventSink) -> Deck {
        let text = text.trim();

        for provider in Provider::PRIORITY {
            let Some(url) = self.find_deck_url(text, provider) else {
                continue;
            };
            let Some(deck_id) = deck_id(url) else {
                debug!(url, "deck URL without identifier");
                continue;
            };
            if let Some(deck) = self.fetch_hosted(provider, &deck_id, sink).await {
                info!(%provider, deck_id = %deck_id, cards = deck.cards.len(), "hosted deck resolved");
                return deck;
            }
            info!(%provider, deck_id = %deck_id, "hosted deck unavailable, trying next source");
        }

        self.parser.parse(text)
    }

    async fn fetch_hosted(&self, provider: Provider, deck_id: &str, sink: &EventSink) -> Option<Deck> {
        for candidate in provider.candidates(&self.endpoints, deck_id) {
            sink.log(format!("Trying {provider} endpoint: {candidate}"));
            let payload = self.fetcher.get_json(&candidate, sink).await;
            if is_error_payload(&payload) {
                debug!(url = %candidate, "endpoint returned an error");
                continue;
            }
            match provider.extract(&payload, deck_id) {
                Some(deck) => return Some(deck),
                None => debug!(url = %candidate, "endpoint returned no cards"),
            }
        }
        None
    }
}

/// Deck identifier of a deck URL: the path segment after `decks`, else
/// the last non-empty segment.
#[must_use]
pub fn deck_id(url: &str) -> Option<String> {
    let segments: Vec<String> = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .map(|segments| segments.map(str::to_string).collect())
            .unwrap_or_default(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .split('/')
            .map(str::to_string)
            .collect(),
    };
    let segments: Vec<String> = segments.into_iter().filter(|s| !s.is_empty()).collect();

    match segments.iter().position(|s| s == "decks") {
        Some(i) => segments.get(i + 1).cloned(),
        None => segments.last().cloned(),
    }
}
