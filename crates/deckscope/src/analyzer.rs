//! The analysis pipeline: resolve, fetch, label, aggregate, score.

use std::collections::BTreeMap;
use std::sync::Arc;

use deckscope_core::{
    AnalysisEvent, AnalysisReport, CardDetails, CardReport, Deck, DeckscopeError, EventSink,
    LabelEngine, LabelSet, aggregate, derive, matchup,
};
use deckscope_remote::{CardCache, CardSource, DeckResolver, Endpoints, JsonFetch};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

/// Runs whole-deck analyses over shared fetcher and cache instances.
///
/// One `Analyzer` can serve any number of concurrent runs; they share the
/// fetcher's rate limit and the card cache.
pub struct Analyzer<F> {
    resolver: DeckResolver<F>,
    source: CardSource<F>,
    engine: LabelEngine,
}

impl<F: JsonFetch + 'static> Analyzer<F> {
    pub fn new(
        fetcher: Arc<F>,
        cache: Arc<CardCache>,
        endpoints: Endpoints,
        engine: LabelEngine,
    ) -> deckscope_remote::Result<Self> {
        Ok(Self {
            resolver: DeckResolver::new(Arc::clone(&fetcher), endpoints.clone())?,
            source: CardSource::new(fetcher, cache, endpoints),
            engine,
        })
    }

    #[must_use]
    pub fn source(&self) -> &CardSource<F> {
        &self.source
    }

    #[must_use]
    pub fn engine(&self) -> &LabelEngine {
        &self.engine
    }

    /// Fetches and labels a single card.
    pub async fn inspect_card(&self, name: &str, quantity: u32, sink: &EventSink) -> CardReport {
        let record = self.source.fetch_card(name, sink).await;
        if let Some(details) = record.error_details() {
            sink.log(format!("Scryfall error for {name}: {details}"));
        }
        CardReport {
            name: name.to_string(),
            quantity,
            card: CardDetails::from(&record),
            error: record.error_details().map(str::to_string),
            labels: self.engine.label_card(&record, name),
        }
    }

    /// Analyzes one deck, reporting progress on `sink`.
    ///
    /// Card lookups that fail still yield a card report; the only error is
    /// blank input.
    pub async fn analyze(
        &self,
        text: &str,
        sink: &EventSink,
    ) -> deckscope_core::Result<AnalysisReport> {
        if text.trim().is_empty() {
            return Err(DeckscopeError::EmptyInput);
        }

        sink.status("Resolving deck");
        let deck = self.resolver.resolve(text, sink).await;
        sink.log(format!("Deck resolved: {}", deck.name));
        info!(
            deck = %deck.name,
            unique = deck.cards.len(),
            total = deck.total_cards(),
            "deck resolved"
        );

        let total = deck.cards.len();
        sink.emit(AnalysisEvent::ProgressInit(total));

        let mut cards = Vec::with_capacity(total);
        let mut labels_by_card: BTreeMap<String, LabelSet> = BTreeMap::new();
        for (index, (name, &quantity)) in deck.cards.iter().enumerate() {
            let position = index + 1;
            sink.status(format!("Fetching card {position}/{total}: {name}"));
            let report = self.inspect_card(name, quantity, sink).await;
            labels_by_card.insert(name.clone(), report.labels.clone());
            cards.push(report);
            sink.emit(AnalysisEvent::Progress(position));
        }

        let aggregate = aggregate(&labels_by_card, &deck.cards);
        let derived = derive(&aggregate);
        let matchup = matchup(&aggregate);
        let commander_image = self.commander_image(&deck, sink).await;

        info!(
            deck = %deck.name,
            strongest = %matchup.strongest,
            weakest = %matchup.weakest,
            "analysis complete"
        );

        Ok(AnalysisReport {
            deck_name: deck.name,
            commanders: deck.commanders,
            commander_image,
            cards,
            aggregate,
            derived,
            matchup,
        })
    }

    async fn commander_image(&self, deck: &Deck, sink: &EventSink) -> Option<String> {
        let commander = deck.commanders.first()?;
        let record = self.source.fetch_card(commander, sink).await;
        record.image_url().map(str::to_string)
    }

    /// Runs [`analyze`](Self::analyze) on its own task.
    ///
    /// The returned stream ends with exactly one terminal event: `Finished`
    /// with the report, or `Failed` when the run errored or panicked.
    pub fn spawn(self: Arc<Self>, text: String) -> UnboundedReceiver<AnalysisEvent> {
        let (sink, rx) = EventSink::channel();
        let run_sink = sink.clone();
        let run = tokio::spawn(async move { self.analyze(&text, &run_sink).await });

        tokio::spawn(async move {
            let event = match run.await {
                Ok(Ok(report)) => AnalysisEvent::Finished(Box::new(report)),
                Ok(Err(err)) => AnalysisEvent::Failed(err.to_string()),
                Err(join_error) => {
                    error!(%join_error, "analysis task aborted");
                    AnalysisEvent::Failed(format!("analysis aborted: {join_error}"))
                }
            };
            sink.emit(event);
        });

        rx
    }
}
