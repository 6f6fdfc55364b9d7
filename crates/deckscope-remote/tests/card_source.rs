use std::sync::Arc;
use std::time::Duration;

use deckscope_core::EventSink;
use deckscope_remote::{CardCache, CardSource, Endpoints, FetcherConfig, RateLimitedFetcher};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(server: &MockServer, cache: CardCache) -> CardSource<RateLimitedFetcher> {
    let config = FetcherConfig::default()
        .with_min_interval(Duration::ZERO)
        .with_backoff(Duration::from_millis(10), Duration::ZERO)
        .with_max_retries(2);
    CardSource::new(
        Arc::new(RateLimitedFetcher::new(config).unwrap()),
        Arc::new(cache),
        Endpoints::all_at(&server.uri()),
    )
}

fn sol_ring() -> serde_json::Value {
    json!({
        "object": "card",
        "name": "Sol Ring",
        "type_line": "Artifact",
        "oracle_text": "{T}: Add {C}{C}.",
        "cmc": 1.0,
        "produced_mana": ["C"],
        "legalities": {"commander": "legal", "vintage": "restricted"},
        "image_uris": {"small": "s.jpg", "normal": "n.jpg", "large": "l.jpg"},
        "prices": {"usd": "1.50"},
    })
}

#[tokio::test]
async fn second_lookup_hits_the_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .and(query_param("exact", "Sol Ring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol_ring()))
        .expect(1)
        .mount(&server)
        .await;

    let source = source(&server, CardCache::in_memory());
    let sink = EventSink::noop();

    let first = source.fetch_card("Sol Ring", &sink).await;
    let second = source.fetch_card("  sol ring ", &sink).await;

    assert_eq!(first, second);
    assert_eq!(first.type_line.as_deref(), Some("Artifact"));
    assert_eq!(first.image_url(), Some("n.jpg"));
    assert!(first.is_commander_legal());
}

#[tokio::test]
async fn failed_lookups_are_cached_too() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .and(query_param("exact", "Not A Card"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "code": "not_found",
            "status": 404,
            "details": "No cards found matching \u{201c}Not A Card\u{201d}",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = source(&server, CardCache::in_memory());
    let sink = EventSink::noop();

    let record = source.fetch_card("Not A Card", &sink).await;
    assert!(record.is_error());
    assert!(record.error_details().unwrap().starts_with("No cards found"));

    let again = source.fetch_card("Not A Card", &sink).await;
    assert!(again.is_error());
    assert_eq!(source.cache().error_count(), 1);
}

#[tokio::test]
async fn purged_errors_are_fetched_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol_ring()))
        .expect(1)
        .mount(&server)
        .await;

    let source = source(&server, CardCache::in_memory());
    let sink = EventSink::noop();

    let record = source.fetch_card("Sol Ring", &sink).await;
    assert_eq!(record.error.as_deref(), Some("request_failed"));

    assert_eq!(source.cache().purge_errors().unwrap(), 1);
    let record = source.fetch_card("Sol Ring", &sink).await;
    assert!(!record.is_error());
}

#[tokio::test]
async fn records_survive_a_restart() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol_ring()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("scryfall_cache.json");

    let first_run = source(&server, CardCache::load(&cache_path));
    first_run.fetch_card("Sol Ring", &EventSink::noop()).await;

    let second_run = source(&server, CardCache::load(&cache_path));
    let record = second_run.fetch_card("Sol Ring", &EventSink::noop()).await;
    assert_eq!(record.name.as_deref(), Some("Sol Ring"));
}
