//! Throttled, retrying JSON GET client.

use std::future::Future;
use std::time::Duration;

use deckscope_core::EventSink;
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::FetcherConfig;
use crate::error::Result;

/// Sentinel reason returned once every attempt has failed.
pub const REQUEST_FAILED: &str = "request_failed";

/// Something that turns a URL into a JSON document.
///
/// Implementations never fail: problems are reported in-band as an object
/// carrying an `error` field (see [`is_error_payload`]).
pub trait JsonFetch: Send + Sync {
    fn get_json(&self, url: &str, sink: &EventSink) -> impl Future<Output = Value> + Send;
}

/// Builds the `{"error": reason}` sentinel.
#[must_use]
pub fn error_payload(reason: impl Into<String>) -> Value {
    json!({ "error": reason.into() })
}

/// Returns `true` for sentinels, remote error objects and non-objects.
#[must_use]
pub fn is_error_payload(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return true;
    };
    let has_error = object
        .get("error")
        .is_some_and(|e| !e.is_null() && e != &Value::Bool(false));
    has_error || object.get("object").and_then(Value::as_str) == Some("error")
}

fn is_transient(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// HTTP client enforcing a shared minimum gap between requests.
///
/// Transient statuses (429, 500, 502, 503, 504) and network failures are
/// retried with exponential backoff plus jitter.
#[derive(Debug)]
pub struct RateLimitedFetcher {
    client: Client,
    config: FetcherConfig,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimitedFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            last_request: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Waits until `min_interval` has passed since the previous request.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.config.min_interval {
                tokio::time::sleep(self.config.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn backoff(&self, retry: u32) -> Duration {
        let jitter_ms = u64::try_from(self.config.max_jitter.as_millis()).unwrap_or(u64::MAX);
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_ms)
        };
        self.config.backoff_for(retry) + Duration::from_millis(jitter)
    }

    async fn fetch(&self, url: &str, sink: &EventSink) -> Value {
        let attempts = self.config.max_retries.max(1);

        for attempt in 1..=attempts {
            self.throttle().await;
            sink.status(format!("GET {url} (try {attempt})"));
            debug!(url, attempt, "GET");

            match self.client.get(url).send().await {
                Ok(response) if response.status() == StatusCode::OK => {
                    return match response.json::<Value>().await {
                        Ok(value) => value,
                        Err(error) => {
                            warn!(url, %error, "response body is not JSON");
                            error_payload("invalid_json")
                        }
                    };
                }
                Ok(response) if is_transient(response.status()) => {
                    warn!(url, attempt, status = %response.status(), "transient status, retrying");
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    return match response.json::<Value>().await {
                        Ok(value) => value,
                        Err(_) => error_payload(format!("HTTP {status}")),
                    };
                }
                Err(error) => {
                    warn!(url, attempt, %error, "request failed, retrying");
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.backoff(attempt)).await;
            }
        }

        warn!(url, attempts, "giving up");
        error_payload(REQUEST_FAILED)
    }
}

impl JsonFetch for RateLimitedFetcher {
    async fn get_json(&self, url: &str, sink: &EventSink) -> Value {
        self.fetch(url, sink).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_error_payloads() {
        assert!(is_error_payload(&error_payload("request_failed")));
        assert!(is_error_payload(&json!({"object": "error", "details": "not found"})));
        assert!(is_error_payload(&json!([1, 2])));
        assert!(is_error_payload(&Value::Null));
        assert!(!is_error_payload(&json!({"object": "card", "name": "Sol Ring"})));
        assert!(!is_error_payload(&json!({"name": "deck", "error": null})));
    }

    #[test]
    fn transient_statuses() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::BAD_GATEWAY));
        assert!(!is_transient(StatusCode::NOT_FOUND));
        assert!(!is_transient(StatusCode::NOT_IMPLEMENTED));
    }

    #[test]
    fn backoff_includes_bounded_jitter() {
        let fetcher = RateLimitedFetcher::new(
            FetcherConfig::default()
                .with_backoff(Duration::from_millis(100), Duration::from_millis(20)),
        )
        .unwrap();
        for _ in 0..20 {
            let delay = fetcher.backoff(2);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay <= Duration::from_millis(220));
        }
    }
}
