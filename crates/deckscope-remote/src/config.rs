use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("deckscope/", env!("CARGO_PKG_VERSION"));

/// Throttling and retry settings for [`crate::RateLimitedFetcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    /// Minimum gap between two consecutive requests, across all callers.
    pub min_interval: Duration,
    /// Total attempts per request before giving up.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub initial_backoff: Duration,
    /// Upper bound of the random delay added to every backoff.
    pub max_jitter: Duration,
    /// Per-request network timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(120),
            max_retries: 5,
            initial_backoff: Duration::from_secs(1),
            max_jitter: Duration::from_millis(200),
            timeout: Duration::from_secs(20),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetcherConfig {
    #[must_use]
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Sets the attempt ceiling; at least one attempt is always made.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, initial: Duration, max_jitter: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_jitter = max_jitter;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Backoff before retry number `retry` (1-based), without jitter.
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1 << exponent)
    }
}

/// Base URLs of the remote services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub scryfall: String,
    pub moxfield: String,
    pub archidekt: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            scryfall: "https://api.scryfall.com".to_string(),
            moxfield: "https://api.moxfield.com".to_string(),
            archidekt: "https://archidekt.com/api".to_string(),
        }
    }
}

impl Endpoints {
    /// Points every service at the same base URL (mock servers).
    #[must_use]
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            scryfall: base.to_string(),
            moxfield: base.to_string(),
            archidekt: base.to_string(),
        }
    }

    /// Exact-name card lookup URL.
    #[must_use]
    pub fn card_named(&self, name: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        format!("{}/cards/named?exact={encoded}", self.scryfall.trim_end_matches('/'))
    }

    /// Moxfield deck endpoints, newest API first.
    #[must_use]
    pub fn moxfield_deck(&self, deck_id: &str) -> Vec<String> {
        let base = self.moxfield.trim_end_matches('/');
        vec![
            format!("{base}/v2/decks/{deck_id}"),
            format!("{base}/decks/{deck_id}"),
        ]
    }

    /// Archidekt deck endpoints, full deck first.
    #[must_use]
    pub fn archidekt_deck(&self, deck_id: &str) -> Vec<String> {
        let base = self.archidekt.trim_end_matches('/');
        vec![
            format!("{base}/decks/{deck_id}"),
            format!("{base}/decks/{deck_id}/small/"),
        ]
    }
}
