use thiserror::Error;

/// Errors raised while setting up or maintaining the remote layer.
///
/// Lookups themselves never fail with an error: failed requests come back
/// as error-marked payloads.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The deck URL detector pattern failed to compile.
    #[error("regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    /// The card cache file could not be written.
    #[error("cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    /// The card cache could not be serialized.
    #[error("cache serialization error: {0}")]
    CacheFormat(#[from] serde_json::Error),

    /// Building the freeform parser failed.
    #[error(transparent)]
    Core(#[from] deckscope_core::DeckscopeError),
}

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
