use thiserror::Error;

/// Errors that can occur during Deckscope core operations.
#[derive(Debug, Error)]
pub enum DeckscopeError {
    /// The deck input is empty or contains only whitespace.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// A label rule pattern failed to compile.
    #[error("invalid pattern for rule {rule:?}: {source}")]
    InvalidRule {
        /// The rule (label) whose pattern is broken.
        rule: String,
        #[source]
        source: regex::Error,
    },

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The label configuration file could not be read or written.
    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The label configuration file is not valid JSON for a `LabelConfig`.
    #[error("malformed label config: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

/// Result type alias for Deckscope operations.
pub type Result<T> = std::result::Result<T, DeckscopeError>;
