/// Errors raised while constructing or wiring the client.
///
/// Request failures never surface here: the verb methods on
/// [`ApiClient`](crate::ApiClient) fold them into an
/// [`ApiResponse`](crate::ApiResponse).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request path could not be joined onto the base URL.
    #[error("Invalid URL '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// The underlying HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request body could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A query string could not be parsed.
    #[error("Invalid query: {0}")]
    Query(String),

    /// Session store operation failed.
    #[error("Session store error: {0}")]
    Store(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Store(e.to_string())
    }
}
