use thiserror::Error;

/// Errors that abort a network build
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Malformed caller input (paper references, thresholds, page sizes)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote service understood the request and rejected it
    #[error("remote data error {code}: {message}")]
    RemoteData { code: String, message: String },

    /// A count payload lacked the fields pagination depends on
    #[error("incomplete remote envelope: {0}")]
    IncompleteEnvelope(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// True for the fatal remote-data family (error codes and broken envelopes)
    pub fn is_remote_data(&self) -> bool {
        matches!(self, Self::RemoteData { .. } | Self::IncompleteEnvelope(_))
    }
}

/// Failure of a single query attempt; retried by the executor, never escalated
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
