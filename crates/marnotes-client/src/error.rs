//! Error types for the marnotes client.

/// All errors that can occur when talking to the document server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The server could not be reached, or the connection failed mid-request.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error, status: {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not the JSON we expected.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server used a feature this client does not implement.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl ClientError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
