use thiserror::Error;

/// Failure raised by a round trip against the users collection.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported URL scheme `{0}` (use http or https)")]
    UnsupportedScheme(String),
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl NetworkError {
    /// HTTP status code carried by the error, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
