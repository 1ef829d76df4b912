use thiserror::Error;

/// Failure of a single outbound call to a third-party API.
///
/// Variants never carry query strings or response bodies: upstream URLs may
/// contain API keys and error bodies are not interpreted.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP client could not be built: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream did not respond in time")]
    Timeout,

    #[error("Upstream {target} returned HTTP {status}")]
    Status { status: u16, target: String },

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    #[error("Upstream returned an empty completion")]
    EmptyCompletion,
}

impl UpstreamError {
    pub(crate) fn network(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return UpstreamError::Timeout;
        }
        UpstreamError::Network(err.without_url().to_string())
    }

    /// Body read failures; the deadline can also expire mid-body.
    pub(crate) fn decode(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return UpstreamError::Timeout;
        }
        UpstreamError::Decode(err.without_url().to_string())
    }
}
