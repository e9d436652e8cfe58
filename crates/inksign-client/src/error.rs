use thiserror::Error;

/// Single error channel for the gateway.
///
/// Transport failures, status-code mismatches, and body-decode failures
/// all surface here; callers choose to abort (strict) or log-and-skip
/// (tolerant).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("signing-service configuration error: {0}")]
    Config(String),

    #[error("connection to {url} failed; check the network connectivity of this host ({source})")]
    Connection { url: String, source: reqwest::Error },

    #[error("technical failure on {method} {url}: {source}")]
    Transport {
        method: String,
        url: String,
        source: reqwest::Error,
    },

    #[error(
        "{method} {url} returned status {status} whereas {expected} was expected: {title} ({detail})"
    )]
    UnexpectedStatus {
        method: String,
        url: String,
        status: u16,
        expected: u16,
        title: String,
        detail: String,
    },

    #[error("invalid response body from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },

    #[error("could not serialize request payload: {0}")]
    Serialize(#[from] serde_json::Error),
}
