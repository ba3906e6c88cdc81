//! Error types for the tokenomics SDK

use thiserror::Error;

/// Errors that can occur when fetching data from the market-data provider
///
/// Every kind originates in the client and reaches the caller unchanged.
/// Nothing here is retried by the SDK.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The query or coin id does not exist upstream
    #[error("Not found")]
    NotFound,

    /// Upstream throttling (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Any other non-success HTTP status
    #[error("Upstream error: HTTP {0}")]
    Upstream(u16),

    /// No response within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Transport failure other than a timeout
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration cannot be used (e.g. a malformed base URL)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProviderError {
    /// Classifies a non-success HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            429 => Self::RateLimited,
            other => Self::Upstream(other),
        }
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// True for upstream throttling; callers may retry after a backoff
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// True when the query or coin id does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        if err.is_decode() {
            return Self::InvalidResponse(err.to_string());
        }
        match err.status() {
            Some(status) if !status.is_success() => Self::from_status(status.as_u16()),
            _ => Self::Network(err),
        }
    }
}
