//! Runtime configuration for the market-data client

use crate::constants::{
    CHART_CACHE_TTL_SECS, COINGECKO_API_URL, DETAILS_CACHE_TTL_SECS, ENV_API_URL,
    ENV_REQUEST_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS, SUPPLY_HISTORY_DAYS,
};
use std::time::Duration;

/// Client configuration
///
/// Defaults come from `constants`. The cache TTLs are handed to the client's
/// caches at construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the CoinGecko-compatible API (no trailing slash)
    pub base_url: String,
    /// Upper bound on every HTTP request
    pub request_timeout: Duration,
    /// Time-to-live for cached coin details
    pub details_ttl: Duration,
    /// Time-to-live for cached market charts
    pub chart_ttl: Duration,
    /// Chart window used by the tokenomics service (in days)
    pub history_days: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            details_ttl: Duration::from_secs(DETAILS_CACHE_TTL_SECS),
            chart_ttl: Duration::from_secs(CHART_CACHE_TTL_SECS),
            history_days: SUPPLY_HISTORY_DAYS,
        }
    }
}

impl ClientConfig {
    /// Builds a configuration from defaults plus environment overrides
    ///
    /// Honors `COINGECKO_API_URL` and `TOKENOMICS_REQUEST_TIMEOUT_SECS`.
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }

        if let Ok(raw) = std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %raw,
                    "Ignoring invalid {}", ENV_REQUEST_TIMEOUT_SECS
                ),
            }
        }

        config
    }

    /// Overrides the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides both cache TTLs
    pub fn with_cache_ttls(mut self, details_ttl: Duration, chart_ttl: Duration) -> Self {
        self.details_ttl = details_ttl;
        self.chart_ttl = chart_ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, COINGECKO_API_URL);
        assert_eq!(config.details_ttl, Duration::from_secs(60));
        assert_eq!(config.chart_ttl, Duration::from_secs(300));
        assert_eq!(config.history_days, 365);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
    }
}
