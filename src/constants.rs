//! Constants for the tokenomics SDK
//!
//! Defaults for the client live here. `ClientConfig` starts from these
//! values and can override the endpoint and timeout at runtime.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko path segment for coin search
pub const COINGECKO_SEARCH_ENDPOINT: &str = "search";

/// CoinGecko path segment prefixing coin details and charts
pub const COINGECKO_COINS_ENDPOINT: &str = "coins";

/// How long coin details stay cached (in seconds)
pub const DETAILS_CACHE_TTL_SECS: u64 = 60;

/// How long market charts stay cached (in seconds)
pub const CHART_CACHE_TTL_SECS: u64 = 300;

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Trailing window used for supply history and emission estimates (in days)
pub const SUPPLY_HISTORY_DAYS: u32 = 365;

/// Market cap / FDV ratio below which dilution risk is considered high
pub const HIGH_DILUTION_RATIO: f64 = 0.5;

/// Projections at or beyond this many years are reported as unknown
pub const ETA_HORIZON_YEARS: f64 = 100.0;

/// Maximum length of a coin description summary (in characters)
pub const DESCRIPTION_SUMMARY_CHARS: usize = 350;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "tokenomics-sdk/0.1.0";

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "COINGECKO_API_URL";

/// Environment variable overriding the request timeout (in seconds)
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TOKENOMICS_REQUEST_TIMEOUT_SECS";
