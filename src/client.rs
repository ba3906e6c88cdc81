//! Cache-checked market-data client
//!
//! Sole point of network I/O for the SDK. Coin details and market charts
//! are served from per-client TTL caches when fresh; search always goes
//! upstream. Failures are returned unchanged and never retried.

use crate::{
    cache::TtlCache,
    config::ClientConfig,
    error::ProviderError,
    metrics::{ClientMetrics, MetricsCollector},
    provider::MarketDataProvider,
    providers::CoinGeckoProvider,
    types::{CoinDetail, CoinSummary, MarketChart},
};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cache key for market charts: `(coin_id, days)`
type ChartKey = (String, u32);

/// Market-data client with TTL caching in front of a provider
///
/// # Example
/// ```no_run
/// use tokenomics_sdk::{ClientConfig, MarketDataClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MarketDataClient::new(ClientConfig::from_env())?;
/// let hits = client.search("bitcoin").await?;
/// if let Some(hit) = hits.first() {
///     let detail = client.get_details(&hit.id).await?;
///     println!("{}: {:?}", detail.name, detail.market_data.circulating_supply);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketDataClient {
    provider: Arc<dyn MarketDataProvider>,
    details_cache: TtlCache<String, CoinDetail>,
    chart_cache: TtlCache<ChartKey, MarketChart>,
    details_ttl: Duration,
    chart_ttl: Duration,
    metrics: MetricsCollector,
}

impl MarketDataClient {
    /// Creates a client backed by CoinGecko
    pub fn new(config: ClientConfig) -> Result<Self, ProviderError> {
        let provider = Arc::new(CoinGeckoProvider::new(&config)?);
        Ok(Self::with_provider(provider, &config))
    }

    /// Creates a client with a custom provider
    ///
    /// Only the cache TTLs are taken from `config`.
    pub fn with_provider(provider: Arc<dyn MarketDataProvider>, config: &ClientConfig) -> Self {
        let metrics = MetricsCollector::new(provider.provider_name());
        Self {
            provider,
            details_cache: TtlCache::new(),
            chart_cache: TtlCache::new(),
            details_ttl: config.details_ttl,
            chart_ttl: config.chart_ttl,
            metrics,
        }
    }

    /// Searches coins by free-text query
    ///
    /// Not cached. An empty result is returned as an empty list; deciding
    /// whether that means "not found" is up to the caller.
    pub async fn search(&self, query: &str) -> Result<Vec<CoinSummary>, ProviderError> {
        self.timed(self.provider.search(query)).await
    }

    /// Fetches coin details, served from cache for `details_ttl`
    pub async fn get_details(&self, coin_id: &str) -> Result<CoinDetail, ProviderError> {
        let key = coin_id.to_string();
        if let Some(detail) = self.details_cache.get(&key).await {
            self.metrics.record_cache_hit();
            tracing::debug!(coin_id, "Coin details served from cache");
            return Ok(detail);
        }
        self.metrics.record_cache_miss();

        let detail = self.timed(self.provider.coin_details(coin_id)).await?;
        self.details_cache
            .set(key, detail.clone(), self.details_ttl)
            .await;
        Ok(detail)
    }

    /// Fetches the market chart for `days`, served from cache for `chart_ttl`
    pub async fn get_market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<MarketChart, ProviderError> {
        let key = (coin_id.to_string(), days);
        if let Some(chart) = self.chart_cache.get(&key).await {
            self.metrics.record_cache_hit();
            tracing::debug!(coin_id, days, "Market chart served from cache");
            return Ok(chart);
        }
        self.metrics.record_cache_miss();

        let chart = self
            .timed(self.provider.market_chart(coin_id, days))
            .await?;
        self.chart_cache.set(key, chart.clone(), self.chart_ttl).await;
        Ok(chart)
    }

    /// Returns the name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Gets request latency, success rate and cache hit metrics
    pub async fn metrics(&self) -> ClientMetrics {
        self.metrics.snapshot().await
    }

    /// Drops expired cache entries from both caches
    pub async fn purge_expired(&self) -> usize {
        self.details_cache.purge_expired().await + self.chart_cache.purge_expired().await
    }

    async fn timed<T>(
        &self,
        request: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        let start = Instant::now();
        let result = request.await;
        self.metrics
            .record_request(start.elapsed(), result.is_ok())
            .await;

        if let Err(e) = &result {
            tracing::debug!(
                provider = self.provider.provider_name(),
                error = %e,
                latency_ms = start.elapsed().as_millis() as u64,
                "Upstream request failed"
            );
        }
        result
    }
}
