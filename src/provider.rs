//! Provider abstraction for fetching market data from external APIs

use crate::{
    error::ProviderError,
    types::{CoinDetail, CoinSummary, MarketChart},
};
use async_trait::async_trait;

/// Trait for market-data providers
///
/// Implementations perform raw, uncached network I/O. Caching and metrics
/// are layered on top by `MarketDataClient`.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Searches coins by free-text query
    ///
    /// # Returns
    /// All hits in provider order; an empty list is not an error
    async fn search(&self, query: &str) -> Result<Vec<CoinSummary>, ProviderError>;

    /// Fetches full details, including live market data, for a coin
    async fn coin_details(&self, coin_id: &str) -> Result<CoinDetail, ProviderError>;

    /// Fetches the daily USD market chart for the trailing `days`
    async fn market_chart(&self, coin_id: &str, days: u32)
        -> Result<MarketChart, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Canned failure, rebuilt on every call since `ProviderError` is not Clone
    #[derive(Debug, Clone, Copy)]
    pub enum MockFailure {
        NotFound,
        RateLimited,
        Upstream(u16),
        Timeout,
    }

    impl From<MockFailure> for ProviderError {
        fn from(failure: MockFailure) -> Self {
            match failure {
                MockFailure::NotFound => ProviderError::NotFound,
                MockFailure::RateLimited => ProviderError::RateLimited,
                MockFailure::Upstream(status) => ProviderError::Upstream(status),
                MockFailure::Timeout => ProviderError::Timeout,
            }
        }
    }

    type Canned<T> = Arc<Mutex<HashMap<String, Result<T, MockFailure>>>>;

    /// Mock provider for testing
    #[derive(Default)]
    pub struct MockProvider {
        search_results: Canned<Vec<CoinSummary>>,
        details: Canned<CoinDetail>,
        charts: Canned<MarketChart>,
        search_calls: AtomicUsize,
        details_calls: AtomicUsize,
        chart_calls: AtomicUsize,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_search(&self, query: &str, hits: Vec<CoinSummary>) {
            self.search_results
                .lock()
                .unwrap()
                .insert(query.to_string(), Ok(hits));
        }

        pub fn set_details(&self, detail: CoinDetail) {
            self.details
                .lock()
                .unwrap()
                .insert(detail.id.clone(), Ok(detail));
        }

        pub fn set_details_error(&self, coin_id: &str, failure: MockFailure) {
            self.details
                .lock()
                .unwrap()
                .insert(coin_id.to_string(), Err(failure));
        }

        pub fn set_chart(&self, coin_id: &str, chart: MarketChart) {
            self.charts
                .lock()
                .unwrap()
                .insert(coin_id.to_string(), Ok(chart));
        }

        pub fn set_chart_error(&self, coin_id: &str, failure: MockFailure) {
            self.charts
                .lock()
                .unwrap()
                .insert(coin_id.to_string(), Err(failure));
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }

        pub fn details_calls(&self) -> usize {
            self.details_calls.load(Ordering::SeqCst)
        }

        pub fn chart_calls(&self) -> usize {
            self.chart_calls.load(Ordering::SeqCst)
        }

        fn lookup<T: Clone>(canned: &Canned<T>, key: &str) -> Result<T, ProviderError> {
            match canned.lock().unwrap().get(key) {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(failure)) => Err((*failure).into()),
                None => Err(ProviderError::NotFound),
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn search(&self, query: &str) -> Result<Vec<CoinSummary>, ProviderError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .search_results
                .lock()
                .unwrap()
                .get(query)
                .and_then(|hits| hits.as_ref().ok().cloned())
                .unwrap_or_default())
        }

        async fn coin_details(&self, coin_id: &str) -> Result<CoinDetail, ProviderError> {
            self.details_calls.fetch_add(1, Ordering::SeqCst);
            Self::lookup(&self.details, coin_id)
        }

        async fn market_chart(
            &self,
            coin_id: &str,
            _days: u32,
        ) -> Result<MarketChart, ProviderError> {
            self.chart_calls.fetch_add(1, Ordering::SeqCst);
            Self::lookup(&self.charts, coin_id)
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    /// Builds a search hit
    pub fn summary(id: &str, name: &str, symbol: &str) -> CoinSummary {
        CoinSummary {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            market_cap_rank: None,
            thumb: None,
        }
    }

    /// Builds a coin with the given supply and price
    pub fn coin(
        id: &str,
        price_usd: f64,
        circulating: f64,
        total: Option<f64>,
        max: Option<f64>,
    ) -> CoinDetail {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "symbol": id,
            "name": id,
            "market_data": {
                "current_price": { "usd": price_usd },
                "market_cap": { "usd": price_usd * circulating },
                "circulating_supply": circulating,
                "total_supply": total,
                "max_supply": max
            }
        }))
        .unwrap()
    }
}
