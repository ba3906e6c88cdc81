//! CoinGecko market-data provider implementation

use crate::{
    config::ClientConfig,
    constants::{COINGECKO_COINS_ENDPOINT, COINGECKO_SEARCH_ENDPOINT, USER_AGENT},
    error::ProviderError,
    provider::MarketDataProvider,
    types::{CoinDetail, CoinSummary, MarketChart, SearchResponse},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Query parameters that trim the `/coins/{id}` payload down to market data
const DETAIL_QUERY: &[(&str, &str)] = &[
    ("localization", "false"),
    ("tickers", "false"),
    ("market_data", "true"),
    ("community_data", "false"),
    ("developer_data", "false"),
    ("sparkline", "false"),
];

/// CoinGecko market-data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: Url,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider
    ///
    /// Every request is bounded by `config.request_timeout`.
    pub fn new(config: &ClientConfig) -> Result<Self, ProviderError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ProviderError::InvalidConfig(format!("base URL {:?}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidConfig(format!(
                "base URL {:?} cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::Network)?;

        Ok(Self { client, base_url })
    }

    /// Appends path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidConfig("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn search_url(&self) -> Result<Url, ProviderError> {
        self.endpoint(&[COINGECKO_SEARCH_ENDPOINT])
    }

    fn details_url(&self, coin_id: &str) -> Result<Url, ProviderError> {
        self.endpoint(&[COINGECKO_COINS_ENDPOINT, coin_id])
    }

    fn chart_url(&self, coin_id: &str) -> Result<Url, ProviderError> {
        self.endpoint(&[COINGECKO_COINS_ENDPOINT, coin_id, "market_chart"])
    }

    /// Sends a request, classifies the status and decodes the JSON body
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, ProviderError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), what, "CoinGecko request failed");
            return Err(ProviderError::from_status(status.as_u16()));
        }

        let response_text = response.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::invalid_response(format!(
                "Failed to parse CoinGecko {} response: {}",
                what, e
            ))
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn search(&self, query: &str) -> Result<Vec<CoinSummary>, ProviderError> {
        let url = self.search_url()?;
        tracing::debug!(query, "Searching CoinGecko: {}", url);

        let request = self.client.get(url).query(&[("query", query)]);
        let response: SearchResponse = self.fetch_json(request, "search").await?;

        tracing::debug!(query, hits = response.coins.len(), "CoinGecko search done");
        Ok(response.coins)
    }

    async fn coin_details(&self, coin_id: &str) -> Result<CoinDetail, ProviderError> {
        let url = self.details_url(coin_id)?;
        tracing::debug!(coin_id, "Fetching coin details from CoinGecko: {}", url);

        let request = self.client.get(url).query(DETAIL_QUERY);
        self.fetch_json(request, "coin details").await
    }

    async fn market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<MarketChart, ProviderError> {
        let url = self.chart_url(coin_id)?;
        tracing::debug!(coin_id, days, "Fetching market chart from CoinGecko: {}", url);

        let days = days.to_string();
        let request = self.client.get(url).query(&[
            ("vs_currency", "usd"),
            ("days", days.as_str()),
            ("interval", "daily"),
        ]);
        let chart: MarketChart = self.fetch_json(request, "market chart").await?;

        tracing::debug!(
            coin_id,
            prices = chart.prices.len(),
            market_caps = chart.market_caps.len(),
            "Fetched market chart"
        );
        Ok(chart)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
