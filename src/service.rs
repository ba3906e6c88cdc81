//! Tokenomics query service
//!
//! Runs one user query end to end: search, coin details, supply history and
//! unlock projection. A details failure fails the query. A chart failure
//! only degrades it: the report is still produced, with an empty supply
//! history and the chart error kept in `CoinReport::chart`.

use crate::{
    client::MarketDataClient,
    config::ClientConfig,
    error::ProviderError,
    supply::{derive_supply, SupplyHistory},
    types::{CoinDetail, MarketChart},
    unlocks::{project_unlocks, supply_breakdown, DistributionRegime, SupplyBreakdown},
};
use futures::future::join;
use std::sync::Arc;

/// Everything the presentation layer needs for one coin
#[derive(Debug)]
pub struct CoinReport {
    pub details: CoinDetail,
    /// Raw chart, or why it could not be fetched
    pub chart: Result<MarketChart, ProviderError>,
    /// Empty when the chart is unavailable
    pub supply_history: SupplyHistory,
    pub regime: DistributionRegime,
    pub breakdown: Option<SupplyBreakdown>,
}

impl CoinReport {
    /// Annual emission estimate, if the history allowed one
    pub fn annual_emission(&self) -> Option<f64> {
        self.supply_history.emission
    }

    /// True when the chart fetch failed and the report is partial
    pub fn is_degraded(&self) -> bool {
        self.chart.is_err()
    }
}

/// Tokenomics service
///
/// # Example
/// ```no_run
/// use tokenomics_sdk::{ClientConfig, TokenomicsService};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = TokenomicsService::new(ClientConfig::from_env())?;
/// let report = service.load_coin("bitcoin").await?;
/// println!("{}: {:?}", report.details.name, report.regime);
/// # Ok(())
/// # }
/// ```
pub struct TokenomicsService {
    client: Arc<MarketDataClient>,
    history_days: u32,
}

impl TokenomicsService {
    /// Creates a service backed by a CoinGecko client
    pub fn new(config: ClientConfig) -> Result<Self, ProviderError> {
        let history_days = config.history_days;
        let client = Arc::new(MarketDataClient::new(config)?);
        Ok(Self::with_client(client, history_days))
    }

    /// Creates a service on top of an existing client
    pub fn with_client(client: Arc<MarketDataClient>, history_days: u32) -> Self {
        Self {
            client,
            history_days,
        }
    }

    /// The underlying client
    pub fn client(&self) -> &Arc<MarketDataClient> {
        &self.client
    }

    /// Resolves `query` through search and loads the first hit
    ///
    /// An empty search result is reported as `ProviderError::NotFound`.
    pub async fn load_coin(&self, query: &str) -> Result<CoinReport, ProviderError> {
        let hits = self.client.search(query).await?;
        let coin_id = match hits.first() {
            Some(hit) => hit.id.clone(),
            None => {
                tracing::debug!(query, "Search returned no coins");
                return Err(ProviderError::NotFound);
            }
        };

        tracing::debug!(query, coin_id = %coin_id, candidates = hits.len(), "Resolved coin");
        self.load_coin_by_id(&coin_id).await
    }

    /// Loads the report for a known coin id
    pub async fn load_coin_by_id(&self, coin_id: &str) -> Result<CoinReport, ProviderError> {
        let (details, chart) = join(
            self.client.get_details(coin_id),
            self.client.get_market_chart(coin_id, self.history_days),
        )
        .await;

        let details = details?;

        let supply_history = match &chart {
            Ok(chart) => derive_supply(chart),
            Err(e) => {
                tracing::warn!(
                    coin_id,
                    error = %e,
                    "Market chart unavailable, continuing without supply history"
                );
                SupplyHistory::default()
            }
        };

        let market_data = &details.market_data;
        let state = market_data.supply_state();
        let regime = project_unlocks(
            &state,
            &market_data.valuation(),
            supply_history.emission,
        );
        let breakdown = supply_breakdown(&state);

        tracing::info!(
            coin_id,
            points = supply_history.points.len(),
            emission = ?supply_history.emission,
            degraded = chart.is_err(),
            "Loaded tokenomics report"
        );

        Ok(CoinReport {
            details,
            chart,
            supply_history,
            regime,
            breakdown,
        })
    }
}
