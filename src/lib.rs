//! # Tokenomics SDK
//!
//! Supply, emission and unlock analytics for cryptocurrencies, derived from
//! the CoinGecko market-data API.
//!
//! ## Usage
//!
//! ```no_run
//! use tokenomics_sdk::{ClientConfig, DistributionRegime, TokenomicsService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TokenomicsService::new(ClientConfig::from_env())?;
//! let report = service.load_coin("solana").await?;
//!
//! match &report.regime {
//!     DistributionRegime::PartiallyLocked(locked) => println!(
//!         "{:.1}% distributed, cap reached {}",
//!         locked.progress_pct,
//!         locked.eta_label().unwrap_or_else(|| "unknown".to_string())
//!     ),
//!     DistributionRegime::FullyDistributed => println!("fully distributed"),
//!     DistributionRegime::Uncapped { .. } => println!("no max supply"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! TokenomicsService::load_coin
//!     ↓
//! MarketDataClient (TTL caches: details 60s, charts 300s)
//!     ↓
//! MarketDataProvider (CoinGecko)
//!     ↓
//! derive_supply → project_unlocks
//!     ↓
//! CoinReport
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use tokenomics_sdk::{ClientConfig, ProviderError, TokenomicsService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TokenomicsService::new(ClientConfig::default())?;
//!
//! match service.load_coin("bitcoin").await {
//!     Ok(report) if report.is_degraded() => println!("no supply history"),
//!     Ok(report) => println!("emission: {:?}", report.annual_emission()),
//!     Err(ProviderError::RateLimited) => println!("try again shortly"),
//!     Err(ProviderError::NotFound) => println!("unknown coin"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod providers;
pub mod service;
pub mod supply;
pub mod types;
pub mod unlocks;

// Re-export commonly used types
pub use cache::TtlCache;
pub use client::MarketDataClient;
pub use config::ClientConfig;
pub use error::ProviderError;
pub use metrics::ClientMetrics;
pub use provider::MarketDataProvider;
pub use service::{CoinReport, TokenomicsService};
pub use supply::{derive_supply, SupplyHistory, SupplyPoint};
pub use types::{
    CoinDetail, CoinSummary, MarketChart, MarketData, SeriesPoint, SupplyState, Valuation,
};
pub use unlocks::{
    project_unlocks, project_unlocks_at, supply_breakdown, DilutionRisk, DistributionRegime,
    LockedSupply, SupplyBreakdown,
};
