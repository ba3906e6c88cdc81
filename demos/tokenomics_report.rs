use std::time::Instant;
use tokenomics_sdk::{ClientConfig, DistributionRegime, ProviderError, TokenomicsService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "bitcoin".to_string());
    let service = TokenomicsService::new(ClientConfig::from_env())?;

    println!("Tokenomics report for '{}'", query);
    println!("-------------------------------------------");

    let start = Instant::now();
    let report = match service.load_coin(&query).await {
        Ok(report) => report,
        Err(ProviderError::RateLimited) => {
            eprintln!("Rate limited by the API, try again shortly.");
            return Ok(());
        }
        Err(ProviderError::NotFound) => {
            eprintln!("No coin found for '{}'.", query);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let cold = start.elapsed();

    let details = &report.details;
    let market = &details.market_data;
    println!("{} ({})", details.name, details.symbol.to_uppercase());
    if let Some(price) = market.current_price.usd {
        println!("   Price:        ${:.2}", price);
    }
    if let Some(circulating) = market.circulating_supply {
        println!("   Circulating:  {:.0}", circulating);
    }
    match market.max_supply {
        Some(max) => println!("   Max supply:   {:.0}", max),
        None => println!("   Max supply:   uncapped"),
    }
    if let Some(breakdown) = &report.breakdown {
        println!("   Circulating share of total: {}%", breakdown.circulating_pct);
    }
    println!();

    match report.annual_emission() {
        Some(emission) => println!(
            "Supply history: {} points, estimated annual emission {:.0}",
            report.supply_history.points.len(),
            emission
        ),
        None if report.is_degraded() => println!("Supply history: unavailable"),
        None => println!("Supply history: not enough data"),
    }

    match &report.regime {
        DistributionRegime::Uncapped { progress_pct, .. } => {
            println!("Distribution: no max supply");
            if let Some(pct) = progress_pct {
                println!("   {:.1}% of total supply circulating", pct);
            }
        }
        DistributionRegime::FullyDistributed => println!("Distribution: fully distributed"),
        DistributionRegime::PartiallyLocked(locked) => {
            println!("Distribution: {:.1}% unlocked", locked.progress_pct);
            println!(
                "   Locked:       {:.0} (~${:.0})",
                locked.locked, locked.locked_value_usd
            );
            println!(
                "   MCap/FDV:     {:.2} ({:?} dilution risk)",
                locked.mcap_fdv_ratio, locked.dilution_risk
            );
            println!(
                "   Fully unlocked: {}",
                locked.eta_label().unwrap_or_else(|| "unknown".to_string())
            );
        }
    }
    println!();

    // Second load is served from the TTL caches except for search
    let start = Instant::now();
    service.load_coin(&query).await?;
    let warm = start.elapsed();

    let metrics = service.client().metrics().await;
    println!("Cold load: {:?}, warm load: {:?}", cold, warm);
    println!(
        "Requests: {} ({} failed), cache hit rate {:.0}%, p50 {:.0}ms",
        metrics.total_requests,
        metrics.failed_requests,
        metrics.cache_hit_rate() * 100.0,
        metrics.latency_p50_ms
    );

    Ok(())
}
