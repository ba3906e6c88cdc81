//! Circulating supply history and emission estimate from a market chart

use crate::types::MarketChart;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Paired samples further apart than this are reported as misaligned
const ALIGNMENT_TOLERANCE_MS: u64 = 24 * 60 * 60 * 1000;

/// Estimated circulating supply at one sampling instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyPoint {
    pub timestamp: DateTime<Utc>,
    pub supply: f64,
}

impl SupplyPoint {
    /// Short day/month label for charts, e.g. `3 Jan`
    pub fn short_label(&self) -> String {
        self.timestamp.format("%-d %b").to_string()
    }
}

/// Derived supply history of a coin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyHistory {
    /// Points with positive supply, in the order received
    pub points: Vec<SupplyPoint>,
    /// `last - first` supply over the window, floored at zero.
    /// `None` when fewer than two points survive.
    pub emission: Option<f64>,
}

impl SupplyHistory {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Derives circulating supply as `market_cap / price` for each sample
///
/// Prices and market caps are paired by index, not by timestamp. Samples
/// whose derived supply is not a positive finite number are dropped, as are
/// samples whose timestamp falls outside the representable date range; the
/// latter are counted and reported in a warning. The emission estimate is the net supply change between the first and last
/// retained samples; a net decrease is reported as zero.
pub fn derive_supply(chart: &MarketChart) -> SupplyHistory {
    let pairs = chart.prices.len().min(chart.market_caps.len());
    if chart.prices.len() != chart.market_caps.len() {
        tracing::warn!(
            prices = chart.prices.len(),
            market_caps = chart.market_caps.len(),
            "Market chart series differ in length, pairing the first {} samples",
            pairs
        );
    }

    let mut misaligned = 0usize;
    let mut out_of_range = 0usize;
    let points: Vec<SupplyPoint> = chart
        .market_caps
        .iter()
        .zip(chart.prices.iter())
        .filter_map(|(cap, price)| {
            if cap.timestamp_ms.abs_diff(price.timestamp_ms) > ALIGNMENT_TOLERANCE_MS {
                misaligned += 1;
            }

            let supply = if price.value > 0.0 {
                cap.value / price.value
            } else {
                0.0
            };
            if !(supply.is_finite() && supply > 0.0) {
                return None;
            }

            match cap.datetime() {
                Some(timestamp) => Some(SupplyPoint { timestamp, supply }),
                None => {
                    out_of_range += 1;
                    None
                }
            }
        })
        .collect();

    if misaligned > 0 {
        tracing::warn!(
            misaligned,
            "Price and market cap timestamps disagree for some samples"
        );
    }

    if out_of_range > 0 {
        tracing::warn!(
            out_of_range,
            "Dropped samples with unrepresentable market cap timestamps"
        );
    }

    let emission = match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 => {
            Some((last.supply - first.supply).max(0.0))
        }
        _ => None,
    };

    tracing::debug!(
        samples = pairs,
        retained = points.len(),
        emission = ?emission,
        "Derived supply history"
    );

    SupplyHistory { points, emission }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeriesPoint;

    const DAY_MS: i64 = 86_400_000;
    const START_MS: i64 = 1_700_000_000_000;

    fn chart(prices: &[f64], caps: &[f64]) -> MarketChart {
        let series = |values: &[f64]| {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| SeriesPoint::new(START_MS + i as i64 * DAY_MS, *v))
                .collect()
        };
        MarketChart {
            prices: series(prices),
            market_caps: series(caps),
            total_volumes: Vec::new(),
        }
    }

    #[test]
    fn test_positive_prices_keep_every_point() {
        let history = derive_supply(&chart(&[10.0, 20.0, 25.0], &[1000.0, 2200.0, 2750.0]));

        let supplies: Vec<f64> = history.points.iter().map(|p| p.supply).collect();
        assert_eq!(supplies, vec![100.0, 110.0, 110.0]);
        assert_eq!(history.emission, Some(10.0));
        assert_eq!(history.points[0].timestamp.timestamp_millis(), START_MS);
    }

    #[test]
    fn test_supply_decrease_floors_emission_at_zero() {
        let history = derive_supply(&chart(&[10.0, 10.0], &[1000.0, 900.0]));
        assert_eq!(history.points.len(), 2);
        assert_eq!(history.emission, Some(0.0));
    }

    #[test]
    fn test_zero_price_point_is_dropped() {
        let history = derive_supply(&chart(&[10.0, 0.0, 10.0], &[1000.0, 1000.0, 1200.0]));

        assert_eq!(history.points.len(), 2);
        assert!(history.points.iter().all(|p| p.supply > 0.0));
        assert_eq!(
            history.points[1].timestamp.timestamp_millis(),
            START_MS + 2 * DAY_MS
        );
        assert_eq!(history.emission, Some(20.0));
    }

    #[test]
    fn test_zero_market_cap_point_is_dropped() {
        let history = derive_supply(&chart(&[10.0, 10.0], &[0.0, 1000.0]));
        assert_eq!(history.points.len(), 1);
        assert_eq!(history.emission, None);
    }

    #[test]
    fn test_short_series_has_no_emission() {
        assert_eq!(derive_supply(&chart(&[], &[])).emission, None);
        assert!(derive_supply(&chart(&[], &[])).is_empty());

        let single = derive_supply(&chart(&[5.0], &[50.0]));
        assert_eq!(single.points.len(), 1);
        assert_eq!(single.emission, None);
    }

    #[test]
    fn test_unequal_lengths_pair_by_index() {
        let history = derive_supply(&chart(&[10.0, 10.0, 10.0], &[1000.0, 1100.0]));
        assert_eq!(history.points.len(), 2);
        assert_eq!(history.emission, Some(10.0));
    }

    #[test]
    fn test_unrepresentable_timestamp_is_dropped() {
        let mut chart = chart(&[10.0, 10.0, 10.0], &[1000.0, 1100.0, 1200.0]);
        chart.prices[1].timestamp_ms = i64::MAX;
        chart.market_caps[1].timestamp_ms = i64::MAX;

        let history = derive_supply(&chart);

        assert_eq!(history.points.len(), 2);
        assert_eq!(
            history.points[1].timestamp.timestamp_millis(),
            START_MS + 2 * DAY_MS
        );
        assert_eq!(history.emission, Some(20.0));
    }

    #[test]
    fn test_short_label() {
        let history = derive_supply(&chart(&[1.0], &[2.0]));
        // 2023-11-14T22:13:20Z
        assert_eq!(history.points[0].short_label(), "14 Nov");
    }
}
