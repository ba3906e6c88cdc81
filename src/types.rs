//! Types for the market-data provider responses

use crate::constants::DESCRIPTION_SUMMARY_CHARS;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// A single search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    /// Provider coin id (e.g. "bitcoin")
    pub id: String,
    /// Display name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Market cap rank, if ranked
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    /// Thumbnail image URL
    #[serde(default)]
    pub thumb: Option<String>,
}

/// Search response envelope
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<CoinSummary>,
}

/// A value quoted in USD (`{ "usd": 123.4 }`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsdQuote {
    #[serde(default)]
    pub usd: Option<f64>,
}

/// Live market data block of a coin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketData {
    #[serde(deserialize_with = "null_as_default")]
    pub current_price: UsdQuote,
    #[serde(deserialize_with = "null_as_default")]
    pub market_cap: UsdQuote,
    pub market_cap_rank: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_volume: UsdQuote,
    #[serde(deserialize_with = "null_as_default")]
    pub high_24h: UsdQuote,
    #[serde(deserialize_with = "null_as_default")]
    pub low_24h: UsdQuote,
    pub price_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub ath: UsdQuote,
    #[serde(deserialize_with = "null_as_default")]
    pub ath_change_percentage: UsdQuote,
    #[serde(deserialize_with = "null_as_default")]
    pub fully_diluted_valuation: UsdQuote,
}

impl MarketData {
    /// Current supply fields used by the unlock projection
    pub fn supply_state(&self) -> SupplyState {
        SupplyState {
            circulating: self.circulating_supply.unwrap_or(0.0),
            total: self.total_supply,
            max: self.max_supply,
        }
    }

    /// Current price and valuation fields used by the unlock projection
    pub fn valuation(&self) -> Valuation {
        Valuation {
            price_usd: self.current_price.usd.unwrap_or(0.0),
            market_cap_usd: self.market_cap.usd.unwrap_or(0.0),
            fully_diluted_valuation_usd: self.fully_diluted_valuation.usd,
        }
    }

    /// USD value of the circulating supply at the current price
    pub fn circulating_value_usd(&self) -> Option<f64> {
        Some(self.circulating_supply? * self.current_price.usd?)
    }
}

/// Coin description in the languages we read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinDescription {
    pub en: Option<String>,
}

/// Project links
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinLinks {
    #[serde(deserialize_with = "one_or_many")]
    pub homepage: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub whitepaper: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub blockchain_site: Vec<String>,
}

impl CoinLinks {
    /// First non-empty homepage link
    pub fn primary_homepage(&self) -> Option<&str> {
        first_non_empty(&self.homepage)
    }

    /// First non-empty whitepaper link
    pub fn primary_whitepaper(&self) -> Option<&str> {
        first_non_empty(&self.whitepaper)
    }
}

fn first_non_empty(links: &[String]) -> Option<&str> {
    links.iter().map(String::as_str).find(|link| !link.is_empty())
}

/// Coin image URLs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinImage {
    pub large: Option<String>,
    pub small: Option<String>,
}

/// Full coin details as returned by `/coins/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: CoinDescription,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: CoinLinks,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: CoinImage,
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_data: MarketData,
}

impl CoinDetail {
    /// Plain-text summary of the English description
    ///
    /// HTML tags are stripped and the text is cut at `max_chars` characters
    /// with a trailing `...`. Returns `None` when there is no description.
    pub fn description_summary(&self, max_chars: usize) -> Option<String> {
        let raw = self.description.en.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        let stripped = strip_html_tags(raw);
        if stripped.chars().count() > max_chars {
            let cut: String = stripped.chars().take(max_chars).collect();
            Some(format!("{}...", cut))
        } else {
            Some(stripped)
        }
    }

    /// Description summary with the default length
    pub fn short_description(&self) -> Option<String> {
        self.description_summary(DESCRIPTION_SUMMARY_CHARS)
    }
}

/// Treats an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The API returns some link fields either as a string or as a list
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<Option<String>>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(link)) => vec![link],
        Some(OneOrMany::Many(links)) => links.into_iter().flatten().collect(),
        None => Vec::new(),
    })
}

/// Matches an HTML tag such as `<a href="...">` or `</p>`
static HTML_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"));

fn strip_html_tags(input: &str) -> String {
    HTML_TAG_PATTERN.replace_all(input, "").into_owned()
}

/// One `[timestampMs, value]` sample of a market chart series
///
/// A `null` value on the wire decodes as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, Option<f64>)", into = "(f64, f64)")]
pub struct SeriesPoint {
    /// Unix timestamp in milliseconds
    pub timestamp_ms: i64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    /// Sample instant as a UTC datetime
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }
}

impl From<(f64, Option<f64>)> for SeriesPoint {
    fn from((timestamp_ms, value): (f64, Option<f64>)) -> Self {
        Self::new(timestamp_ms as i64, value.unwrap_or(0.0))
    }
}

impl From<SeriesPoint> for (f64, f64) {
    fn from(point: SeriesPoint) -> Self {
        (point.timestamp_ms as f64, point.value)
    }
}

/// Historical market chart as returned by `/coins/{id}/market_chart`
///
/// The provider index-aligns the series: `prices[i]` and `market_caps[i]`
/// describe the same sampling instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<SeriesPoint>,
    pub market_caps: Vec<SeriesPoint>,
    #[serde(default)]
    pub total_volumes: Vec<SeriesPoint>,
}

/// Current supply of a coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyState {
    pub circulating: f64,
    pub total: Option<f64>,
    /// Hard cap; `None` means uncapped
    pub max: Option<f64>,
}

/// Current price and valuation of a coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub price_usd: f64,
    pub market_cap_usd: f64,
    pub fully_diluted_valuation_usd: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_detail_tolerates_nulls() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "description": { "en": "<a href=\"x\">Bitcoin</a> is money" },
            "links": { "homepage": ["", "https://bitcoin.org"], "whitepaper": "https://bitcoin.org/bitcoin.pdf" },
            "market_data": {
                "current_price": { "usd": 50000.0, "eur": 46000.0 },
                "market_cap": { "usd": 900000000000.0 },
                "circulating_supply": 18000000.0,
                "total_supply": 21000000.0,
                "max_supply": null,
                "fully_diluted_valuation": {},
                "ath": null
            }
        }"#;

        let detail: CoinDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.market_data.current_price.usd, Some(50000.0));
        assert_eq!(detail.market_data.max_supply, None);
        assert_eq!(detail.market_data.fully_diluted_valuation.usd, None);
        assert_eq!(detail.links.primary_homepage(), Some("https://bitcoin.org"));
        assert_eq!(
            detail.links.primary_whitepaper(),
            Some("https://bitcoin.org/bitcoin.pdf")
        );
        assert_eq!(
            detail.short_description().as_deref(),
            Some("Bitcoin is money")
        );
        assert_eq!(
            detail.market_data.circulating_value_usd(),
            Some(18_000_000.0 * 50_000.0)
        );
    }

    #[test]
    fn test_description_summary_truncates() {
        let detail = CoinDetail {
            id: "x".into(),
            symbol: "x".into(),
            name: "X".into(),
            description: CoinDescription {
                en: Some("<p>abcdefghij</p>".into()),
            },
            links: CoinLinks::default(),
            image: CoinImage::default(),
            market_data: MarketData::default(),
        };
        assert_eq!(detail.description_summary(4).as_deref(), Some("abcd..."));
        assert_eq!(detail.description_summary(10).as_deref(), Some("abcdefghij"));
    }

    #[test]
    fn test_description_keeps_literal_angle_brackets() {
        let mut detail: CoinDetail = serde_json::from_value(serde_json::json!({
            "id": "x", "symbol": "x", "name": "X",
            "description": { "en": "Fees are < 1 cent per transfer" }
        }))
        .unwrap();
        assert_eq!(
            detail.short_description().as_deref(),
            Some("Fees are < 1 cent per transfer")
        );

        detail.description.en = Some("<b>Fast</b> <> cheap".into());
        assert_eq!(detail.short_description().as_deref(), Some("Fast <> cheap"));
    }

    #[test]
    fn test_market_chart_from_wire_pairs() {
        let json = r#"{
            "prices": [[1700000000000, 10.5], [1700086400000, 11.0]],
            "market_caps": [[1700000000000, 1050.0], [1700086400000, null]]
        }"#;

        let chart: MarketChart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[0], SeriesPoint::new(1_700_000_000_000, 10.5));
        assert_eq!(chart.market_caps[1].value, 0.0);
        assert!(chart.total_volumes.is_empty());
        assert_eq!(
            chart.prices[0].datetime().map(|d| d.timestamp()),
            Some(1_700_000_000)
        );
    }
}
