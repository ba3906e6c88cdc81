//! Distribution regime and unlock timeline projection
//!
//! Pure functions over the current supply state and an optional emission
//! estimate. No I/O.

use crate::{
    constants::{ETA_HORIZON_YEARS, HIGH_DILUTION_RATIO},
    types::{SupplyState, Valuation},
};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// Dilution risk implied by the market cap / FDV ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DilutionRisk {
    /// Market cap is below half of the fully diluted valuation
    High,
    Low,
}

impl DilutionRisk {
    fn from_ratio(mcap_fdv_ratio: f64) -> Self {
        if mcap_fdv_ratio < HIGH_DILUTION_RATIO {
            Self::High
        } else {
            Self::Low
        }
    }
}

/// Supply still to be released for a capped coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedSupply {
    /// `max - circulating`
    pub locked: f64,
    pub locked_value_usd: f64,
    /// Share of the max supply already circulating, capped at 100
    pub progress_pct: f64,
    pub fdv_usd: f64,
    pub mcap_fdv_ratio: f64,
    pub dilution_risk: DilutionRisk,
    /// Projected month the cap is reached; `None` when unknown
    pub eta: Option<DateTime<Utc>>,
}

impl LockedSupply {
    /// ETA as a calendar month and year, e.g. `March 2046`
    pub fn eta_label(&self) -> Option<String> {
        self.eta.map(|eta| eta.format("%B %Y").to_string())
    }
}

/// How far a coin's supply has been distributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", rename_all = "snake_case")]
pub enum DistributionRegime {
    /// No hard cap. Stats are informational, measured against total supply
    /// when it is known.
    Uncapped {
        reference_supply: Option<f64>,
        non_circulating: Option<f64>,
        non_circulating_value_usd: Option<f64>,
        progress_pct: Option<f64>,
    },
    /// Circulating supply has reached the cap
    FullyDistributed,
    /// Part of the capped supply is still locked
    PartiallyLocked(LockedSupply),
}

impl DistributionRegime {
    pub fn is_uncapped(&self) -> bool {
        matches!(self, Self::Uncapped { .. })
    }

    pub fn locked_supply(&self) -> Option<&LockedSupply> {
        match self {
            Self::PartiallyLocked(locked) => Some(locked),
            _ => None,
        }
    }
}

/// Circulating versus not-yet-circulating share of the total supply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyBreakdown {
    pub circulating: f64,
    /// `total - circulating`, never negative
    pub locked: f64,
    /// Circulating share of the total, rounded to a whole percent
    pub circulating_pct: f64,
}

/// Splits the total supply into circulating and locked parts
///
/// Falls back to the circulating supply when the total is unknown.
/// Returns `None` when there is no supply to split.
pub fn supply_breakdown(state: &SupplyState) -> Option<SupplyBreakdown> {
    let effective_total = state
        .total
        .filter(|total| *total > 0.0)
        .unwrap_or(state.circulating);
    if effective_total <= 0.0 {
        return None;
    }

    Some(SupplyBreakdown {
        circulating: state.circulating,
        locked: (effective_total - state.circulating).max(0.0),
        circulating_pct: (state.circulating / effective_total * 100.0).round(),
    })
}

/// Classifies the distribution regime as of now
///
/// See [`project_unlocks_at`].
pub fn project_unlocks(
    state: &SupplyState,
    valuation: &Valuation,
    emission: Option<f64>,
) -> DistributionRegime {
    project_unlocks_at(state, valuation, emission, Utc::now())
}

/// Classifies the distribution regime relative to `now`
///
/// First matching rule wins:
/// 1. no max supply (absent or not positive) → `Uncapped`
/// 2. `max - circulating <= 0` → `FullyDistributed`
/// 3. otherwise → `PartiallyLocked`, with an ETA only when a positive
///    emission estimate puts the cap less than 100 years away
pub fn project_unlocks_at(
    state: &SupplyState,
    valuation: &Valuation,
    emission: Option<f64>,
    now: DateTime<Utc>,
) -> DistributionRegime {
    let max = match state.max {
        Some(max) if max > 0.0 => max,
        _ => return uncapped(state, valuation),
    };

    let remaining = max - state.circulating;
    if remaining <= 0.0 {
        return DistributionRegime::FullyDistributed;
    }

    let locked = remaining.max(0.0);
    let price = valuation.price_usd;

    let fdv_usd = match valuation.fully_diluted_valuation_usd {
        Some(fdv) if fdv > 0.0 => fdv,
        _ => max * price,
    };
    let mcap_fdv_ratio = if fdv_usd > 0.0 {
        valuation.market_cap_usd / fdv_usd
    } else {
        1.0
    };

    DistributionRegime::PartiallyLocked(LockedSupply {
        locked,
        locked_value_usd: locked * price,
        progress_pct: (state.circulating / max * 100.0).min(100.0),
        fdv_usd,
        mcap_fdv_ratio,
        dilution_risk: DilutionRisk::from_ratio(mcap_fdv_ratio),
        eta: project_eta(locked, emission, now),
    })
}

fn uncapped(state: &SupplyState, valuation: &Valuation) -> DistributionRegime {
    let reference_supply = state.total.filter(|total| *total > 0.0);
    let non_circulating = reference_supply.map(|total| (total - state.circulating).max(0.0));

    DistributionRegime::Uncapped {
        reference_supply,
        non_circulating,
        non_circulating_value_usd: non_circulating.map(|amount| amount * valuation.price_usd),
        progress_pct: reference_supply
            .map(|total| (state.circulating / total * 100.0).min(100.0)),
    }
}

/// `now + round(years_left * 12)` months, or `None` past the horizon
fn project_eta(locked: f64, emission: Option<f64>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let emission = emission.filter(|e| *e > 0.0)?;
    if locked <= 0.0 {
        return None;
    }

    let years_left = locked / emission;
    if years_left >= ETA_HORIZON_YEARS {
        return None;
    }

    let months = (years_left * 12.0).round() as u32;
    now.checked_add_months(Months::new(months))
}
