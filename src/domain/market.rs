//! Tradable market descriptions.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of instrument a market trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Spot,
    /// Perpetual swap.
    Swap,
    Future,
    #[serde(other)]
    #[value(skip)]
    Other,
}

impl MarketType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Swap => "swap",
            Self::Future => "future",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower and upper bound of an order dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    #[serde(default)]
    pub min: Option<Decimal>,
    #[serde(default)]
    pub max: Option<Decimal>,
}

/// Order-size limits for a market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketLimits {
    #[serde(default)]
    pub amount: MinMax,
    #[serde(default)]
    pub cost: MinMax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub symbol: String,
    #[serde(default, rename = "type")]
    pub market_type: Option<MarketType>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    /// Missing means the exchange did not say; treated as active.
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub limits: MarketLimits,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Market {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    #[must_use]
    pub fn min_amount(&self) -> Option<Decimal> {
        self.limits.amount.min
    }

    #[must_use]
    pub fn min_cost(&self) -> Option<Decimal> {
        self.limits.cost.min
    }
}

/// Criteria for narrowing a market listing. Every set criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketFilter {
    pub active_only: bool,
    pub market_type: Option<MarketType>,
    pub quote: Option<String>,
}

impl MarketFilter {
    #[must_use]
    pub fn matches(&self, market: &Market) -> bool {
        if self.active_only && !market.is_active() {
            return false;
        }
        if let Some(kind) = self.market_type {
            if market.market_type != Some(kind) {
                return false;
            }
        }
        if let Some(quote) = &self.quote {
            if market.quote.as_deref() != Some(quote.as_str()) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, markets: Vec<Market>) -> Vec<Market> {
        markets.into_iter().filter(|m| self.matches(m)).collect()
    }
}
