//! Derivative positions as reported by an exchange connector.
//!
//! Exchanges populate position records inconsistently, so every figure is
//! optional. A position whose contract size is zero (or missing) is flat and
//! treated as closed.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::OrderSide;

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Order side that reduces a position of this direction.
    #[must_use]
    pub const fn closing_side(self) -> OrderSide {
        match self {
            Self::Long => OrderSide::Sell,
            Self::Short => OrderSide::Buy,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    #[serde(default)]
    pub side: Option<PositionSide>,
    /// Contract size; zero means flat.
    #[serde(default)]
    pub contracts: Option<Decimal>,
    #[serde(default)]
    pub entry_price: Option<Decimal>,
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    #[serde(default)]
    pub unrealized_pnl: Option<Decimal>,
    /// Unrealized P&L as a percentage of margin.
    #[serde(default)]
    pub percentage: Option<Decimal>,
    #[serde(default)]
    pub initial_margin: Option<Decimal>,
    #[serde(default)]
    pub maintenance_margin: Option<Decimal>,
    #[serde(default)]
    pub leverage: Option<Decimal>,
    #[serde(default)]
    pub liquidation_price: Option<Decimal>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Position {
    /// Contract size, with a missing value read as flat.
    #[must_use]
    pub fn size(&self) -> Decimal {
        self.contracts.unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.size().is_zero()
    }

    /// Direction of the position.
    ///
    /// Uses the reported side when present, otherwise the sign of the
    /// contract size. Flat positions have no direction.
    #[must_use]
    pub fn direction(&self) -> Option<PositionSide> {
        if !self.is_open() {
            return None;
        }
        self.side.or_else(|| {
            if self.size().is_sign_negative() {
                Some(PositionSide::Short)
            } else {
                Some(PositionSide::Long)
            }
        })
    }
}

/// Keep only positions with a nonzero contract size.
pub fn open_positions(positions: Vec<Position>) -> Vec<Position> {
    positions.into_iter().filter(Position::is_open).collect()
}
