//! Builders for domain records used across tests.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::{
    Market, MarketLimits, MarketType, MinMax, Order, OrderSide, OrderType, Position, PositionSide,
};

/// Fixed creation time used by built orders (2024-01-02 03:04:05 UTC).
pub const ORDER_TIMESTAMP_MS: i64 = 1_704_164_645_000;

/// Create an unfilled [`Order`]. Limit orders get a price of 100.
pub fn order(
    id: &str,
    symbol: &str,
    side: OrderSide,
    order_type: OrderType,
    amount: Decimal,
    status: &str,
) -> Order {
    Order {
        id: id.to_string(),
        symbol: symbol.to_string(),
        order_type,
        side,
        amount,
        filled: Some(Decimal::ZERO),
        price: (order_type == OrderType::Limit).then(|| Decimal::from(100)),
        status: Some(status.to_string()),
        timestamp: Some(ORDER_TIMESTAMP_MS),
        reduce_only: None,
        extra: BTreeMap::new(),
    }
}

/// Create a [`Position`] with only symbol, side and size populated.
pub fn position(symbol: &str, side: Option<PositionSide>, contracts: Decimal) -> Position {
    Position {
        symbol: symbol.to_string(),
        side,
        contracts: Some(contracts),
        entry_price: None,
        mark_price: None,
        unrealized_pnl: None,
        percentage: None,
        initial_margin: None,
        maintenance_margin: None,
        leverage: None,
        liquidation_price: None,
        extra: BTreeMap::new(),
    }
}

/// Create a [`Market`] from `BASE/QUOTE` style symbols.
pub fn market(symbol: &str, market_type: MarketType, active: bool) -> Market {
    let base = symbol.split('/').next().map(str::to_string);
    let quote = symbol
        .split('/')
        .nth(1)
        .map(|rest| rest.split(':').next().unwrap_or(rest).to_string());
    Market {
        symbol: symbol.to_string(),
        market_type: Some(market_type),
        base,
        quote,
        active: Some(active),
        limits: MarketLimits {
            amount: MinMax {
                min: Some(Decimal::new(1, 3)),
                max: None,
            },
            cost: MinMax {
                min: Some(Decimal::from(10)),
                max: None,
            },
        },
        extra: BTreeMap::new(),
    }
}
