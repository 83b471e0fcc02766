//! Order records as reported by an exchange connector.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order.
    Buy,
    /// Sell order.
    Sell,
}

impl OrderSide {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Fill immediately at the best available price.
    Market,
    /// Rest on the book at a fixed price.
    #[default]
    Limit,
    /// Exchange-specific type such as `stop_market`; never sent.
    #[serde(other)]
    #[value(skip)]
    Other,
}

impl OrderType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which subset of orders a listing should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderStatusFilter {
    #[default]
    Open,
    Closed,
    All,
}

/// Request to place an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub amount: Decimal,
    /// Limit price; ignored by the exchange for market orders.
    pub price: Option<Decimal>,
    /// Only reduce an existing position, never open or flip one.
    pub reduce_only: bool,
}

/// An order as reported by the exchange.
///
/// `status` is exchange-defined (`open`, `closed`, `canceled`, ...) and kept
/// as text; some exchanges leave it or `filled` null on a fresh order.
/// Fields this type does not model are retained in `extra` so the JSON
/// rendering shows the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    pub amount: Decimal,
    #[serde(default)]
    pub filled: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Order {
    /// Filled amount, with a missing value read as nothing filled.
    #[must_use]
    pub fn filled_amount(&self) -> Decimal {
        self.filled.unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.as_deref() == Some("open")
    }
}

/// Acknowledgement returned when an order is cancelled.
///
/// Several exchanges answer a cancel with little more than the raw payload,
/// so every modelled field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn order_deserializes_unified_shape_and_keeps_unknown_fields() {
        let raw = json!({
            "id": "0x1a2b",
            "symbol": "BTC/USDC:USDC",
            "type": "limit",
            "side": "buy",
            "amount": 0.5,
            "filled": 0.1,
            "price": 60000,
            "status": "open",
            "timestamp": 1_700_000_000_000_i64,
            "clientOrderId": "cli-7",
        });

        let order: Order = serde_json::from_value(raw).unwrap();
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.amount, dec!(0.5));
        assert_eq!(order.filled_amount(), dec!(0.1));
        assert_eq!(order.price, Some(dec!(60000)));
        assert_eq!(order.extra.get("clientOrderId"), Some(&json!("cli-7")));
        assert!(order.is_open());
    }

    #[test]
    fn order_tolerates_missing_optional_fields() {
        let raw = json!({
            "id": "abc123",
            "symbol": "BTC/USDT",
            "type": "market",
            "side": "sell",
            "amount": "0.01",
            "status": "closed",
            "filled": null,
            "price": null,
        });

        let order: Order = serde_json::from_value(raw).unwrap();
        assert_eq!(order.filled, None);
        assert_eq!(order.filled_amount(), Decimal::ZERO);
        assert_eq!(order.price, None);
        assert_eq!(order.timestamp, None);
    }

    #[test]
    fn unknown_order_type_does_not_fail_listing() {
        let raw = r#"[
            {"id":"1","symbol":"BTC/USDT","type":"limit","side":"buy","amount":1,"status":"open"},
            {"id":"2","symbol":"BTC/USDT","type":"stop_market","side":"sell","amount":1,"status":"open"}
        ]"#;

        let orders: Vec<Order> = serde_json::from_str(raw).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].order_type, OrderType::Other);
        assert_eq!(orders[1].order_type.to_string(), "other");
    }

    #[test]
    fn null_status_is_accepted() {
        let raw = r#"{"id":"abc123","symbol":"BTC/USDT","type":"market","side":"buy","amount":0.01,"status":null}"#;

        let order: Order = serde_json::from_str(raw).unwrap();
        assert_eq!(order.status, None);
        assert!(!order.is_open());
    }

    #[test]
    fn cancel_receipt_with_null_id_keeps_raw_fields() {
        let raw = r#"{"id":null,"info":{"status":"ok","response":{"type":"cancel"}}}"#;

        let receipt: CancelReceipt = serde_json::from_str(raw).unwrap();
        assert_eq!(receipt.id, None);
        assert_eq!(receipt.extra["info"]["status"], "ok");
    }

    #[test]
    fn json_output_keeps_numbers_as_numbers() {
        let raw = r#"{"id":"abc123","symbol":"BTC/USDT","type":"limit","side":"buy","amount":0.01,"filled":null,"price":60000.5,"status":"open"}"#;

        let order: Order = serde_json::from_str(raw).unwrap();
        let printed = serde_json::to_string(&order).unwrap();

        assert!(printed.contains(r#""amount":0.01"#), "{printed}");
        assert!(printed.contains(r#""filled":null"#), "{printed}");
        assert!(printed.contains(r#""price":60000.5"#), "{printed}");
        assert!(!printed.contains("timestamp"), "{printed}");

        let value: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert!(value["amount"].is_number());
        assert_eq!(value["amount"].as_f64(), Some(0.01));
    }
}
