//! Exchange connector port.
//!
//! The connector is the opaque boundary to the exchange: it owns
//! authentication, signing, rate limiting and the wire protocol. This crate
//! only issues unified calls through [`ExchangeConnector`] and reads back
//! domain records.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CancelReceipt, ExchangeInfo, Market, Order, OrderRequest, Position};

/// Failure reported by a connector.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// The request never produced a response (network, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The exchange answered and refused the request.
    #[error("{message} (status {status})")]
    Rejected { status: u16, message: String },

    /// The response did not match the expected record shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The referenced order or record does not exist.
    #[error("{0}")]
    Unknown(String),
}

pub type ConnectorResult<T> = std::result::Result<T, ConnectorError>;

/// Unified capability surface of a single exchange connection.
#[async_trait]
pub trait ExchangeConnector: Send + Sync {
    /// Identifier of the exchange this connector talks to.
    fn exchange_id(&self) -> &str;

    /// Identity and capability flags.
    async fn describe(&self) -> ConnectorResult<ExchangeInfo>;

    async fn create_order(&self, request: &OrderRequest) -> ConnectorResult<Order>;

    async fn cancel_order(&self, order_id: &str, symbol: &str) -> ConnectorResult<CancelReceipt>;

    async fn fetch_order(&self, order_id: &str, symbol: &str) -> ConnectorResult<Order>;

    async fn fetch_open_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>>;

    async fn fetch_closed_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>>;

    async fn fetch_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>>;

    /// Positions, optionally restricted to the given symbols.
    async fn fetch_positions(&self, symbols: Option<&[String]>) -> ConnectorResult<Vec<Position>>;

    async fn fetch_markets(&self) -> ConnectorResult<Vec<Market>>;
}
