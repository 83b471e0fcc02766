//! Port definitions for the hexagonal boundary.

pub mod outbound;

pub use outbound::exchange::{ConnectorError, ConnectorResult, ExchangeConnector};
