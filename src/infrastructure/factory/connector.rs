//! Connector factory.
//!
//! Maps the configured exchange id to a concrete
//! [`ExchangeConnector`](crate::port::ExchangeConnector) and wraps it in an
//! [`ExchangeClient`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::gateway::GatewayConnector;
use crate::adapter::outbound::paper::{PaperExchange, PAPER_EXCHANGE_ID};
use crate::application::client::ExchangeClient;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::ExchangeConnector;

/// Exchange ids routed through the gateway connector.
pub const GATEWAY_EXCHANGES: &[&str] = &[
    "hyperliquid",
    "binance",
    "binanceusdm",
    "bybit",
    "okx",
    "bitget",
    "kucoin",
    "gate",
    "mexc",
    "kraken",
    "krakenfutures",
    "coinbase",
    "deribit",
    "bitmex",
    "dydx",
];

/// Whether `exchange` names a connector this build can create.
#[must_use]
pub fn is_supported(exchange: &str) -> bool {
    exchange == PAPER_EXCHANGE_ID || GATEWAY_EXCHANGES.contains(&exchange)
}

/// Build the connector for the configured exchange.
///
/// # Errors
///
/// [`Error::InvalidInput`] for an exchange id no connector handles, any
/// configuration validation failure, or [`Error::Http`] when the HTTP client
/// cannot be built.
pub fn build_connector(config: &Config) -> Result<Arc<dyn ExchangeConnector>> {
    config.validate()?;
    let exchange = config.exchange_id();

    if exchange == PAPER_EXCHANGE_ID {
        info!("Using in-memory paper exchange");
        return Ok(Arc::new(PaperExchange::new()));
    }
    if !is_supported(&exchange) {
        return Err(Error::InvalidInput(format!(
            "Exchange '{exchange}' not supported"
        )));
    }

    info!(
        exchange = %exchange,
        gateway = %config.gateway.url,
        authenticated = config.credentials.is_authenticated(),
        "Using gateway connector"
    );
    Ok(Arc::new(GatewayConnector::from_config(config)?))
}

/// Build the client for the configured exchange.
pub fn connect(config: &Config) -> Result<ExchangeClient> {
    build_connector(config).map(ExchangeClient::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_and_gateway_exchanges_resolve() {
        let mut config = Config::default();
        assert_eq!(connect(&config).unwrap().exchange_id(), "hyperliquid");

        config.exchange = "PAPER".into();
        assert_eq!(connect(&config).unwrap().exchange_id(), "paper");
    }

    #[test]
    fn unknown_exchange_is_invalid_input() {
        let config = Config {
            exchange: "notanexchange".into(),
            ..Config::default()
        };
        match connect(&config) {
            Err(Error::InvalidInput(msg)) => {
                assert_eq!(msg, "Exchange 'notanexchange' not supported");
            }
            Err(other) => panic!("expected InvalidInput, got {other:?}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn invalid_config_is_reported_before_lookup() {
        let mut config = Config::default();
        config.gateway.url = "not a url".into();
        assert!(matches!(connect(&config), Err(Error::Config(_))));
    }
}
