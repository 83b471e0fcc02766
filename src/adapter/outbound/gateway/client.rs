//! HTTP connector for a unified exchange gateway.
//!
//! Each connector call is one `POST {base}/v1/{exchange}/{method}` carrying
//! the connection options and named arguments as JSON. The gateway performs
//! authentication, signing and rate limiting against the real exchange;
//! credentials travel in the `X-Api-Key` and `X-Api-Secret` headers and are
//! left out entirely in public-only mode.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use super::dto::{CallRequest, ConnectionOptions, ErrorBody};
use crate::domain::{CancelReceipt, ExchangeInfo, Market, Order, OrderRequest, Position};
use crate::error::Result;
use crate::infrastructure::config::{Config, Credentials};
use crate::port::{ConnectorError, ConnectorResult, ExchangeConnector};

const API_KEY_HEADER: &str = "X-Api-Key";
const API_SECRET_HEADER: &str = "X-Api-Secret";

/// Connector that forwards unified calls to the gateway over HTTP.
pub struct GatewayConnector {
    http: HttpClient,
    base_url: String,
    exchange: String,
    credentials: Credentials,
    options: ConnectionOptions,
}

impl GatewayConnector {
    /// Create a connector with default HTTP settings and no credentials.
    #[must_use]
    pub fn new(exchange: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into(),
            exchange: exchange.into(),
            credentials: Credentials::default(),
            options: ConnectionOptions {
                enable_rate_limit: true,
                default_type: None,
            },
        }
    }

    /// Create a connector with the configured gateway, timeouts and options.
    ///
    /// # Errors
    ///
    /// [`Error::Http`](crate::error::Error::Http) if the HTTP client cannot
    /// be built (for example, no TLS backend is available).
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.gateway.timeout_ms))
            .connect_timeout(Duration::from_millis(config.gateway.connect_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.gateway.url.clone(),
            exchange: config.exchange_id(),
            credentials: config.credentials.clone(),
            options: ConnectionOptions {
                enable_rate_limit: config.enable_rate_limit,
                default_type: config.effective_default_type(),
            },
        })
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.exchange,
            method
        )
    }

    async fn call<T>(&self, method: &'static str, args: Value) -> ConnectorResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(method);
        debug!(url = %url, method, "Calling gateway");

        let body = CallRequest {
            options: &self.options,
            args,
        };
        let mut request = self.http.post(&url).json(&body);
        if !self.credentials.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.credentials.api_key);
        }
        if !self.credentials.api_secret.is_empty() {
            request = request.header(API_SECRET_HEADER, &self.credentials.api_secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConnectorError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConnectorError::Transport(e.to_string()))?;

        if !status.is_success() {
            let raw = String::from_utf8_lossy(&bytes);
            let message = ErrorBody::message_from(&raw, status);
            debug!(status = status.as_u16(), %message, "Gateway rejected call");
            return Err(ConnectorError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ConnectorError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ExchangeConnector for GatewayConnector {
    fn exchange_id(&self) -> &str {
        &self.exchange
    }

    async fn describe(&self) -> ConnectorResult<ExchangeInfo> {
        let mut info: ExchangeInfo = self.call("describe", json!({})).await?;
        info.rate_limit_enabled = self.options.enable_rate_limit;
        Ok(info)
    }

    async fn create_order(&self, request: &OrderRequest) -> ConnectorResult<Order> {
        let mut args = json!({
            "symbol": request.symbol,
            "type": request.order_type,
            "side": request.side,
            "amount": request.amount,
            "price": request.price,
        });
        if request.reduce_only {
            args["params"] = json!({ "reduceOnly": true });
        }
        self.call("createOrder", args).await
    }

    async fn cancel_order(&self, order_id: &str, symbol: &str) -> ConnectorResult<CancelReceipt> {
        self.call("cancelOrder", json!({ "id": order_id, "symbol": symbol }))
            .await
    }

    async fn fetch_order(&self, order_id: &str, symbol: &str) -> ConnectorResult<Order> {
        self.call("fetchOrder", json!({ "id": order_id, "symbol": symbol }))
            .await
    }

    async fn fetch_open_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        self.call("fetchOpenOrders", json!({ "symbol": symbol }))
            .await
    }

    async fn fetch_closed_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        self.call("fetchClosedOrders", json!({ "symbol": symbol }))
            .await
    }

    async fn fetch_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        self.call("fetchOrders", json!({ "symbol": symbol })).await
    }

    async fn fetch_positions(&self, symbols: Option<&[String]>) -> ConnectorResult<Vec<Position>> {
        self.call("fetchPositions", json!({ "symbols": symbols }))
            .await
    }

    async fn fetch_markets(&self) -> ConnectorResult<Vec<Market>> {
        self.call("fetchMarkets", json!({})).await
    }
}
