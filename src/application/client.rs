//! The single choke point between commands and the exchange connector.
//!
//! Every method is one stateless pass-through (two for
//! [`ExchangeClient::close_position`]) and every connector failure comes back
//! as [`Error::ExchangeOperationFailed`] with the connector's message kept.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::{
    CancelReceipt, ExchangeInfo, Market, Order, OrderRequest, OrderSide, OrderStatusFilter,
    OrderType, Position,
};
use crate::error::{Error, Result};
use crate::port::{ConnectorError, ExchangeConnector};

/// Wrap a connector failure with the operation that triggered it.
fn failed(operation: &'static str) -> impl FnOnce(ConnectorError) -> Error {
    move |err| Error::ExchangeOperationFailed(format!("Failed to {operation}: {err}"))
}

/// Client for one exchange connection, held for the life of the process.
#[derive(Clone)]
pub struct ExchangeClient {
    connector: Arc<dyn ExchangeConnector>,
}

impl ExchangeClient {
    #[must_use]
    pub fn new(connector: Arc<dyn ExchangeConnector>) -> Self {
        Self { connector }
    }

    /// Identifier of the connected exchange.
    #[must_use]
    pub fn exchange_id(&self) -> &str {
        self.connector.exchange_id()
    }

    /// Exchange identity and capability flags.
    pub async fn describe(&self) -> Result<ExchangeInfo> {
        debug!(exchange = self.exchange_id(), "Describing exchange");
        self.connector
            .describe()
            .await
            .map_err(failed("describe exchange"))
    }

    /// Place a new order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when `amount` or `price` is not positive or a
    /// limit order has no price; the connector is not called in that case.
    pub async fn create_order(
        &self,
        symbol: &str,
        side: OrderSide,
        order_type: OrderType,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> Result<Order> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidInput(format!(
                "Amount must be positive, got {amount}"
            )));
        }
        if let Some(price) = price.filter(|p| *p <= Decimal::ZERO) {
            return Err(Error::InvalidInput(format!(
                "Price must be positive, got {price}"
            )));
        }
        if order_type == OrderType::Limit && price.is_none() {
            return Err(Error::InvalidInput(
                "Price is required for limit orders".into(),
            ));
        }

        let request = OrderRequest {
            symbol: symbol.to_string(),
            side,
            order_type,
            amount,
            price,
            reduce_only: false,
        };
        self.submit(&request, "create order").await
    }

    async fn submit(&self, request: &OrderRequest, operation: &'static str) -> Result<Order> {
        debug!(
            symbol = %request.symbol,
            side = %request.side,
            order_type = %request.order_type,
            amount = %request.amount,
            reduce_only = request.reduce_only,
            "Submitting order"
        );
        let order = self
            .connector
            .create_order(request)
            .await
            .map_err(failed(operation))?;
        info!(order_id = %order.id, status = ?order.status, "Order submitted");
        Ok(order)
    }

    /// Cancel an open order.
    pub async fn cancel_order(&self, order_id: &str, symbol: &str) -> Result<CancelReceipt> {
        debug!(order_id, symbol, "Cancelling order");
        let receipt = self
            .connector
            .cancel_order(order_id, symbol)
            .await
            .map_err(failed("cancel order"))?;
        info!(order_id, symbol, "Order cancelled");
        Ok(receipt)
    }

    /// Current state of one order.
    pub async fn get_order_status(&self, order_id: &str, symbol: &str) -> Result<Order> {
        debug!(order_id, symbol, "Fetching order");
        self.connector
            .fetch_order(order_id, symbol)
            .await
            .map_err(failed("fetch order status"))
    }

    /// Orders in the given state, optionally for one symbol.
    pub async fn list_orders(
        &self,
        symbol: Option<&str>,
        status: OrderStatusFilter,
    ) -> Result<Vec<Order>> {
        debug!(?symbol, ?status, "Listing orders");
        let result = match status {
            OrderStatusFilter::Open => self.connector.fetch_open_orders(symbol).await,
            OrderStatusFilter::Closed => self.connector.fetch_closed_orders(symbol).await,
            OrderStatusFilter::All => self.connector.fetch_orders(symbol).await,
        };
        result.map_err(failed("fetch orders"))
    }

    /// All positions as reported, flat ones included.
    pub async fn get_positions(&self) -> Result<Vec<Position>> {
        debug!("Fetching positions");
        self.connector
            .fetch_positions(None)
            .await
            .map_err(failed("fetch positions"))
    }

    /// Close the open position in `symbol` with an offsetting market order.
    ///
    /// The order takes the opposite side of the position for the absolute
    /// contract size and carries the `reduce_only` flag.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when there is no nonzero position in `symbol`.
    pub async fn close_position(&self, symbol: &str, reduce_only: bool) -> Result<Order> {
        let symbols = [symbol.to_string()];
        let positions = self
            .connector
            .fetch_positions(Some(&symbols))
            .await
            .map_err(failed("close position"))?;

        let (position, direction) = positions
            .iter()
            .filter(|p| p.symbol == symbol)
            .find_map(|p| p.direction().map(|d| (p, d)))
            .ok_or_else(|| Error::NotFound(format!("No open position found for {symbol}")))?;

        let request = OrderRequest {
            symbol: symbol.to_string(),
            side: direction.closing_side(),
            order_type: OrderType::Market,
            amount: position.size().abs(),
            price: None,
            reduce_only,
        };
        info!(
            symbol,
            direction = %direction,
            amount = %request.amount,
            "Closing position"
        );
        self.submit(&request, "close position").await
    }

    /// Open orders for one symbol.
    pub async fn get_open_orders(&self, symbol: &str) -> Result<Vec<Order>> {
        debug!(symbol, "Fetching open orders");
        self.connector
            .fetch_open_orders(Some(symbol))
            .await
            .map_err(failed("fetch open orders"))
    }

    /// Every market the exchange lists.
    pub async fn list_markets(&self) -> Result<Vec<Market>> {
        debug!("Fetching markets");
        self.connector
            .fetch_markets()
            .await
            .map_err(failed("fetch markets"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PositionSide;
    use crate::testkit::connector::{Call, MockConnector};
    use crate::testkit::domain::{order, position};
    use rust_decimal_macros::dec;

    fn client(mock: &Arc<MockConnector>) -> ExchangeClient {
        ExchangeClient::new(mock.clone())
    }

    #[tokio::test]
    async fn limit_order_without_price_never_reaches_connector() {
        let mock = Arc::new(MockConnector::new());
        let result = client(&mock)
            .create_order("BTC/USDT", OrderSide::Buy, OrderType::Limit, dec!(0.01), None)
            .await;

        match result {
            Err(Error::InvalidInput(msg)) => {
                assert_eq!(msg, "Price is required for limit orders");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected_locally() {
        let mock = Arc::new(MockConnector::new());
        let result = client(&mock)
            .create_order("BTC/USDT", OrderSide::Sell, OrderType::Market, dec!(0), None)
            .await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn market_order_is_forwarded_without_reduce_only() {
        let mock = Arc::new(MockConnector::new());
        let created = client(&mock)
            .create_order("BTC/USDT", OrderSide::Buy, OrderType::Market, dec!(0.01), None)
            .await
            .unwrap();

        assert_eq!(created.symbol, "BTC/USDT");
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::CreateOrder(request) => {
                assert_eq!(request.order_type, OrderType::Market);
                assert_eq!(request.amount, dec!(0.01));
                assert!(!request.reduce_only);
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_orders_selects_fetch_variant_by_status() {
        let mock = Arc::new(MockConnector::new());
        let client = client(&mock);

        client.list_orders(None, OrderStatusFilter::Open).await.unwrap();
        client
            .list_orders(Some("ETH/USDT"), OrderStatusFilter::Closed)
            .await
            .unwrap();
        client.list_orders(None, OrderStatusFilter::All).await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                Call::FetchOpenOrders(None),
                Call::FetchClosedOrders(Some("ETH/USDT".into())),
                Call::FetchOrders(None),
            ]
        );
    }

    #[tokio::test]
    async fn closing_long_submits_reduce_only_sell() {
        let mock = Arc::new(
            MockConnector::new().with_positions(vec![position(
                "BTC/USDC:USDC",
                Some(PositionSide::Long),
                dec!(0.3),
            )]),
        );

        client(&mock)
            .close_position("BTC/USDC:USDC", true)
            .await
            .unwrap();

        let request = mock.last_order_request().expect("order submitted");
        assert_eq!(request.side, OrderSide::Sell);
        assert_eq!(request.order_type, OrderType::Market);
        assert_eq!(request.amount, dec!(0.3));
        assert!(request.reduce_only);
    }

    #[tokio::test]
    async fn closing_short_submits_buy_for_absolute_size() {
        let mock = Arc::new(
            MockConnector::new().with_positions(vec![position(
                "ETH/USDC:USDC",
                Some(PositionSide::Short),
                dec!(-2.5),
            )]),
        );

        client(&mock)
            .close_position("ETH/USDC:USDC", true)
            .await
            .unwrap();

        let request = mock.last_order_request().expect("order submitted");
        assert_eq!(request.side, OrderSide::Buy);
        assert_eq!(request.amount, dec!(2.5));
    }

    #[tokio::test]
    async fn reduce_only_can_be_overridden() {
        let mock = Arc::new(
            MockConnector::new().with_positions(vec![position(
                "SOL/USDC:USDC",
                None,
                dec!(-4),
            )]),
        );

        client(&mock)
            .close_position("SOL/USDC:USDC", false)
            .await
            .unwrap();

        let request = mock.last_order_request().expect("order submitted");
        assert_eq!(request.side, OrderSide::Buy);
        assert!(!request.reduce_only);
    }

    #[tokio::test]
    async fn closing_flat_or_missing_position_is_not_found() {
        let mock = Arc::new(
            MockConnector::new().with_positions(vec![position(
                "BTC/USDC:USDC",
                Some(PositionSide::Long),
                dec!(0),
            )]),
        );
        let client = client(&mock);

        for symbol in ["BTC/USDC:USDC", "ETH/USDT"] {
            match client.close_position(symbol, true).await {
                Err(Error::NotFound(msg)) => {
                    assert_eq!(msg, format!("No open position found for {symbol}"));
                }
                other => panic!("expected NotFound, got {other:?}"),
            }
        }
        assert!(mock.last_order_request().is_none());
    }

    #[tokio::test]
    async fn connector_failures_become_operation_failed() {
        let mock = Arc::new(MockConnector::new().failing("invalid api key"));
        let client = client(&mock);

        let err = client.get_positions().await.unwrap_err();
        match err {
            Error::ExchangeOperationFailed(msg) => {
                assert!(msg.starts_with("Failed to fetch positions:"), "{msg}");
                assert!(msg.contains("invalid api key"), "{msg}");
            }
            other => panic!("expected ExchangeOperationFailed, got {other:?}"),
        }

        let err = client.cancel_order("1", "BTC/USDT").await.unwrap_err();
        assert!(matches!(err, Error::ExchangeOperationFailed(_)));
    }

    #[tokio::test]
    async fn order_lifecycle_open_to_canceled() {
        let mock = Arc::new(MockConnector::new().with_orders(vec![order(
            "abc123",
            "BTC/USDT",
            OrderSide::Buy,
            OrderType::Limit,
            dec!(0.01),
            "open",
        )]));
        let client = client(&mock);

        let open = client
            .list_orders(None, OrderStatusFilter::Open)
            .await
            .unwrap();
        assert_eq!(open.len(), 1);

        let id = open[0].id.clone();
        client.cancel_order(&id, "BTC/USDT").await.unwrap();

        let status = client.get_order_status(&id, "BTC/USDT").await.unwrap();
        assert_eq!(status.status.as_deref(), Some("canceled"));
        assert!(client
            .list_orders(None, OrderStatusFilter::Open)
            .await
            .unwrap()
            .is_empty());
    }
}
