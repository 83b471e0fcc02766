//! Scriptable [`ExchangeConnector`] for tests.
//!
//! Holds orders, positions and markets in memory, records every call, and
//! can be switched into a failing mode where each call is rejected.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    CancelReceipt, ExchangeInfo, Market, Order, OrderRequest, OrderType, Position,
};
use crate::port::{ConnectorError, ConnectorResult, ExchangeConnector};

/// A recorded connector call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Describe,
    CreateOrder(OrderRequest),
    CancelOrder { order_id: String, symbol: String },
    FetchOrder { order_id: String, symbol: String },
    FetchOpenOrders(Option<String>),
    FetchClosedOrders(Option<String>),
    FetchOrders(Option<String>),
    FetchPositions(Option<Vec<String>>),
    FetchMarkets,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    orders: Vec<Order>,
    next_id: u64,
}

/// In-memory connector with a call log.
#[derive(Default)]
pub struct MockConnector {
    state: Mutex<State>,
    positions: Vec<Position>,
    markets: Vec<Market>,
    info: ExchangeInfo,
    created: Option<Order>,
    failure: Option<String>,
}

impl MockConnector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            info: ExchangeInfo {
                name: "Mock".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        self.state.lock().orders = orders;
        self
    }

    #[must_use]
    pub fn with_positions(mut self, positions: Vec<Position>) -> Self {
        self.positions = positions;
        self
    }

    #[must_use]
    pub fn with_markets(mut self, markets: Vec<Market>) -> Self {
        self.markets = markets;
        self
    }

    #[must_use]
    pub fn with_info(mut self, info: ExchangeInfo) -> Self {
        self.info = info;
        self
    }

    /// Return `order` from every `create_order` call instead of echoing the request.
    #[must_use]
    pub fn with_created_order(mut self, order: Order) -> Self {
        self.created = Some(order);
        self
    }

    /// Reject every call with `message`.
    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// The most recent order submission, if any.
    pub fn last_order_request(&self) -> Option<OrderRequest> {
        self.state.lock().calls.iter().rev().find_map(|call| match call {
            Call::CreateOrder(request) => Some(request.clone()),
            _ => None,
        })
    }

    fn record(&self, call: Call) -> ConnectorResult<()> {
        self.state.lock().calls.push(call);
        match &self.failure {
            Some(message) => Err(ConnectorError::Rejected {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn orders_where(&self, symbol: Option<&str>, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        self.state
            .lock()
            .orders
            .iter()
            .filter(|o| symbol.map_or(true, |s| o.symbol == s))
            .filter(|o| keep(*o))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ExchangeConnector for MockConnector {
    fn exchange_id(&self) -> &str {
        "mock"
    }

    async fn describe(&self) -> ConnectorResult<ExchangeInfo> {
        self.record(Call::Describe)?;
        Ok(self.info.clone())
    }

    async fn create_order(&self, request: &OrderRequest) -> ConnectorResult<Order> {
        self.record(Call::CreateOrder(request.clone()))?;
        if let Some(order) = &self.created {
            return Ok(order.clone());
        }

        let mut state = self.state.lock();
        state.next_id += 1;
        let filled_now = request.order_type == OrderType::Market;
        let order = Order {
            id: format!("mock-{}", state.next_id),
            symbol: request.symbol.clone(),
            order_type: request.order_type,
            side: request.side,
            amount: request.amount,
            filled: Some(if filled_now {
                request.amount
            } else {
                Default::default()
            }),
            price: request.price,
            status: Some(if filled_now { "closed" } else { "open" }.to_string()),
            timestamp: Some(super::domain::ORDER_TIMESTAMP_MS),
            reduce_only: Some(request.reduce_only),
            extra: BTreeMap::new(),
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn cancel_order(&self, order_id: &str, symbol: &str) -> ConnectorResult<CancelReceipt> {
        self.record(Call::CancelOrder {
            order_id: order_id.to_string(),
            symbol: symbol.to_string(),
        })?;
        let mut state = self.state.lock();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.is_open())
            .ok_or_else(|| ConnectorError::Unknown(format!("order {order_id} not open")))?;
        order.status = Some("canceled".to_string());
        Ok(CancelReceipt {
            id: Some(order.id.clone()),
            symbol: Some(order.symbol.clone()),
            status: order.status.clone(),
            extra: BTreeMap::new(),
        })
    }

    async fn fetch_order(&self, order_id: &str, symbol: &str) -> ConnectorResult<Order> {
        self.record(Call::FetchOrder {
            order_id: order_id.to_string(),
            symbol: symbol.to_string(),
        })?;
        self.orders_where(Some(symbol), |o| o.id == order_id)
            .into_iter()
            .next()
            .ok_or_else(|| ConnectorError::Unknown(format!("order {order_id} not found")))
    }

    async fn fetch_open_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        self.record(Call::FetchOpenOrders(symbol.map(str::to_string)))?;
        Ok(self.orders_where(symbol, Order::is_open))
    }

    async fn fetch_closed_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        self.record(Call::FetchClosedOrders(symbol.map(str::to_string)))?;
        Ok(self.orders_where(symbol, |o| !o.is_open()))
    }

    async fn fetch_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        self.record(Call::FetchOrders(symbol.map(str::to_string)))?;
        Ok(self.orders_where(symbol, |_| true))
    }

    async fn fetch_positions(&self, symbols: Option<&[String]>) -> ConnectorResult<Vec<Position>> {
        self.record(Call::FetchPositions(symbols.map(<[String]>::to_vec)))?;
        Ok(self
            .positions
            .iter()
            .filter(|p| symbols.map_or(true, |s| s.contains(&p.symbol)))
            .cloned()
            .collect())
    }

    async fn fetch_markets(&self) -> ConnectorResult<Vec<Market>> {
        self.record(Call::FetchMarkets)?;
        Ok(self.markets.clone())
    }
}
