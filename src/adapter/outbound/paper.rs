//! In-memory paper exchange.
//!
//! Simulates an exchange for offline use: a fixed market list with reference
//! prices, market orders that fill immediately at the reference price,
//! limit orders that rest until cancelled, and net positions on derivative
//! markets. State lives only as long as the process.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    CancelReceipt, ExchangeInfo, Market, MarketLimits, MarketType, MinMax, Order, OrderRequest,
    OrderSide, OrderType, Position, PositionSide,
};
use crate::port::{ConnectorError, ConnectorResult, ExchangeConnector};

/// Exchange id that selects this connector.
pub const PAPER_EXCHANGE_ID: &str = "paper";

struct Listing {
    symbol: &'static str,
    market_type: MarketType,
    active: bool,
    reference_price: Decimal,
    min_amount: Decimal,
}

const fn listing(
    symbol: &'static str,
    market_type: MarketType,
    active: bool,
    reference_price: Decimal,
    min_amount: Decimal,
) -> Listing {
    Listing {
        symbol,
        market_type,
        active,
        reference_price,
        min_amount,
    }
}

const LISTINGS: &[Listing] = &[
    listing("BTC/USDC:USDC", MarketType::Swap, true, dec!(60000), dec!(0.0001)),
    listing("ETH/USDC:USDC", MarketType::Swap, true, dec!(3000), dec!(0.001)),
    listing("SOL/USDC:USDC", MarketType::Swap, true, dec!(150), dec!(0.01)),
    listing("DOGE/USDC:USDC", MarketType::Swap, false, dec!(0.15), dec!(1)),
    listing("BTC/USDT", MarketType::Spot, true, dec!(60000), dec!(0.0001)),
    listing("ETH/USDT", MarketType::Spot, true, dec!(3000), dec!(0.001)),
    listing("PURR/USDC", MarketType::Spot, true, dec!(0.2), dec!(1)),
];

const MIN_COST: Decimal = dec!(10);

/// Net holding in one derivative market. `contracts` is signed: negative is short.
#[derive(Debug, Clone, Copy)]
struct Holding {
    contracts: Decimal,
    entry_price: Decimal,
}

#[derive(Default)]
struct Book {
    orders: Vec<Order>,
    holdings: HashMap<String, Holding>,
}

/// Paper-trading connector.
#[derive(Default)]
pub struct PaperExchange {
    book: Mutex<Book>,
}

fn rejected(message: impl Into<String>) -> ConnectorError {
    ConnectorError::Rejected {
        status: 400,
        message: message.into(),
    }
}

fn listing_for(symbol: &str) -> ConnectorResult<&'static Listing> {
    LISTINGS
        .iter()
        .find(|l| l.symbol == symbol)
        .ok_or_else(|| rejected(format!("paper: unknown market {symbol}")))
}

fn signed(side: OrderSide, amount: Decimal) -> Decimal {
    match side {
        OrderSide::Buy => amount,
        OrderSide::Sell => -amount,
    }
}

impl PaperExchange {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(request: &OrderRequest, listing: &Listing) -> ConnectorResult<()> {
        if !listing.active {
            return Err(rejected(format!("paper: market {} is inactive", listing.symbol)));
        }
        if request.amount < listing.min_amount {
            return Err(rejected(format!(
                "paper: amount {} below minimum {}",
                request.amount, listing.min_amount
            )));
        }
        if request.order_type == OrderType::Limit && request.price.is_none() {
            return Err(rejected("paper: limit order requires a price"));
        }
        Ok(())
    }

    /// Apply a fill to the net holding, keeping a volume-weighted entry price
    /// while the position grows.
    fn apply_fill(book: &mut Book, symbol: &str, delta: Decimal, price: Decimal) {
        let holding = book.holdings.entry(symbol.to_string()).or_insert(Holding {
            contracts: Decimal::ZERO,
            entry_price: price,
        });

        let before = holding.contracts;
        let after = before + delta;
        let grows = before.is_zero() || before.is_sign_negative() == delta.is_sign_negative();
        if grows {
            let notional = before.abs() * holding.entry_price + delta.abs() * price;
            holding.entry_price = notional / after.abs();
        } else if !after.is_zero() && after.is_sign_negative() != before.is_sign_negative() {
            holding.entry_price = price;
        }
        holding.contracts = after;

        if after.is_zero() {
            book.holdings.remove(symbol);
        }
    }

    fn position_record(symbol: &str, holding: &Holding, mark: Decimal) -> Position {
        let size = holding.contracts.abs();
        let pnl = (mark - holding.entry_price) * holding.contracts;
        let margin = size * holding.entry_price;
        let percentage = if margin.is_zero() {
            Decimal::ZERO
        } else {
            (pnl / margin * Decimal::ONE_HUNDRED).round_dp(4)
        };
        Position {
            symbol: symbol.to_string(),
            side: Some(if holding.contracts.is_sign_negative() {
                PositionSide::Short
            } else {
                PositionSide::Long
            }),
            contracts: Some(size),
            entry_price: Some(holding.entry_price),
            mark_price: Some(mark),
            unrealized_pnl: Some(pnl),
            percentage: Some(percentage),
            initial_margin: Some(margin),
            maintenance_margin: None,
            leverage: Some(Decimal::ONE),
            liquidation_price: None,
            extra: BTreeMap::new(),
        }
    }

    fn orders_where(&self, symbol: Option<&str>, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        self.book
            .lock()
            .orders
            .iter()
            .filter(|o| symbol.map_or(true, |s| o.symbol == s) && keep(*o))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ExchangeConnector for PaperExchange {
    fn exchange_id(&self) -> &str {
        PAPER_EXCHANGE_ID
    }

    async fn describe(&self) -> ConnectorResult<ExchangeInfo> {
        let supported = [
            "publicAPI",
            "privateAPI",
            "createOrder",
            "cancelOrder",
            "fetchOrder",
            "fetchOrders",
            "fetchOpenOrders",
            "fetchClosedOrders",
            "fetchPositions",
            "fetchMarkets",
        ];
        let unsupported = [
            "CORS",
            "fetchTicker",
            "fetchTickers",
            "fetchOrderBook",
            "fetchTrades",
            "fetchOHLCV",
            "fetchBalance",
        ];
        let has = supported
            .iter()
            .map(|k| ((*k).to_string(), true))
            .chain(unsupported.iter().map(|k| ((*k).to_string(), false)))
            .collect();

        Ok(ExchangeInfo {
            name: "Paper".into(),
            version: Some(env!("CARGO_PKG_VERSION").into()),
            rate_limit_enabled: false,
            has,
        })
    }

    async fn create_order(&self, request: &OrderRequest) -> ConnectorResult<Order> {
        let listing = listing_for(&request.symbol)?;
        Self::validate(request, listing)?;

        let mut book = self.book.lock();
        let delta = signed(request.side, request.amount);
        let derivative = listing.market_type != MarketType::Spot;

        if request.reduce_only {
            let current = book
                .holdings
                .get(listing.symbol)
                .map_or(Decimal::ZERO, |h| h.contracts);
            let reduces = !current.is_zero()
                && current.is_sign_negative() != delta.is_sign_negative()
                && delta.abs() <= current.abs();
            if !derivative || !reduces {
                return Err(rejected("paper: reduce-only order would increase position"));
            }
        }

        let fills_now = request.order_type == OrderType::Market;
        let fill_price = request.price.unwrap_or(listing.reference_price);
        let order = Order {
            id: Uuid::new_v4().simple().to_string(),
            symbol: listing.symbol.to_string(),
            order_type: request.order_type,
            side: request.side,
            amount: request.amount,
            filled: Some(if fills_now { request.amount } else { Decimal::ZERO }),
            price: Some(if fills_now {
                listing.reference_price
            } else {
                fill_price
            }),
            status: Some(if fills_now { "closed" } else { "open" }.to_string()),
            timestamp: Some(Utc::now().timestamp_millis()),
            reduce_only: Some(request.reduce_only),
            extra: BTreeMap::new(),
        };

        if fills_now && derivative {
            Self::apply_fill(&mut book, listing.symbol, delta, listing.reference_price);
        }
        debug!(order_id = %order.id, status = ?order.status, "Paper order accepted");
        book.orders.push(order.clone());
        Ok(order)
    }

    async fn cancel_order(&self, order_id: &str, symbol: &str) -> ConnectorResult<CancelReceipt> {
        let mut book = self.book.lock();
        let order = book
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.symbol == symbol)
            .ok_or_else(|| ConnectorError::Unknown(format!("Order {order_id} not found")))?;
        if !order.is_open() {
            return Err(rejected(format!(
                "paper: order {order_id} is {} and cannot be cancelled",
                order.status.as_deref().unwrap_or("unknown")
            )));
        }
        order.status = Some("canceled".to_string());

        Ok(CancelReceipt {
            id: Some(order.id.clone()),
            symbol: Some(order.symbol.clone()),
            status: order.status.clone(),
            extra: BTreeMap::new(),
        })
    }

    async fn fetch_order(&self, order_id: &str, symbol: &str) -> ConnectorResult<Order> {
        self.orders_where(Some(symbol), |o| o.id == order_id)
            .into_iter()
            .next()
            .ok_or_else(|| ConnectorError::Unknown(format!("Order {order_id} not found")))
    }

    async fn fetch_open_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        Ok(self.orders_where(symbol, Order::is_open))
    }

    async fn fetch_closed_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        Ok(self.orders_where(symbol, |o| !o.is_open()))
    }

    async fn fetch_orders(&self, symbol: Option<&str>) -> ConnectorResult<Vec<Order>> {
        Ok(self.orders_where(symbol, |_| true))
    }

    async fn fetch_positions(&self, symbols: Option<&[String]>) -> ConnectorResult<Vec<Position>> {
        let book = self.book.lock();
        let mut positions: Vec<Position> = book
            .holdings
            .iter()
            .filter(|(symbol, _)| symbols.map_or(true, |s| s.contains(*symbol)))
            .filter_map(|(symbol, holding)| {
                let mark = listing_for(symbol).ok()?.reference_price;
                Some(Self::position_record(symbol, holding, mark))
            })
            .collect();
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(positions)
    }

    async fn fetch_markets(&self) -> ConnectorResult<Vec<Market>> {
        Ok(LISTINGS
            .iter()
            .map(|l| {
                let (base, quote) = l.symbol.split_once('/').unwrap_or((l.symbol, ""));
                let quote = quote.split(':').next().unwrap_or(quote);
                Market {
                    symbol: l.symbol.to_string(),
                    market_type: Some(l.market_type),
                    base: Some(base.to_string()),
                    quote: Some(quote.to_string()),
                    active: Some(l.active),
                    limits: MarketLimits {
                        amount: MinMax {
                            min: Some(l.min_amount),
                            max: None,
                        },
                        cost: MinMax {
                            min: Some(MIN_COST),
                            max: None,
                        },
                    },
                    extra: BTreeMap::new(),
                }
            })
            .collect())
    }
}
