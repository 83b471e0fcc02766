//! Exchange-agnostic records exchanged with the connector.
//!
//! None of these are owned by this crate: they are read from the exchange,
//! rendered, and dropped at the end of the command.

pub mod exchange;
pub mod market;
pub mod order;
pub mod position;

pub use exchange::ExchangeInfo;
pub use market::{Market, MarketFilter, MarketLimits, MarketType, MinMax};
pub use order::{CancelReceipt, Order, OrderRequest, OrderSide, OrderStatusFilter, OrderType};
pub use position::{open_positions, Position, PositionSide};
