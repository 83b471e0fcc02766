//! Outbound adapters: exchange connector implementations.

pub mod gateway;
pub mod paper;

pub use gateway::GatewayConnector;
pub use paper::PaperExchange;
