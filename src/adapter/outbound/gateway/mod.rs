//! Gateway connector: unified exchange calls over HTTP.

pub mod client;
pub mod dto;

pub use client::GatewayConnector;
