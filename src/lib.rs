//! dexcli - command-line trading on cryptocurrency exchanges.
//!
//! Each subcommand is a thin pass-through to one operation on an exchange
//! connector, with the result rendered as a table or as JSON.
//!
//! # Architecture
//!
//! - [`domain`] - Unified records: orders, positions, markets, exchange info
//! - [`port`] - The [`ExchangeConnector`](port::ExchangeConnector) boundary
//! - [`application`] - [`ExchangeClient`](application::ExchangeClient), the
//!   single choke point that validates input and labels failures
//! - [`adapter`] - CLI front-end plus the gateway and paper connectors
//! - [`infrastructure`] - Configuration, logging and connector wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Scriptable mock connector and record builders for tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
