//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`connector`]: `MockConnector`, an in-memory
//!   [`ExchangeConnector`](crate::port::ExchangeConnector) with a call log.
//! - [`domain`]: Builders for orders, positions and markets.

pub mod connector;
pub mod domain;
