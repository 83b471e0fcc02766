//! Application services (use cases).

pub mod client;

pub use client::ExchangeClient;
