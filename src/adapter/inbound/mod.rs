//! Inbound adapters: how operators drive the client.

pub mod cli;
