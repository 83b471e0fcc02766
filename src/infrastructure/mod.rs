//! Infrastructure: configuration and wiring.

pub mod config;
pub mod factory;
