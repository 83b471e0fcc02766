//! Outbound ports: capabilities this crate consumes.

pub mod exchange;
