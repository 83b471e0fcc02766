//! Factory modules for building infrastructure components.
//!
//! # Submodules
//!
//! - [`connector`] - Exchange connector and client construction

pub mod connector;

pub use connector::{build_connector, connect};
