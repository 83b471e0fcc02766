//! CLI module graph.

pub mod command;
pub mod dispatch;
pub mod output;
pub mod paths;
pub mod prompt;
pub mod render;

pub use command::{Cli, Commands};
pub use dispatch::Dispatcher;
