//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "warn".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Level after applying `-v` flags: one asks for info, two or more for
    /// debug. The flags never lower a more verbose configured level.
    ///
    /// A configured value that is not a plain level (a filter directive such
    /// as `dexcli=trace`) is kept as is without flags and replaced with them.
    #[must_use]
    pub fn effective_level(&self, verbosity: u8) -> &str {
        let (requested, rank) = match verbosity {
            0 => return self.level.as_str(),
            1 => ("info", 3),
            _ => ("debug", 4),
        };
        match level_rank(&self.level) {
            Some(configured) if configured >= rank => self.level.as_str(),
            _ => requested,
        }
    }

    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// Logs go to stderr; stdout carries command output only.
    pub fn init(&self, verbosity: u8) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.effective_level(verbosity)));

        match self.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

/// Verbosity order of a plain level name; higher is more verbose.
fn level_rank(level: &str) -> Option<u8> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Some(0),
        "error" => Some(1),
        "warn" => Some(2),
        "info" => Some(3),
        "debug" => Some(4),
        "trace" => Some(5),
        _ => None,
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}
