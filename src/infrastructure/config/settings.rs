//! Application configuration loading and validation.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables, then command-line flags. API credentials are
//! only ever read from the environment.
//!
//! # Example
//!
//! ```no_run
//! use dexcli::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::load("dexcli.toml")?;
//!     config.apply_env(|key| std::env::var(key).ok());
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable holding the exchange API key.
pub const ENV_API_KEY: &str = "DEXCLI_API_KEY";
/// Environment variable holding the exchange API secret.
pub const ENV_API_SECRET: &str = "DEXCLI_API_SECRET";
/// Environment variable overriding the exchange id.
pub const ENV_EXCHANGE: &str = "DEXCLI_EXCHANGE";
/// Environment variable overriding the gateway URL.
pub const ENV_GATEWAY_URL: &str = "DEXCLI_GATEWAY_URL";

/// Exchange used when nothing else is configured.
pub const DEFAULT_EXCHANGE: &str = "hyperliquid";

/// API credentials for the exchange connection.
///
/// Empty strings mean unauthenticated, public-only access.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &str| if s.is_empty() { "<empty>" } else { "<redacted>" };
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .finish()
    }
}

/// HTTP settings for the exchange gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL.
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:3000".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Exchange id, e.g. `hyperliquid` or `paper`.
    #[serde(default = "default_exchange")]
    pub exchange: String,

    /// Default market type requested from the connector.
    ///
    /// Hyperliquid defaults to perpetual swaps when unset.
    #[serde(default)]
    pub default_type: Option<String>,

    /// Ask the connector to throttle requests to the exchange's rate limit.
    #[serde(default = "default_true")]
    pub enable_rate_limit: bool,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Loaded from the environment, never from the config file.
    #[serde(skip)]
    pub credentials: Credentials,
}

fn default_exchange() -> String {
    DEFAULT_EXCHANGE.into()
}

const fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchange: default_exchange(),
            default_type: None,
            enable_rate_limit: true,
            gateway: GatewayConfig::default(),
            logging: LoggingConfig::default(),
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load the explicit file if given, else the default file if it exists,
    /// else built-in defaults.
    ///
    /// # Errors
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn resolve(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if default_path.is_file() => Self::load(default_path),
            None => Ok(Self::default()),
        }
    }

    /// Overlay environment values using `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.credentials = Credentials::new(
            lookup(ENV_API_KEY).unwrap_or_default(),
            lookup(ENV_API_SECRET).unwrap_or_default(),
        );
        if let Some(exchange) = lookup(ENV_EXCHANGE).filter(|v| !v.trim().is_empty()) {
            self.exchange = exchange;
        }
        if let Some(url) = lookup(ENV_GATEWAY_URL).filter(|v| !v.trim().is_empty()) {
            self.gateway.url = url;
        }
    }

    /// Apply a `--exchange` flag.
    pub fn override_exchange(&mut self, exchange: Option<String>) {
        if let Some(exchange) = exchange {
            self.exchange = exchange;
        }
    }

    /// Normalized exchange id.
    #[must_use]
    pub fn exchange_id(&self) -> String {
        self.exchange.trim().to_ascii_lowercase()
    }

    /// Default market type sent to the connector.
    #[must_use]
    pub fn effective_default_type(&self) -> Option<String> {
        self.default_type.clone().or_else(|| {
            (self.exchange_id() == DEFAULT_EXCHANGE).then(|| "swap".to_string())
        })
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first invalid or missing field.
    pub fn validate(&self) -> Result<()> {
        let exchange = self.exchange_id();
        if exchange.is_empty() {
            return Err(ConfigError::MissingField { field: "exchange" }.into());
        }
        if !exchange.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidValue {
                field: "exchange",
                reason: format!("'{exchange}' must be alphanumeric"),
            }
            .into());
        }

        if self.gateway.url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "gateway.url",
            }
            .into());
        }
        let url = url::Url::parse(&self.gateway.url).map_err(|e| ConfigError::InvalidValue {
            field: "gateway.url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "gateway.url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }
            .into());
        }
        if self.gateway.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gateway.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.gateway.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gateway.connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: "must be 'pretty' or 'json'".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_target_hyperliquid_swaps() {
        let config = Config::default();
        assert_eq!(config.exchange_id(), "hyperliquid");
        assert_eq!(config.effective_default_type().as_deref(), Some("swap"));
        assert!(config.enable_rate_limit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = Config::parse_toml(
            r#"
            exchange = "bybit"
            enable_rate_limit = false

            [gateway]
            url = "https://gateway.internal:8443"
            timeout_ms = 2500

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.exchange, "bybit");
        assert!(!config.enable_rate_limit);
        assert_eq!(config.gateway.timeout_ms, 2500);
        assert_eq!(config.gateway.connect_timeout_ms, 5_000);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.effective_default_type(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_credentials_default_to_empty() {
        let mut config = Config::default();
        config.apply_env(env(&[]));
        assert_eq!(config.credentials, Credentials::default());
        assert!(!config.credentials.is_authenticated());
    }

    #[test]
    fn env_supplies_credentials_and_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            (ENV_API_KEY, "key"),
            (ENV_API_SECRET, "secret"),
            (ENV_EXCHANGE, "okx"),
            (ENV_GATEWAY_URL, "http://10.0.0.2:3000"),
        ]));

        assert!(config.credentials.is_authenticated());
        assert_eq!(config.exchange, "okx");
        assert_eq!(config.gateway.url, "http://10.0.0.2:3000");

        config.override_exchange(Some("paper".into()));
        assert_eq!(config.exchange_id(), "paper");
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials::new("key-123", "");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("key-123"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("<empty>"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config {
            exchange: "bin ance".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "exchange",
                ..
            }))
        ));

        config.exchange = "binance".into();
        config.gateway.url = "ftp://example.com".into();
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "gateway.url",
                ..
            }))
        ));

        config.gateway.url = "http://localhost:3000".into();
        config.gateway.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_prefers_explicit_then_default_file() {
        let dir = std::env::temp_dir();
        let missing = dir.join("dexcli-settings-test-missing.toml");
        let config = Config::resolve(None, &missing).unwrap();
        assert_eq!(config, Config::default());

        assert!(matches!(
            Config::resolve(Some(&missing), &missing),
            Err(Error::Config(ConfigError::ReadFile(_)))
        ));
    }
}
