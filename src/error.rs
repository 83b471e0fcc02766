use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Crate-wide error type.
///
/// The first three variants are the only kinds an [`ExchangeClient`] call can
/// produce; everything the connector reports is collapsed into
/// [`Error::ExchangeOperationFailed`] with the connector message kept as text.
///
/// [`ExchangeClient`]: crate::application::client::ExchangeClient
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied something the operation cannot accept.
    #[error("{0}")]
    InvalidInput(String),

    /// The requested record does not exist on the exchange.
    #[error("{0}")]
    NotFound(String),

    /// The exchange connector reported a failure.
    #[error("{0}")]
    ExchangeOperationFailed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_variants_display_bare_message() {
        let err = Error::InvalidInput("Price is required for limit orders".into());
        assert_eq!(err.to_string(), "Price is required for limit orders");

        let err = Error::ExchangeOperationFailed("Failed to fetch orders: timeout".into());
        assert_eq!(err.to_string(), "Failed to fetch orders: timeout");
    }

    #[test]
    fn config_error_is_transparent() {
        let err: Error = ConfigError::MissingField { field: "exchange" }.into();
        assert_eq!(err.to_string(), "missing required field: exchange");
    }

    #[test]
    fn http_client_errors_convert() {
        let source = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err: Error = source.into();
        assert!(matches!(err, Error::Http(_)));
        assert!(err.to_string().starts_with("HTTP error: "));
    }
}
