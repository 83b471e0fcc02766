//! Wire shapes for the gateway protocol.

use serde::{Deserialize, Serialize};

/// Connection options sent with every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionOptions {
    pub enable_rate_limit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_type: Option<String>,
}

/// Body of `POST /v1/{exchange}/{method}`.
#[derive(Debug, Serialize)]
pub struct CallRequest<'a> {
    pub options: &'a ConnectionOptions,
    pub args: serde_json::Value,
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message for a failed call.
    ///
    /// Falls back to the raw body, then to the status line.
    pub fn message_from(raw: &str, status: reqwest::StatusCode) -> String {
        let parsed: ErrorBody = serde_json::from_str(raw).unwrap_or_default();
        parsed
            .error
            .or(parsed.message)
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| status.to_string())
    }
}
