//! Exchange identity and capability flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Capability flags as reported by the connector.
///
/// `has` is keyed by unified method name (`fetchTicker`, `createOrder`, ...)
/// plus the API surface flags `CORS`, `publicAPI` and `privateAPI`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, rename = "enableRateLimit")]
    pub rate_limit_enabled: bool,
    #[serde(default, deserialize_with = "capability_flags")]
    pub has: BTreeMap<String, bool>,
}

/// Flags may be booleans, `null`, or strings such as `"emulated"`; any
/// non-empty string counts as supported.
fn capability_flags<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let supported = match value {
                Value::Bool(flag) => flag,
                Value::Null => false,
                Value::String(text) => !text.is_empty(),
                _ => true,
            };
            (name, supported)
        })
        .collect())
}

impl ExchangeInfo {
    /// Whether the exchange advertises `capability`. Unknown flags read false.
    #[must_use]
    pub fn supports(&self, capability: &str) -> bool {
        self.has.get(capability).copied().unwrap_or(false)
    }
}
