//! Path utilities for dexcli.
//!
//! Per-user data lives under `~/.dexcli/`:
//! - `~/.dexcli/config.toml` - optional configuration

use std::path::PathBuf;

/// Returns the dexcli home directory (`~/.dexcli/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dexcli")
}

/// Returns the default config file path (`~/.dexcli/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
