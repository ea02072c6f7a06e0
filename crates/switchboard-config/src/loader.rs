// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./switchboard.toml` > `~/.config/switchboard/switchboard.toml`
//! > `/etc/switchboard/switchboard.toml` with environment variable overrides via
//! the `SWITCHBOARD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SwitchboardConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/switchboard/switchboard.toml`
/// 3. `~/.config/switchboard/switchboard.toml`
/// 4. `./switchboard.toml`
/// 5. `SWITCHBOARD_*` environment variables
pub fn load_config() -> Result<SwitchboardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SwitchboardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchboardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SwitchboardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SwitchboardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SwitchboardConfig::default()))
        .merge(Toml::file("/etc/switchboard/switchboard.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("switchboard/switchboard.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("switchboard.toml"))
        .merge(env_provider())
}

/// Environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SWITCHBOARD_MESSAGING_DM_PREVIEW_CHARS` must map to
/// `messaging.dm_preview_chars`, not `messaging.dm.preview.chars`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("SWITCHBOARD_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lower-cased, prefix-stripped env key to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    key.to_lowercase()
        .replacen("logging_", "logging.", 1)
        .replacen("storage_", "storage.", 1)
        .replacen("messaging_", "messaging.", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("logging_level"), "logging.level");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(
            map_env_key("messaging_dm_preview_chars"),
            "messaging.dm_preview_chars"
        );
    }

    #[test]
    fn string_loader_applies_defaults() {
        let config = load_config_from_str("[messaging]\nunread_detail_limit = 3\n").unwrap();
        assert_eq!(config.messaging.unread_detail_limit, 3);
        assert_eq!(config.messaging.mention_preview_chars, 100);
    }
}
