// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Switchboard messaging engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Switchboard configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchboardConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Mention parsing, notification rendering and unread aggregation.
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// Agent roster seeded into the directory at startup.
    #[serde(default)]
    pub agents: Vec<AgentEntry>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("switchboard").join("switchboard.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("switchboard.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Messaging engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagingConfig {
    /// Mention marker (without `@`) that addresses every known agent.
    #[serde(default = "default_wildcard_mention")]
    pub wildcard_mention: String,

    /// Characters of a comment body kept in a mention notification.
    #[serde(default = "default_mention_preview_chars")]
    pub mention_preview_chars: usize,

    /// Characters of a DM body kept in a DM notification.
    #[serde(default = "default_dm_preview_chars")]
    pub dm_preview_chars: usize,

    /// Maximum items per list in an unread detail report.
    #[serde(default = "default_unread_detail_limit")]
    pub unread_detail_limit: usize,

    /// Prefix placed on the title of urgent DM notifications.
    #[serde(default = "default_urgent_marker")]
    pub urgent_marker: String,

    /// Age in days after which `cleanup` deletes notifications.
    #[serde(default = "default_notification_retention_days")]
    pub notification_retention_days: u32,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            wildcard_mention: default_wildcard_mention(),
            mention_preview_chars: default_mention_preview_chars(),
            dm_preview_chars: default_dm_preview_chars(),
            unread_detail_limit: default_unread_detail_limit(),
            urgent_marker: default_urgent_marker(),
            notification_retention_days: default_notification_retention_days(),
        }
    }
}

fn default_wildcard_mention() -> String {
    "all".to_string()
}

fn default_mention_preview_chars() -> usize {
    100
}

fn default_dm_preview_chars() -> usize {
    150
}

fn default_unread_detail_limit() -> usize {
    10
}

fn default_urgent_marker() -> String {
    "[URGENT]".to_string()
}

fn default_notification_retention_days() -> u32 {
    30
}

/// One `[[agents]]` roster entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentEntry {
    /// Short addressing name, matched case-insensitively.
    pub name: String,

    /// Display name. Defaults to `name`.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Avatar glyph.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl AgentEntry {
    /// Display name, falling back to the short name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SwitchboardConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.storage.wal_mode);
        assert_eq!(config.messaging.wildcard_mention, "all");
        assert_eq!(config.messaging.mention_preview_chars, 100);
        assert_eq!(config.messaging.dm_preview_chars, 150);
        assert_eq!(config.messaging.unread_detail_limit, 10);
        assert_eq!(config.messaging.urgent_marker, "[URGENT]");
        assert!(config.agents.is_empty());
    }

    #[test]
    fn agents_array_deserializes_correctly() {
        let toml_str = r#"
[[agents]]
name = "sam"
display_name = "Sam"
avatar = "🦊"

[[agents]]
name = "leo"
"#;
        let config: SwitchboardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[0].display_name(), "Sam");
        assert_eq!(config.agents[0].avatar.as_deref(), Some("🦊"));
        assert_eq!(config.agents[1].display_name(), "leo");
        assert!(config.agents[1].avatar.is_none());
    }
}
