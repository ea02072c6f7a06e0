// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints serde attributes cannot express, such as
//! positive preview lengths and a collision-free agent roster.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::SwitchboardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A century. Longer windows cannot select anything the database holds.
const MAX_RETENTION_DAYS: u32 = 36_500;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &SwitchboardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let messaging = &config.messaging;
    let wildcard = messaging.wildcard_mention.trim().to_lowercase();
    if wildcard.is_empty() || !wildcard.chars().all(is_name_char) {
        fail(format!(
            "messaging.wildcard_mention `{}` must be a non-empty name made of letters, digits, `-` or `_`",
            messaging.wildcard_mention
        ));
    }
    if messaging.mention_preview_chars == 0 {
        fail("messaging.mention_preview_chars must be at least 1".to_string());
    }
    if messaging.dm_preview_chars == 0 {
        fail("messaging.dm_preview_chars must be at least 1".to_string());
    }
    if messaging.unread_detail_limit == 0 {
        fail("messaging.unread_detail_limit must be at least 1".to_string());
    }
    if messaging.notification_retention_days > MAX_RETENTION_DAYS {
        fail(format!(
            "messaging.notification_retention_days must be at most {MAX_RETENTION_DAYS}, got {}",
            messaging.notification_retention_days
        ));
    }

    let mut seen = HashSet::new();
    for (i, agent) in config.agents.iter().enumerate() {
        let name = agent.name.trim().to_lowercase();
        if name.is_empty() {
            fail(format!("agents[{i}].name must not be empty"));
            continue;
        }
        if !name.chars().all(is_name_char) {
            fail(format!(
                "agents[{i}].name `{}` can only contain letters, digits, `-` or `_`",
                agent.name
            ));
        }
        if name == wildcard {
            fail(format!(
                "agents[{i}].name `{}` collides with the wildcard mention",
                agent.name
            ));
        }
        if !seen.insert(name) {
            fail(format!(
                "duplicate agent name `{}` in [[agents]] array",
                agent.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AgentEntry;

    fn agent(name: &str) -> AgentEntry {
        AgentEntry {
            name: name.to_string(),
            display_name: None,
            avatar: None,
        }
    }

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&SwitchboardConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = SwitchboardConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn zero_limits_fail_validation() {
        let mut config = SwitchboardConfig::default();
        config.messaging.dm_preview_chars = 0;
        config.messaging.unread_detail_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_message(&errors, "dm_preview_chars"));
        assert!(has_message(&errors, "unread_detail_limit"));
    }

    #[test]
    fn retention_days_has_an_upper_bound() {
        let mut config = SwitchboardConfig::default();
        config.messaging.notification_retention_days = MAX_RETENTION_DAYS;
        assert!(validate_config(&config).is_ok());

        config.messaging.notification_retention_days = u32::MAX;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_message(&errors, "notification_retention_days"));
    }

    #[test]
    fn non_ascii_agent_names_are_accepted() {
        let mut config = SwitchboardConfig::default();
        config.agents = vec![agent("Zoë"), agent("josé")];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_agent_names_are_case_insensitive() {
        let mut config = SwitchboardConfig::default();
        config.agents = vec![agent("Leo"), agent("leo")];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicate agent name `leo`"));
    }

    #[test]
    fn agent_named_like_wildcard_is_rejected() {
        let mut config = SwitchboardConfig::default();
        config.agents = vec![agent("ALL")];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "wildcard"));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = SwitchboardConfig::default();
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "logging.level"));
    }

    #[test]
    fn valid_roster_passes() {
        let mut config = SwitchboardConfig::default();
        config.agents = vec![agent("sam"), agent("leo"), agent("max")];
        assert!(validate_config(&config).is_ok());
    }
}
