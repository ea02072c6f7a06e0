// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchboard doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration and the message
//! database, and reports each result on one line.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use switchboard_config::model::{StorageConfig, SwitchboardConfig};
use switchboard_core::{AgentDirectory, SwitchboardError};
use switchboard_storage::SqliteStorage;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `switchboard doctor` command.
///
/// With `--deep`, runs the integrity and allocator checks as well.
/// With `--plain`, disables colored output.
pub async fn run_doctor(
    config: &SwitchboardConfig,
    config_path: Option<&Path>,
    deep: bool,
    plain: bool,
) -> Result<(), SwitchboardError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let mut results = Vec::new();

    results.push(check_config(config_path).await);
    results.push(check_database(&config.storage).await);
    results.push(check_roster(config).await);

    if deep {
        results.push(check_db_integrity(&config.storage).await);
        results.push(check_memory_baseline().await);
    }

    println!();
    println!("  switchboard doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;

    for result in &results {
        match result.status {
            CheckStatus::Warn => warn_count += 1,
            CheckStatus::Fail => fail_count += 1,
            CheckStatus::Pass => {}
        }
        println!("{}", render_line(result, use_color));
    }

    println!();

    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
        if !deep {
            println!("  Run with --deep for detailed diagnostics.");
        }
    } else {
        println!("  All checks passed.");
    }

    println!();

    Ok(())
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();

    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Open the database when its file already exists. Doctor never creates it.
async fn open_existing(storage: &StorageConfig) -> Result<Option<SqliteStorage>, SwitchboardError> {
    if !Path::new(&storage.database_path).exists() {
        return Ok(None);
    }
    let sqlite = SqliteStorage::new(storage.clone());
    sqlite.initialize().await?;
    Ok(Some(sqlite))
}

/// Check configuration loads without errors.
async fn check_config(config_path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    match crate::load_config(config_path) {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check the database file exists, migrates and answers queries.
async fn check_database(storage: &StorageConfig) -> CheckResult {
    let start = Instant::now();
    match open_existing(storage).await {
        Ok(None) => CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!(
                "not found: {} (will be created on first run)",
                storage.database_path
            ),
            start,
        ),
        Ok(Some(sqlite)) => {
            let result = sqlite.health_check().await;
            let _ = sqlite.close().await;
            match result {
                Ok(()) => CheckResult::new("Database", CheckStatus::Pass, "connected", start),
                Err(e) => CheckResult::new(
                    "Database",
                    CheckStatus::Fail,
                    format!("query failed: {e}"),
                    start,
                ),
            }
        }
        Err(e) => CheckResult::new(
            "Database",
            CheckStatus::Fail,
            format!("open failed: {e}"),
            start,
        ),
    }
}

/// Check that mentions have somebody to resolve to.
async fn check_roster(config: &SwitchboardConfig) -> CheckResult {
    let start = Instant::now();
    let configured = config.agents.len();

    let stored = match open_existing(&config.storage).await {
        Ok(Some(sqlite)) => {
            let roster = match sqlite.directory() {
                Ok(directory) => directory.roster().await.map(|agents| agents.len()),
                Err(e) => Err(e),
            };
            let _ = sqlite.close().await;
            match roster {
                Ok(count) => count,
                Err(e) => {
                    return CheckResult::new(
                        "Agent roster",
                        CheckStatus::Fail,
                        format!("directory unreadable: {e}"),
                        start,
                    );
                }
            }
        }
        Ok(None) => 0,
        Err(e) => {
            return CheckResult::new(
                "Agent roster",
                CheckStatus::Fail,
                format!("open failed: {e}"),
                start,
            );
        }
    };

    if configured == 0 && stored == 0 {
        return CheckResult::new(
            "Agent roster",
            CheckStatus::Warn,
            "no agents; add [[agents]] entries to the config",
            start,
        );
    }

    CheckResult::new(
        "Agent roster",
        CheckStatus::Pass,
        format!("{configured} configured, {stored} in directory"),
        start,
    )
}

/// Run SQLite's integrity check.
async fn check_db_integrity(storage: &StorageConfig) -> CheckResult {
    let start = Instant::now();
    let sqlite = match open_existing(storage).await {
        Ok(Some(sqlite)) => sqlite,
        Ok(None) => {
            return CheckResult::new(
                "DB integrity",
                CheckStatus::Warn,
                "database not found (skipped)",
                start,
            );
        }
        Err(e) => {
            return CheckResult::new(
                "DB integrity",
                CheckStatus::Fail,
                format!("open failed: {e}"),
                start,
            );
        }
    };

    let result = sqlite.integrity_check().await;
    let _ = sqlite.close().await;

    match result {
        Ok(rows) if rows.len() == 1 && rows[0] == "ok" => {
            CheckResult::new("DB integrity", CheckStatus::Pass, "ok", start)
        }
        Ok(rows) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("{} problem(s): {}", rows.len(), rows.join("; ")),
            start,
        ),
        Err(e) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("check failed: {e}"),
            start,
        ),
    }
}

/// Report current heap usage from jemalloc.
async fn check_memory_baseline() -> CheckResult {
    let start = Instant::now();

    #[cfg(not(target_env = "msvc"))]
    {
        let _ = tikv_jemalloc_ctl::epoch::advance();
        match tikv_jemalloc_ctl::stats::allocated::read() {
            Ok(allocated) => CheckResult::new(
                "Memory",
                CheckStatus::Pass,
                format!("{:.1} MB allocated", allocated as f64 / (1024.0 * 1024.0)),
                start,
            ),
            Err(e) => CheckResult::new(
                "Memory",
                CheckStatus::Warn,
                format!("jemalloc stats unavailable: {e}"),
                start,
            ),
        }
    }

    #[cfg(target_env = "msvc")]
    {
        CheckResult::new(
            "Memory",
            CheckStatus::Warn,
            "jemalloc not available on this target",
            start,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_config::model::AgentEntry;

    fn storage_at(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            database_path: dir.path().join("doctor.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    async fn create_database(storage: &StorageConfig) {
        let sqlite = SqliteStorage::new(storage.clone());
        sqlite.initialize().await.unwrap();
        sqlite.close().await.unwrap();
    }

    #[tokio::test]
    async fn check_database_missing_warns() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_database(&storage_at(&dir)).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("not found"));
        assert!(
            !dir.path().join("doctor.db").exists(),
            "doctor must not create the database"
        );
    }

    #[tokio::test]
    async fn check_database_existing_passes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_at(&dir);
        create_database(&storage).await;

        let result = check_database(&storage).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.message, "connected");
    }

    #[tokio::test]
    async fn check_roster_without_agents_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SwitchboardConfig::default();
        config.storage = storage_at(&dir);

        let result = check_roster(&config).await;
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn check_roster_counts_configured_agents() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SwitchboardConfig::default();
        config.storage = storage_at(&dir);
        config.agents = vec![AgentEntry {
            name: "sam".into(),
            display_name: None,
            avatar: None,
        }];

        let result = check_roster(&config).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.starts_with("1 configured"));
    }

    #[tokio::test]
    async fn check_db_integrity_missing_warns() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_db_integrity(&storage_at(&dir)).await;
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn check_db_integrity_passes_on_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_at(&dir);
        create_database(&storage).await;

        let result = check_db_integrity(&storage).await;
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn check_memory_baseline_passes() {
        let result = check_memory_baseline().await;
        // On MSVC it warns.
        assert!(result.status == CheckStatus::Pass || result.status == CheckStatus::Warn);
    }

    #[test]
    fn plain_lines_carry_status_tags() {
        let start = Instant::now();
        let line = render_line(
            &CheckResult::new("Database", CheckStatus::Fail, "open failed", start),
            false,
        );
        assert!(line.contains("[FAIL]"));
        assert!(line.contains("Database"));
    }
}
