// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchboard - agent messaging and notification engine.
//!
//! This is the binary entry point. Every message command prints JSON on
//! stdout; errors go to stderr. A rejected request (bad input, unknown
//! ticket or agent) exits with 2, any other failure with 1.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod doctor;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use switchboard_config::{ConfigError, SwitchboardConfig};
use switchboard_core::SwitchboardError;
use tracing_subscriber::EnvFilter;

/// Switchboard - comments, direct messages and notifications between agents.
#[derive(Parser, Debug)]
#[command(name = "switchboard", version, about, long_about = None)]
struct Cli {
    /// Route message commands through the legacy split-schema surface.
    #[arg(long, global = true)]
    legacy: bool,

    /// Read configuration from this file instead of the default lookup.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Post a comment on a ticket, notifying every mentioned agent.
    Comment {
        /// Ticket id or human id (e.g. AGT-9).
        ticket: String,
        /// Authoring agent.
        from: String,
        body: String,
    },
    /// Send a direct message.
    Dm {
        from: String,
        to: String,
        body: String,
        /// Attach a ticket by id or human id.
        #[arg(long)]
        ticket: Option<String>,
        /// Mark the message urgent.
        #[arg(long)]
        urgent: bool,
    },
    /// List a ticket's comments, oldest first.
    Comments { ticket: String },
    /// List direct messages addressed to an agent, newest first.
    Dms {
        agent: String,
        /// Only unread messages.
        #[arg(long)]
        unread: bool,
    },
    /// Show an agent's unread direct messages and mentions.
    Unread {
        agent: String,
        /// Print counts only.
        #[arg(long)]
        summary: bool,
    },
    /// Mark one notification or direct message read.
    MarkRead { id: String },
    /// Mark every unread direct message and mention of an agent read.
    MarkAllRead { agent: String },
    /// Show the direct messages between two agents, oldest first.
    Conversation {
        agent: String,
        other: String,
        /// Keep only the most recent N messages.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List an agent's notifications, newest first.
    Notifications {
        agent: String,
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete all of an agent's notifications.
    ClearNotifications { agent: String },
    /// Delete notifications older than the retention window.
    Cleanup {
        /// Age in days; defaults to `messaging.notification_retention_days`.
        #[arg(long)]
        days: Option<u32>,
    },
    /// List the agent directory.
    Agents,
    /// Register or update a ticket.
    TicketAdd {
        id: String,
        human_id: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Show the most recent activity-log entries.
    Activity {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Run diagnostic checks.
    Doctor {
        /// Run the slower checks too.
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

/// Load configuration from `path` when given, otherwise from the default hierarchy.
pub(crate) fn load_config(path: Option<&Path>) -> Result<SwitchboardConfig, Vec<ConfigError>> {
    match path {
        Some(path) => switchboard_config::load_and_validate_path(path),
        None => switchboard_config::load_and_validate(),
    }
}

fn exit_code(error: &SwitchboardError) -> i32 {
    if error.is_rejection() { 2 } else { 1 }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchboard={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            switchboard_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let Some(command) = cli.command else {
        println!("switchboard: use --help for available commands");
        return;
    };

    let result = match command {
        Commands::Doctor { deep, plain } => {
            doctor::run_doctor(&config, cli.config.as_deref(), deep, plain).await
        }
        command => commands::run(&config, cli.legacy, command).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    #[serial_test::serial]
    fn binary_loads_config_defaults() {
        let config = load_config(None).expect("default config should be valid");
        assert_eq!(config.messaging.dm_preview_chars, 150);
    }

    #[test]
    fn explicit_config_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switchboard.toml");
        std::fs::write(
            &path,
            "[messaging]\nwildcard_mention = \"everyone\"\n\n[[agents]]\nname = \"sam\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.messaging.wildcard_mention, "everyone");
        assert_eq!(config.agents.len(), 1);
    }

    #[test]
    fn invalid_config_file_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switchboard.toml");
        std::fs::write(&path, "[messaging]\ndm_preview_chars = 0\n").unwrap();

        let errors = load_config(Some(&path)).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn rejections_exit_with_two() {
        assert_eq!(exit_code(&SwitchboardError::not_found("ticket", "AGT-404")), 2);
        assert_eq!(exit_code(&SwitchboardError::Validation("body".into())), 2);
        let storage = SwitchboardError::Storage {
            source: "disk full".into(),
        };
        assert_eq!(exit_code(&storage), 1);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn legacy_flag_is_global() {
        let cli = Cli::try_parse_from([
            "switchboard",
            "dm",
            "max",
            "sam",
            "ship it",
            "--urgent",
            "--ticket",
            "AGT-9",
            "--legacy",
        ])
        .unwrap();
        assert!(cli.legacy);
        match cli.command {
            Some(Commands::Dm {
                from,
                to,
                ticket,
                urgent,
                ..
            }) => {
                assert_eq!(from, "max");
                assert_eq!(to, "sam");
                assert_eq!(ticket.as_deref(), Some("AGT-9"));
                assert!(urgent);
            }
            other => panic!("expected dm, got {other:?}"),
        }
    }

    #[test]
    fn conversation_limit_parses() {
        let cli =
            Cli::try_parse_from(["switchboard", "conversation", "sam", "leo", "--limit", "3"])
                .unwrap();
        assert!(!cli.legacy);
        assert!(matches!(
            cli.command,
            Some(Commands::Conversation { limit: Some(3), .. })
        ));
    }
}
