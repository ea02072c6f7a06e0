// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message, notification and administration subcommands.
//!
//! Every command opens the configured database, seeds the `[[agents]]`
//! roster into the directory and dispatches to the engine for the selected
//! surface. Results are printed as pretty JSON.

use serde::Serialize;
use switchboard_config::model::{AgentEntry, SwitchboardConfig};
use switchboard_core::{
    Agent, AgentDirectory, Priority, SwitchboardError, Ticket, Track, normalize_name,
};
use switchboard_messaging::{Collaborators, LegacyBridge, MessagingService};
use switchboard_storage::{SqliteActivityLog, SqliteDirectory, SqliteStorage, SqliteTickets};
use tracing::debug;

use crate::Commands;

/// Which API surface message commands go through.
enum Surface {
    Unified(MessagingService),
    Legacy(LegacyBridge),
}

impl Surface {
    fn service(&self) -> &MessagingService {
        match self {
            Surface::Unified(service) => service,
            Surface::Legacy(bridge) => bridge.service(),
        }
    }
}

/// Wired-up engine over the configured database.
struct App {
    storage: SqliteStorage,
    directory: std::sync::Arc<SqliteDirectory>,
    tickets: std::sync::Arc<SqliteTickets>,
    activity: std::sync::Arc<SqliteActivityLog>,
    surface: Surface,
}

impl App {
    async fn open(config: &SwitchboardConfig, legacy: bool) -> Result<Self, SwitchboardError> {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;

        let directory = storage.directory()?;
        seed_roster(&directory, &config.agents).await?;

        let tickets = storage.tickets()?;
        let activity = storage.activity()?;
        let collaborators = Collaborators {
            directory: directory.clone(),
            tickets: tickets.clone(),
            activity: activity.clone(),
            notifications: storage.notifications()?,
        };

        let surface = if legacy {
            Surface::Legacy(LegacyBridge::new(
                storage.track(Track::Legacy)?,
                collaborators,
                config.messaging.clone(),
            )?)
        } else {
            Surface::Unified(MessagingService::new(
                storage.track(Track::Unified)?,
                collaborators,
                config.messaging.clone(),
            ))
        };

        Ok(Self {
            storage,
            directory,
            tickets,
            activity,
            surface,
        })
    }
}

/// Upsert every configured agent. Existing agents keep their id.
async fn seed_roster(
    directory: &SqliteDirectory,
    entries: &[AgentEntry],
) -> Result<(), SwitchboardError> {
    for entry in entries {
        directory.upsert(&agent_from_entry(entry)).await?;
    }
    debug!(count = entries.len(), "agent roster seeded");
    Ok(())
}

fn agent_from_entry(entry: &AgentEntry) -> Agent {
    Agent {
        id: uuid::Uuid::new_v4().to_string(),
        name: normalize_name(&entry.name),
        display_name: entry.display_name().to_string(),
        avatar: entry.avatar.clone(),
    }
}

#[derive(Debug, Serialize)]
struct MarkedRead {
    success: bool,
    #[serde(flatten)]
    outcome: switchboard_messaging::MarkReadOutcome,
}

#[derive(Debug, Serialize)]
struct MarkedAll {
    marked: u64,
    dms: u64,
    mentions: u64,
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: u64,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), SwitchboardError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| SwitchboardError::Internal(format!("failed to render output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Run one non-doctor subcommand.
pub async fn run(
    config: &SwitchboardConfig,
    legacy: bool,
    command: Commands,
) -> Result<(), SwitchboardError> {
    let app = App::open(config, legacy).await?;
    let result = dispatch(&app, command).await;
    app.storage.close().await?;
    result
}

async fn dispatch(app: &App, command: Commands) -> Result<(), SwitchboardError> {
    let service = app.surface.service();

    match command {
        Commands::Comment { ticket, from, body } => {
            let receipt = match &app.surface {
                Surface::Unified(service) => service.post_comment(&ticket, &from, &body).await?,
                Surface::Legacy(bridge) => bridge.add_comment(&ticket, &from, &body).await?,
            };
            print_json(&receipt)
        }
        Commands::Dm {
            from,
            to,
            body,
            ticket,
            urgent,
        } => {
            let priority = urgent.then_some(Priority::Urgent);
            let receipt = match &app.surface {
                Surface::Unified(service) => {
                    service
                        .send_dm(&from, &to, &body, ticket.as_deref(), priority)
                        .await?
                }
                Surface::Legacy(bridge) => {
                    bridge
                        .send_direct_message(&from, &to, &body, ticket.as_deref(), priority)
                        .await?
                }
            };
            print_json(&receipt)
        }
        Commands::Comments { ticket } => match &app.surface {
            Surface::Unified(service) => print_json(&service.get_comments(&ticket).await?),
            Surface::Legacy(bridge) => print_json(&bridge.ticket_comments(&ticket).await?),
        },
        Commands::Dms { agent, unread } => match &app.surface {
            Surface::Unified(service) => print_json(&service.get_dms(&agent, unread).await?),
            Surface::Legacy(bridge) => print_json(&bridge.direct_messages(&agent, unread).await?),
        },
        Commands::Unread { agent, summary } => {
            if summary {
                print_json(&service.unread_summary(&agent).await?)
            } else {
                print_json(&service.get_unread(&agent).await?)
            }
        }
        Commands::MarkRead { id } => {
            let outcome = service.mark_read(&id).await?;
            print_json(&MarkedRead {
                success: true,
                outcome,
            })
        }
        Commands::MarkAllRead { agent } => {
            let sweep = service.mark_all_read(&agent).await?;
            print_json(&MarkedAll {
                marked: sweep.total(),
                dms: sweep.dms,
                mentions: sweep.mentions,
            })
        }
        Commands::Conversation {
            agent,
            other,
            limit,
        } => match &app.surface {
            Surface::Unified(service) => {
                print_json(&service.get_conversation(&agent, &other, limit).await?)
            }
            Surface::Legacy(bridge) => {
                print_json(&bridge.conversation(&agent, &other, limit).await?)
            }
        },
        Commands::Notifications {
            agent,
            unread,
            limit,
        } => print_json(&service.list_notifications(&agent, unread, limit).await?),
        Commands::ClearNotifications { agent } => print_json(&Deleted {
            deleted: service.clear_notifications(&agent).await?,
        }),
        Commands::Cleanup { days } => {
            let days = days.unwrap_or(service.config().notification_retention_days);
            print_json(&Deleted {
                deleted: service.cleanup_notifications(days).await?,
            })
        }
        Commands::Agents => print_json(&app.directory.roster().await?),
        Commands::TicketAdd {
            id,
            human_id,
            title,
        } => {
            let ticket = Ticket {
                id: id.trim().to_string(),
                human_id: human_id.trim().to_string(),
                title,
            };
            if ticket.id.is_empty() || ticket.human_id.is_empty() {
                return Err(SwitchboardError::Validation(
                    "ticket id and human id are required".into(),
                ));
            }
            app.tickets.upsert(&ticket).await?;
            print_json(&ticket)
        }
        Commands::Activity { limit } => print_json(&app.activity.recent(limit).await?),
        Commands::Doctor { .. } => Err(SwitchboardError::Internal(
            "doctor is not a message command".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_config::model::StorageConfig;

    fn config_in(dir: &tempfile::TempDir) -> SwitchboardConfig {
        let mut config = SwitchboardConfig::default();
        config.storage = StorageConfig {
            database_path: dir.path().join("cli.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        config.agents = vec![
            AgentEntry {
                name: "Sam".into(),
                display_name: Some("Sam".into()),
                avatar: Some("🦊".into()),
            },
            AgentEntry {
                name: "leo".into(),
                display_name: None,
                avatar: None,
            },
        ];
        config
    }

    #[test]
    fn agent_entry_defaults_display_name() {
        let agent = agent_from_entry(&AgentEntry {
            name: "Leo".into(),
            display_name: None,
            avatar: None,
        });
        assert_eq!(agent.name, "leo");
        assert_eq!(agent.display_name, "Leo");
        assert!(agent.avatar.is_none());
    }

    #[tokio::test]
    async fn open_seeds_roster_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let app = App::open(&config, false).await.unwrap();
        let first = app.directory.resolve("sam").await.unwrap().unwrap();
        app.storage.close().await.unwrap();
        drop(app);

        let app = App::open(&config, true).await.unwrap();
        let roster = app.directory.roster().await.unwrap();
        assert_eq!(roster.len(), 2);
        let again = app.directory.resolve("SAM").await.unwrap().unwrap();
        assert_eq!(first.id, again.id, "reseeding keeps the agent id");
        assert_eq!(app.surface.service().track(), Track::Legacy);
    }

    #[tokio::test]
    async fn dispatch_runs_message_commands_on_both_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        for legacy in [false, true] {
            let app = App::open(&config, legacy).await.unwrap();
            dispatch(
                &app,
                Commands::TicketAdd {
                    id: "t-1".into(),
                    human_id: "AGT-1".into(),
                    title: None,
                },
            )
            .await
            .unwrap();
            dispatch(
                &app,
                Commands::Comment {
                    ticket: "AGT-1".into(),
                    from: "sam".into(),
                    body: "ping @leo".into(),
                },
            )
            .await
            .unwrap();
            dispatch(
                &app,
                Commands::Dm {
                    from: "leo".into(),
                    to: "sam".into(),
                    body: "pong".into(),
                    ticket: Some("t-1".into()),
                    urgent: true,
                },
            )
            .await
            .unwrap();

            let summary = app.surface.service().unread_summary("sam").await.unwrap();
            assert_eq!(summary.dms, 1);
            let summary = app.surface.service().unread_summary("leo").await.unwrap();
            assert_eq!(summary.mentions, 1);

            dispatch(
                &app,
                Commands::MarkAllRead {
                    agent: "leo".into(),
                },
            )
            .await
            .unwrap();
            let summary = app.surface.service().unread_summary("leo").await.unwrap();
            assert_eq!(summary.total, 0);

            app.storage.close().await.unwrap();
        }
    }

    #[tokio::test]
    async fn dispatch_rejects_unknown_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let app = App::open(&config, false).await.unwrap();

        let err = dispatch(
            &app,
            Commands::Comment {
                ticket: "AGT-404".into(),
                from: "sam".into(),
                body: "hello".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SwitchboardError::NotFound { .. }));
    }

    #[tokio::test]
    async fn ticket_add_requires_ids() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let app = App::open(&config, false).await.unwrap();

        let err = dispatch(
            &app,
            Commands::TicketAdd {
                id: " ".into(),
                human_id: "AGT-2".into(),
                title: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SwitchboardError::Validation(_)));
    }

    #[tokio::test]
    async fn cleanup_defaults_to_configured_retention() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config.messaging.notification_retention_days = 7;
        let app = App::open(&config, false).await.unwrap();
        assert_eq!(app.surface.service().config().notification_retention_days, 7);

        app.tickets
            .upsert(&Ticket {
                id: "t-1".into(),
                human_id: "AGT-1".into(),
                title: None,
            })
            .await
            .unwrap();
        app.surface
            .service()
            .post_comment("AGT-1", "sam", "ping @leo")
            .await
            .unwrap();

        dispatch(&app, Commands::Cleanup { days: None }).await.unwrap();
        dispatch(&app, Commands::Cleanup { days: Some(u32::MAX) })
            .await
            .unwrap();

        let remaining = app
            .surface
            .service()
            .list_notifications("leo", false, None)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1, "fresh notifications survive cleanup");
        app.storage.close().await.unwrap();
    }
}
