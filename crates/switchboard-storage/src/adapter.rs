// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite storage adapter and collaborator trait implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use switchboard_config::model::StorageConfig;
use switchboard_core::{
    ActivityEntry, ActivitySink, Agent, AgentDirectory, MessageTrack, Notification,
    NotificationKind, NotificationStore, SwitchboardError, Ticket, TicketStore, Track,
};

use crate::database::Database;
use crate::queries;
use crate::tracks::{LegacyTrack, UnifiedTrack};

/// SQLite-backed storage.
///
/// Wraps a [`Database`] handle and hands out the trait objects the engine is
/// built from. The database is opened on the first call to
/// [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, SwitchboardError> {
        self.db.get().ok_or_else(|| SwitchboardError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), SwitchboardError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SwitchboardError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), SwitchboardError> {
        self.db()?.close().await
    }

    /// Round-trip a trivial statement through the writer thread.
    pub async fn health_check(&self) -> Result<(), SwitchboardError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    /// Run `PRAGMA integrity_check`; an intact database reports a single `ok` row.
    pub async fn integrity_check(&self) -> Result<Vec<String>, SwitchboardError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare("PRAGMA integrity_check;")?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    /// The message track for one storage generation.
    pub fn track(&self, track: Track) -> Result<Arc<dyn MessageTrack>, SwitchboardError> {
        let db = self.db()?.clone();
        Ok(match track {
            Track::Unified => Arc::new(UnifiedTrack::new(db)),
            Track::Legacy => Arc::new(LegacyTrack::new(db)),
        })
    }

    pub fn notifications(&self) -> Result<Arc<SqliteNotifications>, SwitchboardError> {
        Ok(Arc::new(SqliteNotifications::new(self.db()?.clone())))
    }

    pub fn directory(&self) -> Result<Arc<SqliteDirectory>, SwitchboardError> {
        Ok(Arc::new(SqliteDirectory::new(self.db()?.clone())))
    }

    pub fn tickets(&self) -> Result<Arc<SqliteTickets>, SwitchboardError> {
        Ok(Arc::new(SqliteTickets::new(self.db()?.clone())))
    }

    pub fn activity(&self) -> Result<Arc<SqliteActivityLog>, SwitchboardError> {
        Ok(Arc::new(SqliteActivityLog::new(self.db()?.clone())))
    }
}

/// Notification table behind [`NotificationStore`].
#[derive(Clone)]
pub struct SqliteNotifications {
    db: Database,
}

impl SqliteNotifications {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationStore for SqliteNotifications {
    async fn insert(&self, notification: &Notification) -> Result<(), SwitchboardError> {
        queries::notifications::insert_notification(&self.db, notification).await
    }

    async fn get(&self, id: &str) -> Result<Option<Notification>, SwitchboardError> {
        queries::notifications::get_notification(&self.db, id).await
    }

    async fn mark_read(&self, id: &str) -> Result<bool, SwitchboardError> {
        queries::notifications::mark_read(&self.db, id).await
    }

    async fn mark_for_message(
        &self,
        message_id: &str,
        recipient: &str,
        kind: NotificationKind,
    ) -> Result<u64, SwitchboardError> {
        queries::notifications::mark_for_message(&self.db, message_id, recipient, kind).await
    }

    async fn list_for(
        &self,
        track: Track,
        recipient: &str,
        unread_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Notification>, SwitchboardError> {
        queries::notifications::list_for(&self.db, track, recipient, unread_only, limit).await
    }

    async fn unread_mentions(
        &self,
        track: Track,
        recipient: &str,
        limit: usize,
    ) -> Result<Vec<Notification>, SwitchboardError> {
        queries::notifications::unread_mentions(&self.db, track, recipient, limit).await
    }

    async fn count_unread_mentions(
        &self,
        track: Track,
        recipient: &str,
    ) -> Result<u64, SwitchboardError> {
        queries::notifications::count_unread_mentions(&self.db, track, recipient).await
    }

    async fn clear_for(&self, track: Track, recipient: &str) -> Result<u64, SwitchboardError> {
        queries::notifications::clear_for(&self.db, track, recipient).await
    }

    async fn delete_older_than(&self, cutoff: &str) -> Result<u64, SwitchboardError> {
        queries::notifications::delete_older_than(&self.db, cutoff).await
    }
}

/// Agent table behind [`AgentDirectory`].
#[derive(Clone)]
pub struct SqliteDirectory {
    db: Database,
}

impl SqliteDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register or update an agent.
    pub async fn upsert(&self, agent: &Agent) -> Result<(), SwitchboardError> {
        queries::agents::upsert_agent(&self.db, agent).await
    }
}

#[async_trait]
impl AgentDirectory for SqliteDirectory {
    async fn resolve(&self, name: &str) -> Result<Option<Agent>, SwitchboardError> {
        queries::agents::get_agent_by_name(&self.db, name).await
    }

    async fn roster(&self) -> Result<Vec<Agent>, SwitchboardError> {
        queries::agents::list_agents(&self.db).await
    }
}

/// Ticket table behind [`TicketStore`].
#[derive(Clone)]
pub struct SqliteTickets {
    db: Database,
}

impl SqliteTickets {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register or update a ticket.
    pub async fn upsert(&self, ticket: &Ticket) -> Result<(), SwitchboardError> {
        queries::tickets::upsert_ticket(&self.db, ticket).await
    }
}

#[async_trait]
impl TicketStore for SqliteTickets {
    async fn resolve(&self, reference: &str) -> Result<Option<Ticket>, SwitchboardError> {
        queries::tickets::find_ticket(&self.db, reference).await
    }
}

/// Activity table behind [`ActivitySink`].
#[derive(Clone)]
pub struct SqliteActivityLog {
    db: Database,
}

impl SqliteActivityLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Most recent entries, newest-first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>, SwitchboardError> {
        queries::activity::recent_activity(&self.db, limit).await
    }
}

#[async_trait]
impl ActivitySink for SqliteActivityLog {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), SwitchboardError> {
        queries::activity::insert_activity(&self.db, entry).await
    }
}
