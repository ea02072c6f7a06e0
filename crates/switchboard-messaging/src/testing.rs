// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared unit-test fixture: a temp SQLite database seeded with a roster.

use async_trait::async_trait;
use switchboard_config::model::{MessagingConfig, StorageConfig};
use switchboard_core::{
    Agent, Notification, NotificationKind, NotificationStore, SwitchboardError, Ticket, Track,
};
use switchboard_storage::SqliteStorage;
use tempfile::TempDir;

use crate::service::{Collaborators, MessagingService};

pub const TICKET_ID: &str = "t-9";

pub struct Fixture {
    pub storage: SqliteStorage,
    _dir: TempDir,
}

impl Fixture {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            directory: self.storage.directory().unwrap(),
            tickets: self.storage.tickets().unwrap(),
            activity: self.storage.activity().unwrap(),
            notifications: self.storage.notifications().unwrap(),
        }
    }

    pub fn service(&self, track: Track) -> MessagingService {
        MessagingService::new(
            self.storage.track(track).unwrap(),
            self.collaborators(),
            MessagingConfig::default(),
        )
    }

    pub async fn close(self) {
        self.storage.close().await.unwrap();
    }
}

/// Roster: sam (Sam, 🦊), leo, max, ava. Ticket: t-9 / AGT-9.
pub async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("messaging.db");
    let storage = SqliteStorage::new(StorageConfig {
        database_path: db_path.to_string_lossy().into_owned(),
        wal_mode: true,
    });
    storage.initialize().await.unwrap();

    let directory = storage.directory().unwrap();
    for (name, display, avatar) in [
        ("sam", "Sam", Some("🦊")),
        ("leo", "Leo", None),
        ("max", "Max", Some("🐻")),
        ("ava", "Ava", None),
    ] {
        directory
            .upsert(&Agent {
                id: format!("agent-{name}"),
                name: name.into(),
                display_name: display.into(),
                avatar: avatar.map(str::to_string),
            })
            .await
            .unwrap();
    }
    storage
        .tickets()
        .unwrap()
        .upsert(&Ticket {
            id: TICKET_ID.into(),
            human_id: "AGT-9".into(),
            title: Some("Widget rollout".into()),
        })
        .await
        .unwrap();

    Fixture { storage, _dir: dir }
}

/// Notification store whose inserts always fail; reads come back empty.
pub struct RejectingStore;

#[async_trait]
impl NotificationStore for RejectingStore {
    async fn insert(&self, n: &Notification) -> Result<(), SwitchboardError> {
        Err(SwitchboardError::Storage {
            source: format!("disk full for {}", n.recipient).into(),
        })
    }
    async fn get(&self, _id: &str) -> Result<Option<Notification>, SwitchboardError> {
        Ok(None)
    }
    async fn mark_read(&self, _id: &str) -> Result<bool, SwitchboardError> {
        Ok(false)
    }
    async fn mark_for_message(
        &self,
        _message_id: &str,
        _recipient: &str,
        _kind: NotificationKind,
    ) -> Result<u64, SwitchboardError> {
        Ok(0)
    }
    async fn list_for(
        &self,
        _track: Track,
        _recipient: &str,
        _unread_only: bool,
        _limit: Option<usize>,
    ) -> Result<Vec<Notification>, SwitchboardError> {
        Ok(Vec::new())
    }
    async fn unread_mentions(
        &self,
        _track: Track,
        _recipient: &str,
        _limit: usize,
    ) -> Result<Vec<Notification>, SwitchboardError> {
        Ok(Vec::new())
    }
    async fn count_unread_mentions(
        &self,
        _track: Track,
        _recipient: &str,
    ) -> Result<u64, SwitchboardError> {
        Ok(0)
    }
    async fn clear_for(&self, _track: Track, _recipient: &str) -> Result<u64, SwitchboardError> {
        Ok(0)
    }
    async fn delete_older_than(&self, _cutoff: &str) -> Result<u64, SwitchboardError> {
        Ok(0)
    }
}
