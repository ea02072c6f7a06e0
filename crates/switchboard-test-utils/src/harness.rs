// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the unified service and the legacy bridge over one
//! temp SQLite database, with an in-memory roster, ticket set and a
//! recording activity sink shared by both.

use std::sync::Arc;

use switchboard_config::model::{MessagingConfig, StorageConfig};
use switchboard_core::{Agent, SwitchboardError, Ticket, Track};
use switchboard_messaging::{Collaborators, LegacyBridge, MessagingService};
use switchboard_storage::{SqliteNotifications, SqliteStorage};

use crate::collaborators::{RecordingActivity, StaticDirectory, StaticTickets, agent};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    agents: Vec<Agent>,
    tickets: Vec<Ticket>,
    messaging: MessagingConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            agents: ["sam", "leo", "max", "ava"].iter().map(|n| agent(n)).collect(),
            tickets: vec![Ticket {
                id: "t-9".into(),
                human_id: "AGT-9".into(),
                title: Some("Widget rollout".into()),
            }],
            messaging: MessagingConfig::default(),
        }
    }

    /// Replace the default roster (sam, leo, max, ava).
    pub fn with_agents(mut self, agents: Vec<Agent>) -> Self {
        self.agents = agents;
        self
    }

    /// Add a ticket to the default set (t-9 / AGT-9).
    pub fn with_ticket(mut self, id: &str, human_id: &str) -> Self {
        self.tickets.push(Ticket {
            id: id.into(),
            human_id: human_id.into(),
            title: None,
        });
        self
    }

    pub fn with_messaging(mut self, config: MessagingConfig) -> Self {
        self.messaging = config;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SwitchboardError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SwitchboardError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await?;

        let directory = Arc::new(StaticDirectory::new(self.agents));
        let tickets = Arc::new(StaticTickets::new(self.tickets));
        let activity = Arc::new(RecordingActivity::new());
        let notifications = storage.notifications()?;
        let collaborators = Collaborators {
            directory: directory.clone(),
            tickets: tickets.clone(),
            activity: activity.clone(),
            notifications: notifications.clone(),
        };

        let unified = MessagingService::new(
            storage.track(Track::Unified)?,
            collaborators.clone(),
            self.messaging.clone(),
        );
        let legacy = LegacyBridge::new(
            storage.track(Track::Legacy)?,
            collaborators,
            self.messaging,
        )?;

        Ok(TestHarness {
            unified,
            legacy,
            storage,
            directory,
            tickets,
            activity,
            notifications,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment over a temp database.
pub struct TestHarness {
    /// Engine over the unified track.
    pub unified: MessagingService,
    /// Engine over the legacy track, with legacy record shapes.
    pub legacy: LegacyBridge,
    /// SQLite storage (temp DB, cleaned up on drop).
    pub storage: SqliteStorage,
    pub directory: Arc<StaticDirectory>,
    pub tickets: Arc<StaticTickets>,
    /// Captures every activity entry either surface appends.
    pub activity: Arc<RecordingActivity>,
    /// Notification table shared by both tracks.
    pub notifications: Arc<SqliteNotifications>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The service for one track; the legacy one is the bridge's engine.
    pub fn service(&self, track: Track) -> &MessagingService {
        match track {
            Track::Unified => &self.unified,
            Track::Legacy => self.legacy.service(),
        }
    }

    /// Checkpoint the database.
    pub async fn close(&self) -> Result<(), SwitchboardError> {
        self.storage.close().await
    }
}
