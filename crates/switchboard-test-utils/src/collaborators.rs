// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborator implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use switchboard_core::{
    ActivityEntry, ActivitySink, Agent, AgentDirectory, SwitchboardError, Ticket, TicketStore,
    normalize_name,
};

/// A fixed agent roster keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    agents: BTreeMap<String, Agent>,
}

impl StaticDirectory {
    pub fn new(agents: impl IntoIterator<Item = Agent>) -> Self {
        let agents = agents
            .into_iter()
            .map(|mut a| {
                a.name = normalize_name(&a.name);
                (a.name.clone(), a)
            })
            .collect();
        Self { agents }
    }

    /// Roster built from bare names; display names are capitalized.
    pub fn from_names(names: &[&str]) -> Self {
        Self::new(names.iter().map(|name| agent(name)))
    }
}

/// An agent whose display name is `name` with an upper-case first letter.
pub fn agent(name: &str) -> Agent {
    let name = normalize_name(name);
    let mut chars = name.chars();
    let display_name = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Agent {
        id: format!("agent-{name}"),
        name,
        display_name,
        avatar: None,
    }
}

#[async_trait]
impl AgentDirectory for StaticDirectory {
    async fn resolve(&self, name: &str) -> Result<Option<Agent>, SwitchboardError> {
        Ok(self.agents.get(&normalize_name(name)).cloned())
    }

    async fn roster(&self) -> Result<Vec<Agent>, SwitchboardError> {
        Ok(self.agents.values().cloned().collect())
    }
}

/// A fixed ticket set, resolvable by id or case-insensitive human id.
#[derive(Debug, Clone, Default)]
pub struct StaticTickets {
    tickets: Vec<Ticket>,
}

impl StaticTickets {
    pub fn new(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        Self {
            tickets: tickets.into_iter().collect(),
        }
    }
}

#[async_trait]
impl TicketStore for StaticTickets {
    async fn resolve(&self, reference: &str) -> Result<Option<Ticket>, SwitchboardError> {
        let reference = reference.trim();
        let found = self
            .tickets
            .iter()
            .find(|t| t.id == reference)
            .or_else(|| {
                self.tickets
                    .iter()
                    .find(|t| t.human_id.eq_ignore_ascii_case(reference))
            });
        Ok(found.cloned())
    }
}

/// Activity sink that keeps every entry for assertions.
///
/// A failing sink rejects every append, for exercising the non-fatal path.
#[derive(Debug, Default)]
pub struct RecordingActivity {
    entries: Arc<Mutex<Vec<ActivityEntry>>>,
    fail: bool,
}

impl RecordingActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            entries: Arc::default(),
            fail: true,
        }
    }

    /// Get all recorded entries, oldest-first.
    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl ActivitySink for RecordingActivity {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), SwitchboardError> {
        if self.fail {
            return Err(SwitchboardError::Internal("activity sink unavailable".into()));
        }
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }
}
