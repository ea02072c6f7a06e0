// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent directory lookups.

use async_trait::async_trait;

use crate::error::SwitchboardError;
use crate::types::Agent;

/// Resolves agents by their case-insensitive short name.
///
/// Injected into the engine instead of a global registry so tests can
/// substitute a fixed roster.
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    /// Look up one agent. Implementations normalize `name` before matching.
    async fn resolve(&self, name: &str) -> Result<Option<Agent>, SwitchboardError>;

    /// Every known agent, ordered by name.
    async fn roster(&self) -> Result<Vec<Agent>, SwitchboardError>;
}
