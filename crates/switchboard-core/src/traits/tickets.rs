// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lookups.

use async_trait::async_trait;

use crate::error::SwitchboardError;
use crate::types::Ticket;

/// Resolves a ticket by storage reference or human-readable identifier.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn resolve(&self, reference: &str) -> Result<Option<Ticket>, SwitchboardError>;
}
