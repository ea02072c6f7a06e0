// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort enrichment.
//!
//! Nothing in this module returns an error: a failed lookup leaves the
//! optional field empty and is logged at debug level.

use std::collections::HashMap;

use serde::Serialize;
use switchboard_core::{Agent, AgentDirectory, Message, Ticket, TicketStore};
use tracing::debug;

/// A message decorated with its sender's current profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedMessage {
    #[serde(flatten)]
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_avatar: Option<String>,
}

/// Attach each sender's live display name and avatar.
///
/// Each distinct sender is looked up once per call.
pub async fn with_sender_profiles(
    directory: &dyn AgentDirectory,
    messages: Vec<Message>,
) -> Vec<EnrichedMessage> {
    let mut profiles: HashMap<String, Option<Agent>> = HashMap::new();
    let mut enriched = Vec::with_capacity(messages.len());

    for message in messages {
        if !profiles.contains_key(&message.sender) {
            let profile = match directory.resolve(&message.sender).await {
                Ok(agent) => agent,
                Err(e) => {
                    debug!(sender = %message.sender, error = %e, "sender profile lookup failed");
                    None
                }
            };
            profiles.insert(message.sender.clone(), profile);
        }
        let profile = profiles.get(&message.sender).cloned().flatten();
        enriched.push(EnrichedMessage {
            sender_display_name: profile.as_ref().map(|a| a.display_name.clone()),
            sender_avatar: profile.and_then(|a| a.avatar),
            message,
        });
    }
    enriched
}

/// Resolve an optional ticket reference, dropping it when it does not resolve.
pub async fn optional_ticket(tickets: &dyn TicketStore, reference: Option<&str>) -> Option<Ticket> {
    let reference = reference.map(str::trim).filter(|r| !r.is_empty())?;
    match tickets.resolve(reference).await {
        Ok(Some(ticket)) => Some(ticket),
        Ok(None) => {
            debug!(reference, "ticket reference did not resolve; dropping it");
            None
        }
        Err(e) => {
            debug!(reference, error = %e, "ticket lookup failed; dropping reference");
            None
        }
    }
}
