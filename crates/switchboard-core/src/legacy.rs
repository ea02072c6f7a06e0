// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record shapes of the legacy split schema.
//!
//! The legacy generation stored ticket comments and direct messages in two
//! separate tables with their own column names. These shapes are what the
//! legacy API surface returns; each converts losslessly to and from the
//! unified [`Message`].

use serde::{Deserialize, Serialize};

use crate::error::SwitchboardError;
use crate::types::{Message, MessageKind, Priority};

/// A row of the legacy ticket-comment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyComment {
    pub id: String,
    pub ticket_id: String,
    pub ticket_human_id: Option<String>,
    pub from_agent: String,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<String>,
    pub created_at: String,
}

/// A row of the legacy agent-addressed DM list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDirectMessage {
    pub id: String,
    pub from_agent: String,
    pub to_agent: String,
    pub content: String,
    pub ticket_id: Option<String>,
    pub ticket_human_id: Option<String>,
    pub priority: Priority,
    pub read: bool,
    pub created_at: String,
}

impl From<LegacyComment> for Message {
    fn from(c: LegacyComment) -> Self {
        Message {
            id: c.id,
            kind: MessageKind::Comment,
            sender: c.from_agent,
            recipient: None,
            ticket_id: Some(c.ticket_id),
            ticket_human_id: c.ticket_human_id,
            body: c.content,
            mentions: c.mentions,
            priority: None,
            read: None,
            created_at: c.created_at,
        }
    }
}

impl From<LegacyDirectMessage> for Message {
    fn from(d: LegacyDirectMessage) -> Self {
        Message {
            id: d.id,
            kind: MessageKind::Dm,
            sender: d.from_agent,
            recipient: Some(d.to_agent),
            ticket_id: d.ticket_id,
            ticket_human_id: d.ticket_human_id,
            body: d.content,
            mentions: Vec::new(),
            priority: Some(d.priority),
            read: Some(d.read),
            created_at: d.created_at,
        }
    }
}

impl TryFrom<&Message> for LegacyComment {
    type Error = SwitchboardError;

    fn try_from(m: &Message) -> Result<Self, Self::Error> {
        let ticket_id = match (m.kind, &m.ticket_id) {
            (MessageKind::Comment, Some(ticket_id)) => ticket_id.clone(),
            _ => {
                return Err(SwitchboardError::Internal(format!(
                    "message {} is not a ticket comment",
                    m.id
                )));
            }
        };
        Ok(Self {
            id: m.id.clone(),
            ticket_id,
            ticket_human_id: m.ticket_human_id.clone(),
            from_agent: m.sender.clone(),
            content: m.body.clone(),
            mentions: m.mentions.clone(),
            created_at: m.created_at.clone(),
        })
    }
}

impl TryFrom<&Message> for LegacyDirectMessage {
    type Error = SwitchboardError;

    fn try_from(m: &Message) -> Result<Self, Self::Error> {
        let to_agent = match (m.kind, &m.recipient) {
            (MessageKind::Dm, Some(recipient)) => recipient.clone(),
            _ => {
                return Err(SwitchboardError::Internal(format!(
                    "message {} is not a direct message",
                    m.id
                )));
            }
        };
        Ok(Self {
            id: m.id.clone(),
            from_agent: m.sender.clone(),
            to_agent,
            content: m.body.clone(),
            ticket_id: m.ticket_id.clone(),
            ticket_human_id: m.ticket_human_id.clone(),
            priority: m.priority.unwrap_or_default(),
            read: m.read.unwrap_or(false),
            created_at: m.created_at.clone(),
        })
    }
}
