// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the storage tracks, the engine and the CLI.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::clock;
use crate::normalize_name;

/// Kind of a persisted message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Ticket-scoped comment, may carry mentions.
    Comment,
    /// Direct message to exactly one agent.
    Dm,
}

/// Delivery priority of a direct message.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

/// Kind of a notification record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Mention,
    Dm,
}

/// Storage generation a message was written to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// The unified `messages` table.
    Unified,
    /// The split `legacy_comments` / `legacy_direct_messages` tables.
    Legacy,
}

/// Kind of an activity-log entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    CommentPosted,
    DmSent,
}

/// A named participant, resolved through an [`AgentDirectory`](crate::AgentDirectory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable identifier.
    pub id: String,
    /// Canonical lower-cased short name used for addressing.
    pub name: String,
    /// Human-facing display name.
    pub display_name: String,
    /// Avatar glyph, usually a single emoji.
    pub avatar: Option<String>,
}

/// An externally tracked unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Storage reference.
    pub id: String,
    /// Human-readable identifier, e.g. `AGT-9`.
    pub human_id: String,
    pub title: Option<String>,
}

/// A comment or direct message, identical in shape for both storage tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub kind: MessageKind,
    /// Lower-cased sender name.
    pub sender: String,
    /// Present only for direct messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_human_id: Option<String>,
    pub body: String,
    /// Mentioned agent names, sorted; comments only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<String>,
    /// DMs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// DMs only. Mention read state lives on notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    pub created_at: String,
}

impl Message {
    /// Build a new ticket comment stamped with the monotonic clock.
    pub fn comment(ticket: &Ticket, sender: &str, body: &str, mentions: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: MessageKind::Comment,
            sender: normalize_name(sender),
            recipient: None,
            ticket_id: Some(ticket.id.clone()),
            ticket_human_id: Some(ticket.human_id.clone()),
            body: body.to_string(),
            mentions,
            priority: None,
            read: None,
            created_at: clock::now(),
        }
    }

    /// Build a new unread direct message stamped with the monotonic clock.
    pub fn direct(
        sender: &str,
        recipient: &str,
        body: &str,
        ticket: Option<&Ticket>,
        priority: Priority,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: MessageKind::Dm,
            sender: normalize_name(sender),
            recipient: Some(normalize_name(recipient)),
            ticket_id: ticket.map(|t| t.id.clone()),
            ticket_human_id: ticket.map(|t| t.human_id.clone()),
            body: body.to_string(),
            mentions: Vec::new(),
            priority: Some(priority),
            read: Some(false),
            created_at: clock::now(),
        }
    }

    pub fn is_dm(&self) -> bool {
        self.kind == MessageKind::Dm
    }
}

/// Per-recipient side effect of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient: String,
    pub sender: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    /// Originating message.
    pub message_id: String,
    /// Storage track of the originating message.
    pub track: Track,
    pub created_at: String,
}

/// Fire-and-forget activity-log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub kind: ActivityKind,
    pub agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub summary: String,
    pub created_at: String,
}

impl ActivityEntry {
    pub fn new(kind: ActivityKind, agent: &str, ticket_id: Option<String>, summary: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            agent: agent.to_string(),
            ticket_id,
            summary,
            created_at: clock::now(),
        }
    }
}

/// Items flipped by one bulk mark-all-read sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadSweep {
    pub dms: u64,
    pub mentions: u64,
}

impl ReadSweep {
    pub fn total(&self) -> u64 {
        self.dms + self.mentions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ticket() -> Ticket {
        Ticket {
            id: "t-1".into(),
            human_id: "AGT-9".into(),
            title: None,
        }
    }

    #[test]
    fn enums_use_lowercase_wire_names() {
        assert_eq!(MessageKind::Dm.to_string(), "dm");
        assert_eq!(Priority::from_str("urgent").unwrap(), Priority::Urgent);
        assert_eq!(NotificationKind::Mention.as_ref(), "mention");
        assert_eq!(Track::Legacy.to_string(), "legacy");
        assert_eq!(ActivityKind::CommentPosted.to_string(), "comment_posted");
        assert_eq!(
            serde_json::to_string(&Priority::Urgent).unwrap(),
            "\"urgent\""
        );
    }

    #[test]
    fn priority_defaults_to_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn comment_has_ticket_and_no_recipient() {
        let msg = Message::comment(&ticket(), "Sam", "hi", vec!["leo".into()]);
        assert_eq!(msg.kind, MessageKind::Comment);
        assert_eq!(msg.sender, "sam");
        assert!(msg.recipient.is_none());
        assert_eq!(msg.ticket_human_id.as_deref(), Some("AGT-9"));
        assert!(msg.read.is_none());
        assert!(msg.priority.is_none());
    }

    #[test]
    fn direct_message_is_unread_with_one_recipient() {
        let msg = Message::direct("Max", "SAM", "hello", None, Priority::Normal);
        assert!(msg.is_dm());
        assert_eq!(msg.recipient.as_deref(), Some("sam"));
        assert_eq!(msg.read, Some(false));
        assert!(msg.mentions.is_empty());
        assert_eq!(msg.sender, "max");
    }

    #[test]
    fn empty_mentions_are_omitted_from_json() {
        let msg = Message::direct("max", "sam", "hello", None, Priority::Urgent);
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("mentions").is_none());
        assert_eq!(json["priority"], "urgent");
    }

    #[test]
    fn read_sweep_total() {
        let sweep = ReadSweep { dms: 2, mentions: 3 };
        assert_eq!(sweep.total(), 5);
    }
}
