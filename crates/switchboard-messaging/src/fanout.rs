// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification fan-out.
//!
//! Fan-out is split into a pure planning step, which turns a persisted
//! message into a list of [`NotificationIntent`]s, and an execution step,
//! which delivers each intent independently. A failed intent is logged and
//! reported but never retried, and never affects the message it came from.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use switchboard_config::model::MessagingConfig;
use switchboard_core::{
    Agent, AgentDirectory, Message, Notification, NotificationKind, NotificationStore, Priority,
    Track, clock,
};
use tracing::{debug, warn};

use crate::preview::preview;

/// One notification that should exist once a message is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIntent {
    pub recipient: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub ticket_id: Option<String>,
}

/// A single intent that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub reason: String,
}

/// Outcome of executing a fan-out plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FanoutReport {
    /// Recipients that received a notification.
    pub delivered: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DeliveryFailure>,
}

impl FanoutReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Plan one `mention` notification per mentioned agent other than the author.
pub fn plan_comment(
    message: &Message,
    sender: &Agent,
    config: &MessagingConfig,
) -> Vec<NotificationIntent> {
    let reference = message
        .ticket_human_id
        .as_deref()
        .or(message.ticket_id.as_deref())
        .unwrap_or_default();
    let body = format!(
        "{reference}: {}",
        preview(&message.body, config.mention_preview_chars)
    );
    let title = format!("{} mentioned you", sender.display_name);

    message
        .mentions
        .iter()
        .filter(|name| **name != message.sender)
        .map(|name| NotificationIntent {
            recipient: name.clone(),
            kind: NotificationKind::Mention,
            title: title.clone(),
            body: body.clone(),
            ticket_id: message.ticket_id.clone(),
        })
        .collect()
}

/// Plan the single `dm` notification for a direct message.
///
/// A DM an agent sends to itself produces no notification.
pub fn plan_dm(message: &Message, sender: &Agent, config: &MessagingConfig) -> Vec<NotificationIntent> {
    let Some(recipient) = message.recipient.as_deref() else {
        return Vec::new();
    };
    if recipient == message.sender {
        return Vec::new();
    }

    let mut title = format!("Message from {}", sender.display_name);
    if message.priority == Some(Priority::Urgent) {
        title = format!("{} {title}", config.urgent_marker);
    }
    let text = preview(&message.body, config.dm_preview_chars);
    let body = match message.ticket_human_id.as_deref() {
        Some(human_id) => format!("{human_id}: {text}"),
        None => text,
    };

    vec![NotificationIntent {
        recipient: recipient.to_string(),
        kind: NotificationKind::Dm,
        title,
        body,
        ticket_id: message.ticket_id.clone(),
    }]
}

/// Executes fan-out plans against the notification store.
#[derive(Clone)]
pub struct Fanout {
    directory: Arc<dyn AgentDirectory>,
    notifications: Arc<dyn NotificationStore>,
    track: Track,
}

impl Fanout {
    pub fn new(
        directory: Arc<dyn AgentDirectory>,
        notifications: Arc<dyn NotificationStore>,
        track: Track,
    ) -> Self {
        Self {
            directory,
            notifications,
            track,
        }
    }

    /// Deliver every intent concurrently and report per-recipient outcomes.
    pub async fn execute(&self, message: &Message, intents: Vec<NotificationIntent>) -> FanoutReport {
        let outcomes = join_all(
            intents
                .into_iter()
                .map(|intent| self.deliver(message, intent)),
        )
        .await;

        let mut report = FanoutReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(recipient) => report.delivered.push(recipient),
                Err(failure) => {
                    warn!(
                        message_id = %message.id,
                        recipient = %failure.recipient,
                        reason = %failure.reason,
                        "notification delivery failed"
                    );
                    report.failures.push(failure);
                }
            }
        }
        report
    }

    async fn deliver(
        &self,
        message: &Message,
        intent: NotificationIntent,
    ) -> Result<String, DeliveryFailure> {
        let fail = |reason: String| DeliveryFailure {
            recipient: intent.recipient.clone(),
            reason,
        };

        match self.directory.resolve(&intent.recipient).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(fail("recipient is not a known agent".to_string())),
            Err(e) => return Err(fail(e.to_string())),
        }

        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            recipient: intent.recipient.clone(),
            sender: message.sender.clone(),
            kind: intent.kind,
            title: intent.title.clone(),
            body: intent.body.clone(),
            read: false,
            ticket_id: intent.ticket_id.clone(),
            message_id: message.id.clone(),
            track: self.track,
            created_at: clock::now(),
        };
        self.notifications
            .insert(&notification)
            .await
            .map_err(|e| fail(e.to_string()))?;

        debug!(
            notification_id = %notification.id,
            recipient = %notification.recipient,
            kind = %notification.kind,
            "notification created"
        );
        Ok(intent.recipient)
    }
}
