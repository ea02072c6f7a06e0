// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-state transitions.
//!
//! Only read flags change here. A DM and its `dm` notification always move
//! together, whichever id the caller supplies.

use std::sync::Arc;

use serde::Serialize;
use switchboard_core::{
    MessageTrack, NotificationKind, NotificationStore, ReadSweep, SwitchboardError,
    normalize_name,
};
use tracing::{debug, info};

/// What a `mark_read` id referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadTarget {
    Notification,
    DirectMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkReadOutcome {
    pub target: ReadTarget,
    /// False when the item was already read.
    pub changed: bool,
}

#[derive(Clone)]
pub struct ReadStateMutator {
    track: Arc<dyn MessageTrack>,
    notifications: Arc<dyn NotificationStore>,
}

impl ReadStateMutator {
    pub fn new(track: Arc<dyn MessageTrack>, notifications: Arc<dyn NotificationStore>) -> Self {
        Self {
            track,
            notifications,
        }
    }

    /// Mark a notification or a DM read. Idempotent.
    ///
    /// Notifications from the other storage track are invisible here, as are
    /// its messages. A ticket comment id is rejected because comment read
    /// state lives on each mentioned agent's notification.
    pub async fn mark_read(&self, id: &str) -> Result<MarkReadOutcome, SwitchboardError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SwitchboardError::Validation("id is required".into()));
        }

        if let Some(notification) = self.notifications.get(id).await?
            && notification.track == self.track.track()
        {
            let changed = self.notifications.mark_read(id).await?;
            if notification.kind == NotificationKind::Dm {
                self.track.mark_dm_read(&notification.message_id).await?;
            }
            debug!(notification_id = id, changed, "notification marked read");
            return Ok(MarkReadOutcome {
                target: ReadTarget::Notification,
                changed,
            });
        }

        let Some(message) = self.track.get(id).await? else {
            return Err(SwitchboardError::not_found("message or notification", id));
        };
        let Some(recipient) = message.recipient.as_deref().filter(|_| message.is_dm()) else {
            return Err(SwitchboardError::Validation(format!(
                "{id} is a ticket comment; mark the mention notification instead"
            )));
        };

        let changed = self.track.mark_dm_read(id).await?;
        self.notifications
            .mark_for_message(id, recipient, NotificationKind::Dm)
            .await?;
        debug!(message_id = id, changed, "direct message marked read");
        Ok(MarkReadOutcome {
            target: ReadTarget::DirectMessage,
            changed,
        })
    }

    /// Flip every unread DM and mention for `agent` from one snapshot.
    pub async fn mark_all_read(&self, agent: &str) -> Result<ReadSweep, SwitchboardError> {
        let agent = normalize_name(agent);
        if agent.is_empty() {
            return Err(SwitchboardError::Validation("agent is required".into()));
        }
        let sweep = self.track.mark_all_read(&agent).await?;
        info!(
            agent = %agent,
            track = %self.track.track(),
            dms = sweep.dms,
            mentions = sweep.mentions,
            "marked all read"
        );
        Ok(sweep)
    }

    /// Flip one agent's mention of one comment. Returns how many flipped.
    pub async fn mark_mention_read(
        &self,
        message_id: &str,
        agent: &str,
    ) -> Result<u64, SwitchboardError> {
        let agent = normalize_name(agent);
        if message_id.trim().is_empty() || agent.is_empty() {
            return Err(SwitchboardError::Validation(
                "message id and agent are required".into(),
            ));
        }
        self.notifications
            .mark_for_message(message_id.trim(), &agent, NotificationKind::Mention)
            .await
    }
}
