// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-agent unread aggregation.
//!
//! A DM is unread while its own read flag is false. A mention is unread while
//! the `mention` notification it produced for the agent is unread; comments
//! carry no read state of their own. Counts are exact, listings are capped.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use switchboard_core::{Message, MessageTrack, NotificationStore, SwitchboardError};

/// Exact unread counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnreadSummary {
    pub dms: u64,
    pub mentions: u64,
    pub total: u64,
}

/// An unread mention, keyed by the notification that tracks its read state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadMention {
    pub notification_id: String,
    pub message_id: String,
    pub sender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub title: String,
    pub preview: String,
    pub created_at: String,
    /// The comment itself, when it is still readable on this track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// Newest-first unread items, each list capped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnreadDetail {
    pub dms: Vec<Message>,
    pub mentions: Vec<UnreadMention>,
}

/// Unread items plus exact counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnreadReport {
    pub dms: Vec<Message>,
    pub mentions: Vec<UnreadMention>,
    pub count: UnreadSummary,
}

#[derive(Clone)]
pub struct UnreadAggregator {
    track: Arc<dyn MessageTrack>,
    notifications: Arc<dyn NotificationStore>,
    detail_limit: usize,
}

impl UnreadAggregator {
    pub fn new(
        track: Arc<dyn MessageTrack>,
        notifications: Arc<dyn NotificationStore>,
        detail_limit: usize,
    ) -> Self {
        Self {
            track,
            notifications,
            detail_limit,
        }
    }

    pub async fn summary(&self, agent: &str) -> Result<UnreadSummary, SwitchboardError> {
        let (dms, mentions) = futures::try_join!(
            self.track.count_unread_dms(agent),
            self.notifications
                .count_unread_mentions(self.track.track(), agent),
        )?;
        Ok(UnreadSummary {
            dms,
            mentions,
            total: dms + mentions,
        })
    }

    pub async fn detail(&self, agent: &str) -> Result<UnreadDetail, SwitchboardError> {
        let (dms, notifications) = futures::try_join!(
            self.track.dms_for(agent, true, Some(self.detail_limit)),
            self.notifications
                .unread_mentions(self.track.track(), agent, self.detail_limit),
        )?;

        let mentions = try_join_all(notifications.into_iter().map(|n| async move {
            let message = self.track.get(&n.message_id).await?;
            Ok::<_, SwitchboardError>(UnreadMention {
                notification_id: n.id,
                message_id: n.message_id,
                sender: n.sender,
                ticket_id: n.ticket_id,
                title: n.title,
                preview: n.body,
                created_at: n.created_at,
                message,
            })
        }))
        .await?;

        Ok(UnreadDetail { dms, mentions })
    }

    pub async fn unread(&self, agent: &str) -> Result<UnreadReport, SwitchboardError> {
        let (detail, count) = futures::try_join!(self.detail(agent), self.summary(agent))?;
        Ok(UnreadReport {
            dms: detail.dms,
            mentions: detail.mentions,
            count,
        })
    }
}
