// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The messaging engine over one storage track.
//!
//! Write path: validate, resolve, persist, fan out, log activity. Only the
//! steps before the persist can fail the request.

use std::sync::Arc;

use serde::Serialize;
use switchboard_config::model::MessagingConfig;
use switchboard_core::{
    ActivityEntry, ActivityKind, ActivitySink, AgentDirectory, Message, MessageTrack,
    Notification, NotificationStore, Priority, ReadSweep, SwitchboardError, TicketStore, Track,
    clock, normalize_name,
};
use tracing::{info, warn};

use crate::enrich::{self, EnrichedMessage};
use crate::fanout::{self, Fanout, FanoutReport};
use crate::mentions::parse_mentions;
use crate::read_state::{MarkReadOutcome, ReadStateMutator};
use crate::unread::{UnreadAggregator, UnreadReport, UnreadSummary};

/// Everything the engine consumes besides the message track.
#[derive(Clone)]
pub struct Collaborators {
    pub directory: Arc<dyn AgentDirectory>,
    pub tickets: Arc<dyn TicketStore>,
    pub activity: Arc<dyn ActivitySink>,
    pub notifications: Arc<dyn NotificationStore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentReceipt {
    pub message_id: String,
    pub ticket_id: String,
    pub ticket_human_id: String,
    pub mentions: Vec<String>,
    pub fanout: FanoutReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DmReceipt {
    pub message_id: String,
    pub sender: String,
    pub recipient: String,
    pub priority: Priority,
    pub fanout: FanoutReport,
}

pub struct MessagingService {
    track: Arc<dyn MessageTrack>,
    directory: Arc<dyn AgentDirectory>,
    tickets: Arc<dyn TicketStore>,
    activity: Arc<dyn ActivitySink>,
    notifications: Arc<dyn NotificationStore>,
    config: MessagingConfig,
    fanout: Fanout,
    unread: UnreadAggregator,
    read_state: ReadStateMutator,
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, SwitchboardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SwitchboardError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

impl MessagingService {
    pub fn new(
        track: Arc<dyn MessageTrack>,
        collaborators: Collaborators,
        config: MessagingConfig,
    ) -> Self {
        let Collaborators {
            directory,
            tickets,
            activity,
            notifications,
        } = collaborators;
        let fanout = Fanout::new(directory.clone(), notifications.clone(), track.track());
        let unread = UnreadAggregator::new(
            track.clone(),
            notifications.clone(),
            config.unread_detail_limit,
        );
        let read_state = ReadStateMutator::new(track.clone(), notifications.clone());
        Self {
            track,
            directory,
            tickets,
            activity,
            notifications,
            config,
            fanout,
            unread,
            read_state,
        }
    }

    /// Which storage generation this service reads and writes.
    pub fn track(&self) -> Track {
        self.track.track()
    }

    pub fn config(&self) -> &MessagingConfig {
        &self.config
    }

    /// Post a comment on a ticket and notify every mentioned agent.
    ///
    /// An author missing from the directory still gets the comment stored,
    /// but no notifications or activity entry are produced.
    pub async fn post_comment(
        &self,
        ticket_ref: &str,
        sender: &str,
        body: &str,
    ) -> Result<CommentReceipt, SwitchboardError> {
        let ticket_ref = require("ticket", ticket_ref)?;
        let sender = require("sender", sender)?;
        if body.trim().is_empty() {
            return Err(SwitchboardError::Validation("body is required".into()));
        }

        let ticket = self
            .tickets
            .resolve(ticket_ref)
            .await?
            .ok_or_else(|| SwitchboardError::not_found("ticket", ticket_ref))?;
        let author = self.directory.resolve(sender).await?;
        let roster: Vec<String> = self
            .directory
            .roster()
            .await?
            .into_iter()
            .map(|a| a.name)
            .collect();
        let mentions: Vec<String> = parse_mentions(body, &roster, &self.config.wildcard_mention)
            .into_iter()
            .collect();

        let message = Message::comment(&ticket, sender, body, mentions);
        self.track.insert(&message).await?;

        let fanout = match &author {
            Some(author) => {
                let intents = fanout::plan_comment(&message, author, &self.config);
                let report = self.fanout.execute(&message, intents).await;
                self.log_activity(ActivityEntry::new(
                    ActivityKind::CommentPosted,
                    &message.sender,
                    Some(ticket.id.clone()),
                    format!("{} commented on {}", author.display_name, ticket.human_id),
                ))
                .await;
                report
            }
            None => {
                warn!(
                    sender = %message.sender,
                    message_id = %message.id,
                    "comment author is not a known agent; skipping notifications"
                );
                FanoutReport::default()
            }
        };

        info!(
            message_id = %message.id,
            ticket = %ticket.human_id,
            track = %self.track(),
            mentions = message.mentions.len(),
            "comment posted"
        );
        Ok(CommentReceipt {
            message_id: message.id,
            ticket_id: ticket.id,
            ticket_human_id: ticket.human_id,
            mentions: message.mentions,
            fanout,
        })
    }

    /// Send a direct message. Priority defaults to normal.
    pub async fn send_dm(
        &self,
        sender: &str,
        recipient: &str,
        body: &str,
        ticket_ref: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<DmReceipt, SwitchboardError> {
        let sender = require("sender", sender)?;
        let recipient = require("recipient", recipient)?;
        if body.trim().is_empty() {
            return Err(SwitchboardError::Validation("body is required".into()));
        }

        let from = self
            .directory
            .resolve(sender)
            .await?
            .ok_or_else(|| SwitchboardError::not_found("agent", sender))?;
        let to = self
            .directory
            .resolve(recipient)
            .await?
            .ok_or_else(|| SwitchboardError::not_found("agent", recipient))?;
        let ticket = enrich::optional_ticket(self.tickets.as_ref(), ticket_ref).await;
        let priority = priority.unwrap_or_default();

        let message = Message::direct(&from.name, &to.name, body, ticket.as_ref(), priority);
        self.track.insert(&message).await?;

        let intents = fanout::plan_dm(&message, &from, &self.config);
        let fanout = self.fanout.execute(&message, intents).await;
        self.log_activity(ActivityEntry::new(
            ActivityKind::DmSent,
            &from.name,
            message.ticket_id.clone(),
            format!("{} sent a direct message to {}", from.display_name, to.display_name),
        ))
        .await;

        info!(
            message_id = %message.id,
            sender = %from.name,
            recipient = %to.name,
            priority = %priority,
            track = %self.track(),
            "direct message sent"
        );
        Ok(DmReceipt {
            message_id: message.id,
            sender: from.name,
            recipient: to.name,
            priority,
            fanout,
        })
    }

    /// Comments on a ticket, oldest-first, with live sender profiles.
    pub async fn get_comments(
        &self,
        ticket_ref: &str,
    ) -> Result<Vec<EnrichedMessage>, SwitchboardError> {
        let ticket_ref = require("ticket", ticket_ref)?;
        let ticket = self
            .tickets
            .resolve(ticket_ref)
            .await?
            .ok_or_else(|| SwitchboardError::not_found("ticket", ticket_ref))?;
        let comments = self.track.comments_for_ticket(&ticket.id).await?;
        Ok(enrich::with_sender_profiles(self.directory.as_ref(), comments).await)
    }

    /// DMs addressed to `agent`, newest-first.
    pub async fn get_dms(
        &self,
        agent: &str,
        unread_only: bool,
    ) -> Result<Vec<Message>, SwitchboardError> {
        let agent = normalize_name(require("agent", agent)?);
        self.track.dms_for(&agent, unread_only, None).await
    }

    /// DMs between two agents, oldest-first; `limit` keeps the most recent.
    pub async fn get_conversation(
        &self,
        agent_a: &str,
        agent_b: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, SwitchboardError> {
        let a = normalize_name(require("agent", agent_a)?);
        let b = normalize_name(require("other agent", agent_b)?);
        self.track.conversation(&a, &b, limit).await
    }

    pub async fn get_unread(&self, agent: &str) -> Result<UnreadReport, SwitchboardError> {
        let agent = normalize_name(require("agent", agent)?);
        self.unread.unread(&agent).await
    }

    pub async fn unread_summary(&self, agent: &str) -> Result<UnreadSummary, SwitchboardError> {
        let agent = normalize_name(require("agent", agent)?);
        self.unread.summary(&agent).await
    }

    pub async fn mark_read(&self, id: &str) -> Result<MarkReadOutcome, SwitchboardError> {
        self.read_state.mark_read(id).await
    }

    pub async fn mark_all_read(&self, agent: &str) -> Result<ReadSweep, SwitchboardError> {
        self.read_state.mark_all_read(agent).await
    }

    pub async fn mark_mention_read(
        &self,
        message_id: &str,
        agent: &str,
    ) -> Result<u64, SwitchboardError> {
        self.read_state.mark_mention_read(message_id, agent).await
    }

    /// This track's notifications for `agent`, newest-first.
    pub async fn list_notifications(
        &self,
        agent: &str,
        unread_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Notification>, SwitchboardError> {
        let agent = normalize_name(require("agent", agent)?);
        self.notifications
            .list_for(self.track(), &agent, unread_only, limit)
            .await
    }

    /// Delete all of this track's notifications for `agent`.
    pub async fn clear_notifications(&self, agent: &str) -> Result<u64, SwitchboardError> {
        let agent = normalize_name(require("agent", agent)?);
        let deleted = self.notifications.clear_for(self.track(), &agent).await?;
        info!(agent = %agent, deleted, "notifications cleared");
        Ok(deleted)
    }

    /// Delete notifications older than `days` days, across both tracks.
    pub async fn cleanup_notifications(&self, days: u32) -> Result<u64, SwitchboardError> {
        let cutoff = clock::days_ago(days);
        let deleted = self.notifications.delete_older_than(&cutoff).await?;
        info!(days, cutoff = %cutoff, deleted, "old notifications deleted");
        Ok(deleted)
    }

    async fn log_activity(&self, entry: ActivityEntry) {
        if let Err(e) = self.activity.append(&entry).await {
            warn!(error = %e, kind = %entry.kind, agent = %entry.agent, "activity log append failed");
        }
    }
}
