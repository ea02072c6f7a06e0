// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Legacy API surface.
//!
//! Clients of the split comment/DM schema keep their record shapes. Every
//! operation runs through the same [`MessagingService`] as the unified
//! surface, over the legacy track, so validation, fan-out, ordering,
//! truncation and unread semantics cannot drift between the two.

use std::sync::Arc;

use switchboard_config::model::MessagingConfig;
use switchboard_core::{
    LegacyComment, LegacyDirectMessage, Message, MessageTrack, Priority, ReadSweep,
    SwitchboardError, Track,
};

use crate::read_state::MarkReadOutcome;
use crate::service::{Collaborators, CommentReceipt, DmReceipt, MessagingService};
use crate::unread::UnreadReport;

pub struct LegacyBridge {
    service: MessagingService,
}

impl LegacyBridge {
    /// Build the bridge over a legacy track. Any other track is refused.
    pub fn new(
        track: Arc<dyn MessageTrack>,
        collaborators: Collaborators,
        config: MessagingConfig,
    ) -> Result<Self, SwitchboardError> {
        if track.track() != Track::Legacy {
            return Err(SwitchboardError::Internal(format!(
                "legacy bridge needs the legacy track, got {}",
                track.track()
            )));
        }
        Ok(Self {
            service: MessagingService::new(track, collaborators, config),
        })
    }

    /// The engine behind the bridge.
    pub fn service(&self) -> &MessagingService {
        &self.service
    }

    pub async fn add_comment(
        &self,
        ticket_ref: &str,
        from_agent: &str,
        content: &str,
    ) -> Result<CommentReceipt, SwitchboardError> {
        self.service.post_comment(ticket_ref, from_agent, content).await
    }

    pub async fn send_direct_message(
        &self,
        from_agent: &str,
        to_agent: &str,
        content: &str,
        ticket_ref: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<DmReceipt, SwitchboardError> {
        self.service
            .send_dm(from_agent, to_agent, content, ticket_ref, priority)
            .await
    }

    /// Ticket comments in the legacy shape, oldest-first.
    pub async fn ticket_comments(
        &self,
        ticket_ref: &str,
    ) -> Result<Vec<LegacyComment>, SwitchboardError> {
        let comments = self.service.get_comments(ticket_ref).await?;
        comments
            .iter()
            .map(|c| LegacyComment::try_from(&c.message))
            .collect()
    }

    /// DMs addressed to `agent` in the legacy shape, newest-first.
    pub async fn direct_messages(
        &self,
        agent: &str,
        unread_only: bool,
    ) -> Result<Vec<LegacyDirectMessage>, SwitchboardError> {
        let dms = self.service.get_dms(agent, unread_only).await?;
        to_legacy_dms(&dms)
    }

    pub async fn conversation(
        &self,
        agent_a: &str,
        agent_b: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LegacyDirectMessage>, SwitchboardError> {
        let dms = self.service.get_conversation(agent_a, agent_b, limit).await?;
        to_legacy_dms(&dms)
    }

    pub async fn unread(&self, agent: &str) -> Result<UnreadReport, SwitchboardError> {
        self.service.get_unread(agent).await
    }

    pub async fn mark_read(&self, id: &str) -> Result<MarkReadOutcome, SwitchboardError> {
        self.service.mark_read(id).await
    }

    pub async fn mark_all_read(&self, agent: &str) -> Result<ReadSweep, SwitchboardError> {
        self.service.mark_all_read(agent).await
    }
}

fn to_legacy_dms(messages: &[Message]) -> Result<Vec<LegacyDirectMessage>, SwitchboardError> {
    messages.iter().map(LegacyDirectMessage::try_from).collect()
}
