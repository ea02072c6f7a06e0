// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage track trait shared by the unified and legacy message schemas.

use async_trait::async_trait;

use crate::error::SwitchboardError;
use crate::types::{Message, ReadSweep, Track};

/// One storage generation of messages.
///
/// Both the unified schema and the legacy comment/DM split implement this
/// trait, and the engine runs identically over either. Tracks never read each
/// other's rows.
///
/// Ordering contract: timestamps are the sort key and equal timestamps keep
/// insertion order. Newest-first results are the exact reverse of the
/// oldest-first order.
#[async_trait]
pub trait MessageTrack: Send + Sync {
    /// Which generation this is.
    fn track(&self) -> Track;

    /// Persist a new message. The message is the operation of record.
    async fn insert(&self, message: &Message) -> Result<(), SwitchboardError>;

    /// Point lookup by message id.
    async fn get(&self, id: &str) -> Result<Option<Message>, SwitchboardError>;

    /// All comments on a ticket, oldest-first.
    async fn comments_for_ticket(&self, ticket_id: &str) -> Result<Vec<Message>, SwitchboardError>;

    /// DMs addressed to `agent`, newest-first, optionally only unread, optionally capped.
    async fn dms_for(
        &self,
        agent: &str,
        unread_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, SwitchboardError>;

    /// Exact number of unread DMs addressed to `agent`.
    async fn count_unread_dms(&self, agent: &str) -> Result<u64, SwitchboardError>;

    /// DMs between two agents in either direction, oldest-first, keeping only
    /// the last `limit` entries when given.
    async fn conversation(
        &self,
        agent_a: &str,
        agent_b: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, SwitchboardError>;

    /// Flip one DM to read. Returns `true` if it was unread.
    async fn mark_dm_read(&self, id: &str) -> Result<bool, SwitchboardError>;

    /// Flip every unread DM addressed to `agent` and every unread mention
    /// notification of this track for `agent`, from one consistent snapshot.
    async fn mark_all_read(&self, agent: &str) -> Result<ReadSweep, SwitchboardError>;
}
