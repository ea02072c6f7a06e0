// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification persistence.

use async_trait::async_trait;

use crate::error::SwitchboardError;
use crate::types::{Notification, NotificationKind, Track};

/// Store for per-recipient notification records.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<(), SwitchboardError>;

    async fn get(&self, id: &str) -> Result<Option<Notification>, SwitchboardError>;

    /// Flip one notification to read. Returns `true` if it was unread.
    async fn mark_read(&self, id: &str) -> Result<bool, SwitchboardError>;

    /// Flip the notifications of `kind` that `message_id` produced for
    /// `recipient`. Returns how many were flipped.
    async fn mark_for_message(
        &self,
        message_id: &str,
        recipient: &str,
        kind: NotificationKind,
    ) -> Result<u64, SwitchboardError>;

    /// Notifications of one track for `recipient`, newest-first.
    async fn list_for(
        &self,
        track: Track,
        recipient: &str,
        unread_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Notification>, SwitchboardError>;

    /// Unread mention notifications of one track for `recipient`, newest-first.
    async fn unread_mentions(
        &self,
        track: Track,
        recipient: &str,
        limit: usize,
    ) -> Result<Vec<Notification>, SwitchboardError>;

    /// Exact number of unread mention notifications of one track for `recipient`.
    async fn count_unread_mentions(
        &self,
        track: Track,
        recipient: &str,
    ) -> Result<u64, SwitchboardError>;

    /// Delete every notification of one track addressed to `recipient`.
    async fn clear_for(&self, track: Track, recipient: &str) -> Result<u64, SwitchboardError>;

    /// Delete notifications of every track created strictly before `cutoff`.
    async fn delete_older_than(&self, cutoff: &str) -> Result<u64, SwitchboardError>;
}
