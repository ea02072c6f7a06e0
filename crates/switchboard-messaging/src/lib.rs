// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent messaging and notification engine.
//!
//! [`MessagingService`] runs the comment and direct-message flows over one
//! storage track: mention extraction, persistence, notification fan-out,
//! unread aggregation and read-state transitions. [`LegacyBridge`] exposes
//! the same engine over the legacy track with the legacy record shapes.

pub mod compat;
pub mod enrich;
pub mod fanout;
pub mod mentions;
pub mod preview;
pub mod read_state;
pub mod service;
pub mod unread;

#[cfg(test)]
mod testing;

pub use compat::LegacyBridge;
pub use enrich::EnrichedMessage;
pub use fanout::{DeliveryFailure, FanoutReport, NotificationIntent};
pub use mentions::parse_mentions;
pub use read_state::{MarkReadOutcome, ReadTarget};
pub use service::{Collaborators, CommentReceipt, DmReceipt, MessagingService};
pub use unread::{UnreadDetail, UnreadMention, UnreadReport, UnreadSummary};
