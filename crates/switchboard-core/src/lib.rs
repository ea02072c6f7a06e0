// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Switchboard agent messaging engine.
//!
//! This crate provides the error type, the domain types (agents, tickets,
//! messages, notifications) and the collaborator traits every storage track
//! and directory implementation is written against.

pub mod clock;
pub mod error;
pub mod legacy;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SwitchboardError;
pub use legacy::{LegacyComment, LegacyDirectMessage};
pub use types::{
    ActivityEntry, ActivityKind, Agent, Message, MessageKind, Notification, NotificationKind,
    Priority, ReadSweep, Ticket, Track,
};

// Re-export all collaborator traits at crate root.
pub use traits::{ActivitySink, AgentDirectory, MessageTrack, NotificationStore, TicketStore};

/// Canonical addressing form of an agent name: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
