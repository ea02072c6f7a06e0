// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `switchboard-core` for use across
//! trait boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use switchboard_core::types::{
    ActivityEntry, Agent, Message, Notification, ReadSweep, Ticket, Track,
};
pub use switchboard_core::{LegacyComment, LegacyDirectMessage};
