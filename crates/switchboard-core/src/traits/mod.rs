// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Every trait uses `#[async_trait]` so implementations can be shared as
//! `Arc<dyn Trait>` across tasks.

pub mod activity;
pub mod directory;
pub mod notifications;
pub mod tickets;
pub mod track;

pub use activity::ActivitySink;
pub use directory::AgentDirectory;
pub use notifications::NotificationStore;
pub use tickets::TicketStore;
pub use track::MessageTrack;
