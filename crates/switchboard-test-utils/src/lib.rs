// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchboard integration tests.
//!
//! Provides in-memory collaborators and a harness that wires both storage
//! tracks over a temp SQLite database.
//!
//! # Components
//!
//! - [`StaticDirectory`] - fixed agent roster
//! - [`StaticTickets`] - fixed ticket set
//! - [`RecordingActivity`] - activity sink that captures entries
//! - [`TestHarness`] - unified service and legacy bridge over one database

pub mod collaborators;
pub mod harness;

pub use collaborators::{RecordingActivity, StaticDirectory, StaticTickets};
pub use harness::TestHarness;
