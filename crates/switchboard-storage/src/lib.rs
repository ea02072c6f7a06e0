// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Switchboard messaging engine.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, typed query modules for both the
//! unified and the legacy message schemas, and implementations of every
//! collaborator trait the engine consumes.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod tracks;

pub use adapter::{SqliteActivityLog, SqliteDirectory, SqliteNotifications, SqliteStorage, SqliteTickets};
pub use database::Database;
pub use tracks::{LegacyTrack, UnifiedTrack};
