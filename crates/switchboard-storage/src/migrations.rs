// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.
//! V1 carries the legacy split schema and the shared tables, V2 adds the
//! unified message table.

use switchboard_core::SwitchboardError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), SwitchboardError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| SwitchboardError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
