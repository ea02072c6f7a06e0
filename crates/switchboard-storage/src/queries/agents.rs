// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent directory rows.

use rusqlite::{OptionalExtension, Row, params};
use switchboard_core::{SwitchboardError, normalize_name};

use crate::database::Database;
use crate::models::Agent;

fn row_to_agent(row: &Row<'_>) -> rusqlite::Result<Agent> {
    Ok(Agent {
        id: row.get(0)?,
        name: row.get(1)?,
        display_name: row.get(2)?,
        avatar: row.get(3)?,
    })
}

/// Insert or update an agent keyed by its normalized name.
///
/// The stored `id` of an existing agent is kept.
pub async fn upsert_agent(db: &Database, agent: &Agent) -> Result<(), SwitchboardError> {
    let mut agent = agent.clone();
    agent.name = normalize_name(&agent.name);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO agents (id, name, display_name, avatar) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name) DO UPDATE SET
                   display_name = excluded.display_name,
                   avatar = excluded.avatar",
                params![agent.id, agent.name, agent.display_name, agent.avatar],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up an agent by name, case-insensitively.
pub async fn get_agent_by_name(db: &Database, name: &str) -> Result<Option<Agent>, SwitchboardError> {
    let name = normalize_name(name);
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, display_name, avatar FROM agents WHERE name = ?1",
                params![name],
                row_to_agent,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Every agent, ordered by name.
pub async fn list_agents(db: &Database) -> Result<Vec<Agent>, SwitchboardError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, display_name, avatar FROM agents ORDER BY name")?;
            let rows = stmt.query_map([], row_to_agent)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
