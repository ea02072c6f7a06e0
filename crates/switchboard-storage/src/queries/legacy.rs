// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Legacy split-schema operations.
//!
//! Ticket comments live in `legacy_comments`, direct messages in
//! `legacy_direct_messages`. Nothing here reads the unified `messages` table.

use rusqlite::{OptionalExtension, Row, params};
use switchboard_core::SwitchboardError;

use crate::database::Database;
use crate::models::{LegacyComment, LegacyDirectMessage};
use crate::queries::{count_to_u64, decode_mentions, encode_mentions, parse_text, sql_limit};

const COMMENT_COLUMNS: &str =
    "id, ticket_id, ticket_human_id, from_agent, content, mentions, created_at";

const DM_COLUMNS: &str =
    "id, from_agent, to_agent, content, ticket_id, ticket_human_id, priority, read, created_at";

fn row_to_comment(row: &Row<'_>) -> rusqlite::Result<LegacyComment> {
    Ok(LegacyComment {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        ticket_human_id: row.get(2)?,
        from_agent: row.get(3)?,
        content: row.get(4)?,
        mentions: decode_mentions(5, row.get(5)?)?,
        created_at: row.get(6)?,
    })
}

fn row_to_dm(row: &Row<'_>) -> rusqlite::Result<LegacyDirectMessage> {
    Ok(LegacyDirectMessage {
        id: row.get(0)?,
        from_agent: row.get(1)?,
        to_agent: row.get(2)?,
        content: row.get(3)?,
        ticket_id: row.get(4)?,
        ticket_human_id: row.get(5)?,
        priority: parse_text(6, row.get(6)?)?,
        read: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Insert a legacy ticket comment.
pub async fn insert_comment(db: &Database, comment: &LegacyComment) -> Result<(), SwitchboardError> {
    let mentions = encode_mentions(&comment.mentions)?;
    let comment = comment.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO legacy_comments (id, ticket_id, ticket_human_id, from_agent, content, \
                 mentions, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    comment.id,
                    comment.ticket_id,
                    comment.ticket_human_id,
                    comment.from_agent,
                    comment.content,
                    mentions,
                    comment.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a legacy direct message.
pub async fn insert_direct_message(
    db: &Database,
    dm: &LegacyDirectMessage,
) -> Result<(), SwitchboardError> {
    let dm = dm.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO legacy_direct_messages (id, from_agent, to_agent, content, ticket_id, \
                 ticket_human_id, priority, read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    dm.id,
                    dm.from_agent,
                    dm.to_agent,
                    dm.content,
                    dm.ticket_id,
                    dm.ticket_human_id,
                    dm.priority.as_ref(),
                    dm.read,
                    dm.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a legacy comment by ID.
pub async fn get_comment(db: &Database, id: &str) -> Result<Option<LegacyComment>, SwitchboardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COMMENT_COLUMNS} FROM legacy_comments WHERE id = ?1"),
                params![id],
                row_to_comment,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a legacy direct message by ID.
pub async fn get_direct_message(
    db: &Database,
    id: &str,
) -> Result<Option<LegacyDirectMessage>, SwitchboardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {DM_COLUMNS} FROM legacy_direct_messages WHERE id = ?1"),
                params![id],
                row_to_dm,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Comments on a ticket, oldest-first.
pub async fn comments_for_ticket(
    db: &Database,
    ticket_id: &str,
) -> Result<Vec<LegacyComment>, SwitchboardError> {
    let ticket_id = ticket_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMENT_COLUMNS} FROM legacy_comments
                 WHERE ticket_id = ?1
                 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![ticket_id], row_to_comment)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Direct messages addressed to `agent`, newest-first.
pub async fn direct_messages_for(
    db: &Database,
    agent: &str,
    unread_only: bool,
    limit: Option<usize>,
) -> Result<Vec<LegacyDirectMessage>, SwitchboardError> {
    let agent = agent.to_string();
    let limit = sql_limit(limit);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DM_COLUMNS} FROM legacy_direct_messages
                 WHERE to_agent = ?1 AND (?2 = 0 OR read = 0)
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![agent, unread_only, limit], row_to_dm)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Exact count of unread legacy DMs addressed to `agent`.
pub async fn count_unread_direct_messages(
    db: &Database,
    agent: &str,
) -> Result<u64, SwitchboardError> {
    let agent = agent.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM legacy_direct_messages WHERE to_agent = ?1 AND read = 0",
                params![agent],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(count_to_u64)
        .map_err(crate::database::map_tr_err)
}

/// Legacy DMs between two agents, oldest-first, keeping the last `limit`.
pub async fn conversation(
    db: &Database,
    agent_a: &str,
    agent_b: &str,
    limit: Option<usize>,
) -> Result<Vec<LegacyDirectMessage>, SwitchboardError> {
    let a = agent_a.to_string();
    let b = agent_b.to_string();
    let limit = sql_limit(limit);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DM_COLUMNS} FROM legacy_direct_messages
                 WHERE (from_agent = ?1 AND to_agent = ?2) OR (from_agent = ?2 AND to_agent = ?1)
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![a, b, limit], row_to_dm)?;
            let mut dms = rows.collect::<Result<Vec<_>, _>>()?;
            dms.reverse();
            Ok(dms)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip one legacy DM to read. Returns `true` if it was unread.
pub async fn mark_direct_message_read(db: &Database, id: &str) -> Result<bool, SwitchboardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE legacy_direct_messages SET read = 1 WHERE id = ?1 AND read = 0",
                params![id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
