// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unified message table operations.
//!
//! Comments and DMs share one table; `kind` decides which columns are set.
//! Oldest-first reads order by `(created_at, rowid)`, newest-first reads by
//! the exact reverse.

use rusqlite::{OptionalExtension, Row, params};
use switchboard_core::SwitchboardError;

use crate::database::Database;
use crate::models::Message;
use crate::queries::{count_to_u64, decode_mentions, encode_mentions, parse_text, sql_limit};

const COLUMNS: &str = "id, kind, sender, recipient, ticket_id, ticket_human_id, body, mentions, \
                       priority, read, created_at";

fn row_to_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    let priority: Option<String> = row.get(8)?;
    Ok(Message {
        id: row.get(0)?,
        kind: parse_text(1, row.get(1)?)?,
        sender: row.get(2)?,
        recipient: row.get(3)?,
        ticket_id: row.get(4)?,
        ticket_human_id: row.get(5)?,
        body: row.get(6)?,
        mentions: decode_mentions(7, row.get(7)?)?,
        priority: priority.map(|p| parse_text(8, p)).transpose()?,
        read: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Insert a comment or DM.
pub async fn insert_message(db: &Database, message: &Message) -> Result<(), SwitchboardError> {
    let mentions = encode_mentions(&message.mentions)?;
    let message = message.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, kind, sender, recipient, ticket_id, ticket_human_id, \
                 body, mentions, priority, read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    message.id,
                    message.kind.as_ref(),
                    message.sender,
                    message.recipient,
                    message.ticket_id,
                    message.ticket_human_id,
                    message.body,
                    mentions,
                    message.priority.map(|p| p.to_string()),
                    message.read,
                    message.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a message by ID.
pub async fn get_message(db: &Database, id: &str) -> Result<Option<Message>, SwitchboardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM messages WHERE id = ?1"),
                params![id],
                row_to_message,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All comments on a ticket, oldest-first.
pub async fn comments_for_ticket(
    db: &Database,
    ticket_id: &str,
) -> Result<Vec<Message>, SwitchboardError> {
    let ticket_id = ticket_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM messages
                 WHERE kind = 'comment' AND ticket_id = ?1
                 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![ticket_id], row_to_message)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// DMs addressed to `agent`, newest-first.
pub async fn dms_for(
    db: &Database,
    agent: &str,
    unread_only: bool,
    limit: Option<usize>,
) -> Result<Vec<Message>, SwitchboardError> {
    let agent = agent.to_string();
    let limit = sql_limit(limit);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM messages
                 WHERE kind = 'dm' AND recipient = ?1 AND (?2 = 0 OR read = 0)
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![agent, unread_only, limit], row_to_message)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Exact count of unread DMs addressed to `agent`.
pub async fn count_unread_dms(db: &Database, agent: &str) -> Result<u64, SwitchboardError> {
    let agent = agent.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE kind = 'dm' AND recipient = ?1 AND read = 0",
                params![agent],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(count_to_u64)
        .map_err(crate::database::map_tr_err)
}

/// DMs exchanged between two agents, oldest-first, keeping the last `limit`.
pub async fn conversation(
    db: &Database,
    agent_a: &str,
    agent_b: &str,
    limit: Option<usize>,
) -> Result<Vec<Message>, SwitchboardError> {
    let a = agent_a.to_string();
    let b = agent_b.to_string();
    let limit = sql_limit(limit);
    db.connection()
        .call(move |conn| {
            // Select the newest `limit` rows, then flip them back to oldest-first.
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM messages
                 WHERE kind = 'dm'
                   AND ((sender = ?1 AND recipient = ?2) OR (sender = ?2 AND recipient = ?1))
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![a, b, limit], row_to_message)?;
            let mut messages = rows.collect::<Result<Vec<_>, _>>()?;
            messages.reverse();
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip one DM to read. Returns `true` if it was unread.
pub async fn mark_dm_read(db: &Database, id: &str) -> Result<bool, SwitchboardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE messages SET read = 1 WHERE id = ?1 AND kind = 'dm' AND read = 0",
                params![id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;
    use switchboard_core::{MessageKind, Priority, Ticket};

    fn ticket() -> Ticket {
        Ticket {
            id: "t-1".into(),
            human_id: "AGT-9".into(),
            title: None,
        }
    }

    fn dm_at(from: &str, to: &str, body: &str, at: &str) -> Message {
        let mut m = Message::direct(from, to, body, None, Priority::Normal);
        m.created_at = at.to_string();
        m
    }

    #[tokio::test]
    async fn insert_and_get_comment_roundtrips() {
        let (db, _dir) = setup_db().await;
        let msg = Message::comment(&ticket(), "sam", "hi @leo", vec!["leo".into()]);
        insert_message(&db, &msg).await.unwrap();

        let got = get_message(&db, &msg.id).await.unwrap().unwrap();
        assert_eq!(got, msg);
        assert_eq!(got.kind, MessageKind::Comment);
        assert!(get_message(&db, "missing").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn dm_without_recipient_violates_shape_check() {
        let (db, _dir) = setup_db().await;
        let mut msg = Message::direct("max", "sam", "hey", None, Priority::Urgent);
        msg.recipient = None;
        assert!(insert_message(&db, &msg).await.is_err());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn comments_are_oldest_first_with_insertion_tiebreak() {
        let (db, _dir) = setup_db().await;
        let mut ids = Vec::new();
        for body in ["one", "two", "three"] {
            let mut msg = Message::comment(&ticket(), "sam", body, Vec::new());
            msg.created_at = "2026-01-01T00:00:00.000Z".into();
            ids.push(msg.id.clone());
            insert_message(&db, &msg).await.unwrap();
        }
        let got: Vec<String> = comments_for_ticket(&db, "t-1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(got, ids);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn dms_for_filters_unread_and_orders_newest_first() {
        let (db, _dir) = setup_db().await;
        let first = dm_at("max", "sam", "first", "2026-01-01T00:00:01.000Z");
        let second = dm_at("leo", "sam", "second", "2026-01-01T00:00:02.000Z");
        let outgoing = dm_at("sam", "max", "reply", "2026-01-01T00:00:03.000Z");
        for m in [&first, &second, &outgoing] {
            insert_message(&db, m).await.unwrap();
        }

        let all = dms_for(&db, "sam", false, None).await.unwrap();
        assert_eq!(all.iter().map(|m| m.body.as_str()).collect::<Vec<_>>(), ["second", "first"]);
        assert_eq!(count_unread_dms(&db, "sam").await.unwrap(), 2);

        assert!(mark_dm_read(&db, &first.id).await.unwrap());
        assert!(!mark_dm_read(&db, &first.id).await.unwrap());

        let unread = dms_for(&db, "sam", true, None).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, second.id);
        assert_eq!(count_unread_dms(&db, "sam").await.unwrap(), 1);

        let capped = dms_for(&db, "sam", false, Some(1)).await.unwrap();
        assert_eq!(capped[0].id, second.id);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn conversation_keeps_last_n_oldest_first() {
        let (db, _dir) = setup_db().await;
        let mut ids = Vec::new();
        for i in 0..5 {
            let (from, to) = if i % 2 == 0 { ("max", "sam") } else { ("sam", "max") };
            let m = dm_at(from, to, &format!("m{i}"), &format!("2026-01-01T00:00:0{i}.000Z"));
            ids.push(m.id.clone());
            insert_message(&db, &m).await.unwrap();
        }
        insert_message(&db, &dm_at("leo", "sam", "other", "2026-01-01T00:00:09.000Z"))
            .await
            .unwrap();

        let full = conversation(&db, "sam", "max", None).await.unwrap();
        assert_eq!(full.iter().map(|m| m.id.clone()).collect::<Vec<_>>(), ids);

        let last_two = conversation(&db, "max", "sam", Some(2)).await.unwrap();
        assert_eq!(
            last_two.iter().map(|m| m.body.as_str()).collect::<Vec<_>>(),
            ["m3", "m4"]
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn equal_timestamps_break_ties_by_insertion_order() {
        let (db, _dir) = setup_db().await;
        let mut ids = Vec::new();
        for i in 0..4 {
            let (from, to) = if i % 2 == 0 { ("max", "sam") } else { ("sam", "max") };
            let m = dm_at(from, to, &format!("m{i}"), "2026-01-01T00:00:00.000Z");
            ids.push(m.id.clone());
            insert_message(&db, &m).await.unwrap();
        }

        let newest_first: Vec<String> = dms_for(&db, "sam", false, None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(newest_first, [ids[2].clone(), ids[0].clone()]);

        let last_three: Vec<String> = conversation(&db, "sam", "max", Some(3))
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(last_three, ids[1..].to_vec());

        let full: Vec<String> = conversation(&db, "max", "sam", None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(full, ids);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_dm_read_ignores_comments() {
        let (db, _dir) = setup_db().await;
        let msg = Message::comment(&ticket(), "sam", "note", Vec::new());
        insert_message(&db, &msg).await.unwrap();
        assert!(!mark_dm_read(&db, &msg.id).await.unwrap());
        db.close().await.unwrap();
    }
}
