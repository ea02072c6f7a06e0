// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification CRUD, read flips and retention.
//!
//! Both tracks share one table; the `track` column keeps their mention
//! aggregates apart.

use rusqlite::{OptionalExtension, Row, params};
use switchboard_core::{NotificationKind, SwitchboardError};

use crate::database::Database;
use crate::models::{Notification, Track};
use crate::queries::{count_to_u64, parse_text, sql_limit};

const COLUMNS: &str =
    "id, recipient, sender, kind, title, body, read, ticket_id, message_id, track, created_at";

fn row_to_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        recipient: row.get(1)?,
        sender: row.get(2)?,
        kind: parse_text(3, row.get(3)?)?,
        title: row.get(4)?,
        body: row.get(5)?,
        read: row.get(6)?,
        ticket_id: row.get(7)?,
        message_id: row.get(8)?,
        track: parse_text(9, row.get(9)?)?,
        created_at: row.get(10)?,
    })
}

/// Insert a notification. A second notification for the same
/// (message, recipient, kind) violates the unique index.
pub async fn insert_notification(
    db: &Database,
    notification: &Notification,
) -> Result<(), SwitchboardError> {
    let n = notification.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notifications (id, recipient, sender, kind, title, body, read, \
                 ticket_id, message_id, track, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    n.id,
                    n.recipient,
                    n.sender,
                    n.kind.as_ref(),
                    n.title,
                    n.body,
                    n.read,
                    n.ticket_id,
                    n.message_id,
                    n.track.as_ref(),
                    n.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a notification by ID.
pub async fn get_notification(
    db: &Database,
    id: &str,
) -> Result<Option<Notification>, SwitchboardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM notifications WHERE id = ?1"),
                params![id],
                row_to_notification,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip one notification to read. Returns `true` if it was unread.
pub async fn mark_read(db: &Database, id: &str) -> Result<bool, SwitchboardError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE notifications SET read = 1 WHERE id = ?1 AND read = 0",
                params![id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip the `kind` notifications `message_id` produced for `recipient`.
pub async fn mark_for_message(
    db: &Database,
    message_id: &str,
    recipient: &str,
    kind: NotificationKind,
) -> Result<u64, SwitchboardError> {
    let message_id = message_id.to_string();
    let recipient = recipient.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE notifications SET read = 1
                 WHERE message_id = ?1 AND recipient = ?2 AND kind = ?3 AND read = 0",
                params![message_id, recipient, kind.as_ref()],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Notifications of one track for `recipient`, newest-first.
pub async fn list_for(
    db: &Database,
    track: Track,
    recipient: &str,
    unread_only: bool,
    limit: Option<usize>,
) -> Result<Vec<Notification>, SwitchboardError> {
    let recipient = recipient.to_string();
    let limit = sql_limit(limit);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM notifications
                 WHERE track = ?1 AND recipient = ?2 AND (?3 = 0 OR read = 0)
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?4"
            ))?;
            let rows = stmt.query_map(
                params![track.as_ref(), recipient, unread_only, limit],
                row_to_notification,
            )?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Unread mention notifications of one track, newest-first.
///
/// Self-mentions never produce a notification, but the sender filter keeps
/// the aggregate exact if one was written by another tool.
pub async fn unread_mentions(
    db: &Database,
    track: Track,
    recipient: &str,
    limit: usize,
) -> Result<Vec<Notification>, SwitchboardError> {
    let recipient = recipient.to_string();
    let limit = sql_limit(Some(limit));
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM notifications
                 WHERE track = ?1 AND recipient = ?2 AND kind = 'mention' AND read = 0
                   AND sender <> recipient
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3"
            ))?;
            let rows = stmt.query_map(params![track.as_ref(), recipient, limit], row_to_notification)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Exact count of unread mention notifications of one track.
pub async fn count_unread_mentions(
    db: &Database,
    track: Track,
    recipient: &str,
) -> Result<u64, SwitchboardError> {
    let recipient = recipient.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM notifications
                 WHERE track = ?1 AND recipient = ?2 AND kind = 'mention' AND read = 0
                   AND sender <> recipient",
                params![track.as_ref(), recipient],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(count_to_u64)
        .map_err(crate::database::map_tr_err)
}

/// Delete every notification of one track addressed to `recipient`.
pub async fn clear_for(db: &Database, track: Track, recipient: &str) -> Result<u64, SwitchboardError> {
    let recipient = recipient.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM notifications WHERE track = ?1 AND recipient = ?2",
                params![track.as_ref(), recipient],
            )?;
            Ok(deleted as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete notifications created strictly before `cutoff`.
pub async fn delete_older_than(db: &Database, cutoff: &str) -> Result<u64, SwitchboardError> {
    let cutoff = cutoff.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM notifications WHERE created_at < ?1",
                params![cutoff],
            )?;
            Ok(deleted as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    fn notification(id: &str, kind: NotificationKind, track: Track, at: &str) -> Notification {
        Notification {
            id: id.into(),
            recipient: "leo".into(),
            sender: "sam".into(),
            kind,
            title: "Sam mentioned you".into(),
            body: "AGT-9: hello".into(),
            read: false,
            ticket_id: Some("t-1".into()),
            message_id: format!("msg-{id}"),
            track,
            created_at: at.into(),
        }
    }

    #[tokio::test]
    async fn insert_get_and_mark_read() {
        let (db, _dir) = setup_db().await;
        let n = notification("n-1", NotificationKind::Mention, Track::Unified, "2026-01-01T00:00:00.000Z");
        insert_notification(&db, &n).await.unwrap();
        assert_eq!(get_notification(&db, "n-1").await.unwrap().unwrap(), n);

        assert!(mark_read(&db, "n-1").await.unwrap());
        assert!(!mark_read(&db, "n-1").await.unwrap());
        assert!(get_notification(&db, "n-1").await.unwrap().unwrap().read);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_message_recipient_kind_is_rejected() {
        let (db, _dir) = setup_db().await;
        let n = notification("n-1", NotificationKind::Mention, Track::Unified, "2026-01-01T00:00:00.000Z");
        insert_notification(&db, &n).await.unwrap();
        let mut dup = n.clone();
        dup.id = "n-2".into();
        assert!(insert_notification(&db, &dup).await.is_err());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mention_aggregates_are_per_track() {
        let (db, _dir) = setup_db().await;
        let at = "2026-01-01T00:00:00.000Z";
        insert_notification(&db, &notification("u-1", NotificationKind::Mention, Track::Unified, at))
            .await
            .unwrap();
        insert_notification(&db, &notification("u-2", NotificationKind::Dm, Track::Unified, at))
            .await
            .unwrap();
        insert_notification(&db, &notification("l-1", NotificationKind::Mention, Track::Legacy, at))
            .await
            .unwrap();

        assert_eq!(count_unread_mentions(&db, Track::Unified, "leo").await.unwrap(), 1);
        assert_eq!(count_unread_mentions(&db, Track::Legacy, "leo").await.unwrap(), 1);
        let unified = unread_mentions(&db, Track::Unified, "leo", 10).await.unwrap();
        assert_eq!(unified.len(), 1);
        assert_eq!(unified[0].id, "u-1");

        assert_eq!(list_for(&db, Track::Unified, "leo", false, None).await.unwrap().len(), 2);
        assert_eq!(list_for(&db, Track::Unified, "leo", false, Some(1)).await.unwrap().len(), 1);
        assert_eq!(list_for(&db, Track::Legacy, "leo", true, None).await.unwrap().len(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_for_message_only_touches_matching_kind() {
        let (db, _dir) = setup_db().await;
        let at = "2026-01-01T00:00:00.000Z";
        let n = notification("n-1", NotificationKind::Dm, Track::Unified, at);
        insert_notification(&db, &n).await.unwrap();

        let flipped = mark_for_message(&db, &n.message_id, "leo", NotificationKind::Mention)
            .await
            .unwrap();
        assert_eq!(flipped, 0);
        let flipped = mark_for_message(&db, &n.message_id, "leo", NotificationKind::Dm)
            .await
            .unwrap();
        assert_eq!(flipped, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn clear_and_age_cleanup() {
        let (db, _dir) = setup_db().await;
        insert_notification(
            &db,
            &notification("old", NotificationKind::Mention, Track::Unified, "2020-01-01T00:00:00.000Z"),
        )
        .await
        .unwrap();
        insert_notification(
            &db,
            &notification("new", NotificationKind::Mention, Track::Legacy, "2026-01-01T00:00:00.000Z"),
        )
        .await
        .unwrap();

        assert_eq!(delete_older_than(&db, "2025-01-01T00:00:00.000Z").await.unwrap(), 1);
        assert!(get_notification(&db, "old").await.unwrap().is_none());
        assert_eq!(clear_for(&db, Track::Unified, "leo").await.unwrap(), 0);
        assert_eq!(clear_for(&db, Track::Legacy, "leo").await.unwrap(), 1);
        assert!(list_for(&db, Track::Legacy, "leo", false, None).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
