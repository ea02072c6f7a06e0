// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only activity log.

use rusqlite::params;
use switchboard_core::SwitchboardError;

use crate::database::Database;
use crate::models::ActivityEntry;
use crate::queries::parse_text;

/// Append one activity entry.
pub async fn insert_activity(db: &Database, entry: &ActivityEntry) -> Result<(), SwitchboardError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO activities (id, kind, agent, ticket_id, summary, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.id,
                    entry.kind.as_ref(),
                    entry.agent,
                    entry.ticket_id,
                    entry.summary,
                    entry.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recent activity entries, newest-first.
pub async fn recent_activity(db: &Database, limit: usize) -> Result<Vec<ActivityEntry>, SwitchboardError> {
    let limit = crate::queries::sql_limit(Some(limit));
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, kind, agent, ticket_id, summary, created_at FROM activities
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(ActivityEntry {
                    id: row.get(0)?,
                    kind: parse_text(1, row.get(1)?)?,
                    agent: row.get(2)?,
                    ticket_id: row.get(3)?,
                    summary: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;
    use switchboard_core::ActivityKind;

    #[tokio::test]
    async fn recent_activity_is_newest_first_and_capped() {
        let (db, _dir) = setup_db().await;
        let first = ActivityEntry::new(ActivityKind::CommentPosted, "sam", Some("t-1".into()), "first".into());
        let second = ActivityEntry::new(ActivityKind::DmSent, "max", None, "second".into());
        insert_activity(&db, &first).await.unwrap();
        insert_activity(&db, &second).await.unwrap();

        let recent = recent_activity(&db, 10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0], second);
        assert_eq!(recent[1].kind, ActivityKind::CommentPosted);

        assert_eq!(recent_activity(&db, 1).await.unwrap().len(), 1);
        db.close().await.unwrap();
    }
}
