// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket rows.

use rusqlite::{OptionalExtension, params};
use switchboard_core::SwitchboardError;

use crate::database::Database;
use crate::models::Ticket;

/// Insert or update a ticket keyed by its storage id.
pub async fn upsert_ticket(db: &Database, ticket: &Ticket) -> Result<(), SwitchboardError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tickets (id, human_id, title) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                   human_id = excluded.human_id,
                   title = excluded.title",
                params![ticket.id, ticket.human_id, ticket.title],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find a ticket by storage id, falling back to its human id (case-insensitive).
pub async fn find_ticket(db: &Database, reference: &str) -> Result<Option<Ticket>, SwitchboardError> {
    let reference = reference.trim().to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, human_id, title FROM tickets
                 WHERE id = ?1 OR human_id = ?1
                 ORDER BY (id = ?1) DESC
                 LIMIT 1",
                params![reference],
                |row| {
                    Ok(Ticket {
                        id: row.get(0)?,
                        human_id: row.get(1)?,
                        title: row.get(2)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    #[tokio::test]
    async fn find_by_id_or_human_id() {
        let (db, _dir) = setup_db().await;
        let ticket = Ticket {
            id: "t-1".into(),
            human_id: "AGT-9".into(),
            title: Some("Fix the widget".into()),
        };
        upsert_ticket(&db, &ticket).await.unwrap();

        assert_eq!(find_ticket(&db, "t-1").await.unwrap().unwrap(), ticket);
        assert_eq!(find_ticket(&db, "AGT-9").await.unwrap().unwrap(), ticket);
        assert_eq!(find_ticket(&db, "agt-9").await.unwrap().unwrap(), ticket);
        assert!(find_ticket(&db, "AGT-10").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_updates_title() {
        let (db, _dir) = setup_db().await;
        let mut ticket = Ticket {
            id: "t-1".into(),
            human_id: "AGT-9".into(),
            title: None,
        };
        upsert_ticket(&db, &ticket).await.unwrap();
        ticket.title = Some("Renamed".into());
        upsert_ticket(&db, &ticket).await.unwrap();
        assert_eq!(
            find_ticket(&db, "t-1").await.unwrap().unwrap().title.as_deref(),
            Some("Renamed")
        );
        db.close().await.unwrap();
    }
}
