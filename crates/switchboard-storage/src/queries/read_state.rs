// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bulk read-state sweeps.
//!
//! A sweep flips every unread DM addressed to an agent and every unread
//! notification of the same track for that agent inside one IMMEDIATE
//! transaction, so the counts it reports describe a single snapshot. Rows
//! committed after the transaction starts stay unread.

use rusqlite::{TransactionBehavior, params};
use switchboard_core::SwitchboardError;

use crate::database::Database;
use crate::models::{ReadSweep, Track};

/// Mark everything read for `agent` on the given track.
pub async fn mark_all_read(
    db: &Database,
    track: Track,
    agent: &str,
) -> Result<ReadSweep, SwitchboardError> {
    let agent = agent.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let dms = match track {
                Track::Unified => tx.execute(
                    "UPDATE messages SET read = 1 WHERE kind = 'dm' AND recipient = ?1 AND read = 0",
                    params![agent],
                )?,
                Track::Legacy => tx.execute(
                    "UPDATE legacy_direct_messages SET read = 1 WHERE to_agent = ?1 AND read = 0",
                    params![agent],
                )?,
            };
            let mentions = tx.execute(
                "UPDATE notifications SET read = 1
                 WHERE track = ?1 AND recipient = ?2 AND kind = 'mention' AND read = 0",
                params![track.as_ref(), agent],
            )?;
            // DM notifications follow their DMs but are not counted twice.
            tx.execute(
                "UPDATE notifications SET read = 1
                 WHERE track = ?1 AND recipient = ?2 AND kind = 'dm' AND read = 0",
                params![track.as_ref(), agent],
            )?;
            tx.commit()?;
            Ok(ReadSweep {
                dms: dms as u64,
                mentions: mentions as u64,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}
