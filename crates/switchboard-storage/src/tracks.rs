// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`MessageTrack`] implementations for the two storage generations.

use async_trait::async_trait;

use switchboard_core::{
    LegacyComment, LegacyDirectMessage, Message, MessageKind, MessageTrack, ReadSweep,
    SwitchboardError, Track,
};

use crate::database::Database;
use crate::queries;

/// The unified `messages` table.
#[derive(Clone)]
pub struct UnifiedTrack {
    db: Database,
}

impl UnifiedTrack {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageTrack for UnifiedTrack {
    fn track(&self) -> Track {
        Track::Unified
    }

    async fn insert(&self, message: &Message) -> Result<(), SwitchboardError> {
        queries::messages::insert_message(&self.db, message).await
    }

    async fn get(&self, id: &str) -> Result<Option<Message>, SwitchboardError> {
        queries::messages::get_message(&self.db, id).await
    }

    async fn comments_for_ticket(&self, ticket_id: &str) -> Result<Vec<Message>, SwitchboardError> {
        queries::messages::comments_for_ticket(&self.db, ticket_id).await
    }

    async fn dms_for(
        &self,
        agent: &str,
        unread_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, SwitchboardError> {
        queries::messages::dms_for(&self.db, agent, unread_only, limit).await
    }

    async fn count_unread_dms(&self, agent: &str) -> Result<u64, SwitchboardError> {
        queries::messages::count_unread_dms(&self.db, agent).await
    }

    async fn conversation(
        &self,
        agent_a: &str,
        agent_b: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, SwitchboardError> {
        queries::messages::conversation(&self.db, agent_a, agent_b, limit).await
    }

    async fn mark_dm_read(&self, id: &str) -> Result<bool, SwitchboardError> {
        queries::messages::mark_dm_read(&self.db, id).await
    }

    async fn mark_all_read(&self, agent: &str) -> Result<ReadSweep, SwitchboardError> {
        queries::read_state::mark_all_read(&self.db, Track::Unified, agent).await
    }
}

/// The legacy `legacy_comments` / `legacy_direct_messages` split.
///
/// Rows are stored in their legacy shape and converted to [`Message`] on the
/// way out, so the engine sees one interface for both generations.
#[derive(Clone)]
pub struct LegacyTrack {
    db: Database,
}

impl LegacyTrack {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageTrack for LegacyTrack {
    fn track(&self) -> Track {
        Track::Legacy
    }

    async fn insert(&self, message: &Message) -> Result<(), SwitchboardError> {
        match message.kind {
            MessageKind::Comment => {
                let comment = LegacyComment::try_from(message)?;
                queries::legacy::insert_comment(&self.db, &comment).await
            }
            MessageKind::Dm => {
                let dm = LegacyDirectMessage::try_from(message)?;
                queries::legacy::insert_direct_message(&self.db, &dm).await
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Message>, SwitchboardError> {
        if let Some(dm) = queries::legacy::get_direct_message(&self.db, id).await? {
            return Ok(Some(dm.into()));
        }
        Ok(queries::legacy::get_comment(&self.db, id)
            .await?
            .map(Message::from))
    }

    async fn comments_for_ticket(&self, ticket_id: &str) -> Result<Vec<Message>, SwitchboardError> {
        let comments = queries::legacy::comments_for_ticket(&self.db, ticket_id).await?;
        Ok(comments.into_iter().map(Message::from).collect())
    }

    async fn dms_for(
        &self,
        agent: &str,
        unread_only: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, SwitchboardError> {
        let dms = queries::legacy::direct_messages_for(&self.db, agent, unread_only, limit).await?;
        Ok(dms.into_iter().map(Message::from).collect())
    }

    async fn count_unread_dms(&self, agent: &str) -> Result<u64, SwitchboardError> {
        queries::legacy::count_unread_direct_messages(&self.db, agent).await
    }

    async fn conversation(
        &self,
        agent_a: &str,
        agent_b: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, SwitchboardError> {
        let dms = queries::legacy::conversation(&self.db, agent_a, agent_b, limit).await?;
        Ok(dms.into_iter().map(Message::from).collect())
    }

    async fn mark_dm_read(&self, id: &str) -> Result<bool, SwitchboardError> {
        queries::legacy::mark_direct_message_read(&self.db, id).await
    }

    async fn mark_all_read(&self, agent: &str) -> Result<ReadSweep, SwitchboardError> {
        queries::read_state::mark_all_read(&self.db, Track::Legacy, agent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;
    use switchboard_core::{Priority, Ticket};

    fn ticket() -> Ticket {
        Ticket {
            id: "t-1".into(),
            human_id: "AGT-9".into(),
            title: None,
        }
    }

    #[tokio::test]
    async fn both_tracks_return_identical_messages() {
        let (db, _dir) = setup_db().await;
        let unified = UnifiedTrack::new(db.clone());
        let legacy = LegacyTrack::new(db.clone());

        let comment = Message::comment(&ticket(), "sam", "hi @leo", vec!["leo".into()]);
        let dm = Message::direct("max", "sam", "ping", Some(&ticket()), Priority::Urgent);

        for track in [&unified as &dyn MessageTrack, &legacy as &dyn MessageTrack] {
            track.insert(&comment).await.unwrap();
            track.insert(&dm).await.unwrap();
        }

        for track in [&unified as &dyn MessageTrack, &legacy as &dyn MessageTrack] {
            assert_eq!(track.get(&comment.id).await.unwrap().unwrap(), comment);
            assert_eq!(track.get(&dm.id).await.unwrap().unwrap(), dm);
            assert_eq!(track.comments_for_ticket("t-1").await.unwrap(), vec![comment.clone()]);
            assert_eq!(track.dms_for("sam", true, None).await.unwrap(), vec![dm.clone()]);
            assert_eq!(track.conversation("sam", "max", None).await.unwrap(), vec![dm.clone()]);
            assert_eq!(track.count_unread_dms("sam").await.unwrap(), 1);
        }
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn tracks_do_not_see_each_other() {
        let (db, _dir) = setup_db().await;
        let unified = UnifiedTrack::new(db.clone());
        let legacy = LegacyTrack::new(db.clone());

        let dm = Message::direct("max", "sam", "ping", None, Priority::Normal);
        legacy.insert(&dm).await.unwrap();

        assert!(unified.get(&dm.id).await.unwrap().is_none());
        assert_eq!(unified.count_unread_dms("sam").await.unwrap(), 0);
        assert!(legacy.mark_dm_read(&dm.id).await.unwrap());
        assert!(!unified.mark_dm_read(&dm.id).await.unwrap());
        db.close().await.unwrap();
    }
}
