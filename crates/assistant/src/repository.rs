use crate::models::{ChatMessage, HealthScore, Tip};
use database::{self, RepositoryError};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

const CHAT_TABLE: &str = "chat_messages";
const SCORE_ID: &str = "current";

#[derive(Deserialize)]
struct HealthScoreRecord {
    overall: u8,
    expenses: u8,
    savings: u8,
    goals: u8,
    discipline: u8,
}

impl From<HealthScoreRecord> for HealthScore {
    fn from(record: HealthScoreRecord) -> Self {
        HealthScore {
            overall: record.overall,
            expenses: record.expenses,
            savings: record.savings,
            goals: record.goals,
            discipline: record.discipline,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ChatMessageRecord {
    id: String,
    content: String,
    is_from_user: bool,
    timestamp: i64,
}

impl From<ChatMessageRecord> for ChatMessage {
    fn from(record: ChatMessageRecord) -> Self {
        ChatMessage {
            id: record.id,
            content: record.content,
            is_from_user: record.is_from_user,
            timestamp: record.timestamp,
        }
    }
}

pub(crate) struct AssistantRepository<C> {
    conn: C,
}

impl<C: Deref<Target = database::Connection>> AssistantRepository<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn health_score(&self) -> Result<Option<HealthScore>, RepositoryError> {
        let record: Option<HealthScoreRecord> = self.conn.find("health_scores", SCORE_ID)?;
        Ok(record.map(|r| r.into()))
    }

    pub fn tips(&self) -> Result<Vec<Tip>, RepositoryError> {
        self.conn.select("tips")
    }

    /// Oldest first.
    pub fn chat_history(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let records: Vec<ChatMessageRecord> = self.conn.select(CHAT_TABLE)?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }
}

impl<C: DerefMut<Target = database::Connection>> AssistantRepository<C> {
    pub fn append_message(
        &mut self,
        content: &str,
        is_from_user: bool,
        timestamp: i64,
    ) -> Result<ChatMessage, RepositoryError> {
        let record = ChatMessageRecord {
            id: format!("msg_{}", self.conn.next_id()),
            content: content.to_string(),
            is_from_user,
            timestamp,
        };
        self.conn.insert(CHAT_TABLE, &record)?;

        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    #[tokio::test]
    async fn test_read_fixtures() {
        let db = get_test_db().await;
        let view = db.read().await.unwrap();
        let repo = AssistantRepository::new(view.connection());

        assert_eq!(repo.health_score().unwrap().unwrap().overall, 74);
        assert_eq!(repo.tips().unwrap().len(), 4);

        let history = repo.chat_history().unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].is_from_user);
    }

    #[tokio::test]
    async fn test_append_message_keeps_order() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = AssistantRepository::new(uow.connection());

        let first = repo.append_message("Hi", true, 10).unwrap();
        let second = repo.append_message("Hello!", false, 11).unwrap();
        assert_ne!(first.id, second.id);

        let history = repo.chat_history().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].content, "Hi");
        assert_eq!(history[2], second);
    }
}
