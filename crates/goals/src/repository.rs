use crate::models::Goal;
use database::{self, RepositoryError};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

const TABLE: &str = "goals";

#[derive(Serialize, Deserialize)]
struct GoalRecord {
    id: String,
    emoji: String,
    title: String,
    days_left: i64,
    #[serde(default)]
    saved_amount: f64,
    target_amount: f64,
    accent_color: String,
}

impl From<GoalRecord> for Goal {
    fn from(record: GoalRecord) -> Self {
        Goal {
            id: record.id,
            emoji: record.emoji,
            title: record.title,
            days_left: record.days_left,
            saved_amount: record.saved_amount,
            target_amount: record.target_amount,
            accent_color: record.accent_color,
        }
    }
}

impl From<&Goal> for GoalRecord {
    fn from(goal: &Goal) -> Self {
        GoalRecord {
            id: goal.id.clone(),
            emoji: goal.emoji.clone(),
            title: goal.title.clone(),
            days_left: goal.days_left,
            saved_amount: goal.saved_amount,
            target_amount: goal.target_amount,
            accent_color: goal.accent_color.clone(),
        }
    }
}

pub(crate) struct GoalRepository<C> {
    conn: C,
}

impl<C: Deref<Target = database::Connection>> GoalRepository<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn list(&self) -> Result<Vec<Goal>, RepositoryError> {
        let records: Vec<GoalRecord> = self.conn.select(TABLE)?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Goal>, RepositoryError> {
        let record: Option<GoalRecord> = self.conn.find(TABLE, id)?;
        Ok(record.map(|r| r.into()))
    }
}

impl<C: DerefMut<Target = database::Connection>> GoalRepository<C> {
    /// Stores `goal` under a fresh id; the id on the argument is ignored.
    pub fn create(&mut self, goal: &Goal) -> Result<String, RepositoryError> {
        let id = self.conn.next_id();
        let mut record = GoalRecord::from(goal);
        record.id = id.clone();

        self.conn.insert(TABLE, &record)?;
        Ok(id)
    }

    pub fn add_contribution(&mut self, id: &str, amount: f64) -> Result<Goal, RepositoryError> {
        let mut goal = self.find_by_id(id)?.ok_or(RepositoryError::NotFound)?;
        goal.saved_amount += amount;

        self.conn.update(TABLE, id, &GoalRecord::from(&goal))?;
        Ok(goal)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), RepositoryError> {
        self.conn.delete(TABLE, id)
    }
}
