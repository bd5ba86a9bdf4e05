use crate::models::Limit;
use database::{self, RepositoryError};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

const TABLE: &str = "limits";

#[derive(Serialize, Deserialize)]
struct LimitRecord {
    id: String,
    category_slug: String,
    category_name: String,
    period: String,
    period_label: String,
    limit_amount: f64,
    #[serde(default)]
    spent_amount: f64,
}

impl From<LimitRecord> for Limit {
    fn from(record: LimitRecord) -> Self {
        Limit {
            id: record.id,
            category_slug: record.category_slug,
            category_name: record.category_name,
            period: record.period,
            period_label: record.period_label,
            limit_amount: record.limit_amount,
            spent_amount: record.spent_amount,
        }
    }
}

impl From<&Limit> for LimitRecord {
    fn from(limit: &Limit) -> Self {
        LimitRecord {
            id: limit.id.clone(),
            category_slug: limit.category_slug.clone(),
            category_name: limit.category_name.clone(),
            period: limit.period.clone(),
            period_label: limit.period_label.clone(),
            limit_amount: limit.limit_amount,
            spent_amount: limit.spent_amount,
        }
    }
}

pub(crate) struct NewLimit<'r> {
    pub category_slug: &'r str,
    pub category_name: &'r str,
    pub period: &'r str,
    pub period_label: &'r str,
    pub limit_amount: f64,
}

pub(crate) struct LimitRepository<C> {
    conn: C,
}

impl<C: Deref<Target = database::Connection>> LimitRepository<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn list(&self, period: Option<&str>) -> Result<Vec<Limit>, RepositoryError> {
        let records: Vec<LimitRecord> = self.conn.select(TABLE)?;
        Ok(records
            .into_iter()
            .filter(|r| period.is_none_or(|p| r.period == p))
            .map(|r| r.into())
            .collect())
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Limit>, RepositoryError> {
        let record: Option<LimitRecord> = self.conn.find(TABLE, id)?;
        Ok(record.map(|r| r.into()))
    }
}

impl<C: DerefMut<Target = database::Connection>> LimitRepository<C> {
    /// One limit per category and period.
    pub fn create(&mut self, new: &NewLimit<'_>) -> Result<String, RepositoryError> {
        let taken = self
            .list(Some(new.period))?
            .iter()
            .any(|l| l.category_slug == new.category_slug);
        if taken {
            return Err(RepositoryError::UniqueViolation(format!(
                "limits ({}, {})",
                new.category_slug, new.period
            )));
        }

        let id = self.conn.next_id();
        self.conn.insert(
            TABLE,
            &LimitRecord {
                id: id.clone(),
                category_slug: new.category_slug.to_string(),
                category_name: new.category_name.to_string(),
                period: new.period.to_string(),
                period_label: new.period_label.to_string(),
                limit_amount: new.limit_amount,
                spent_amount: 0.0,
            },
        )?;

        Ok(id)
    }

    pub fn update_amount(&mut self, id: &str, limit_amount: f64) -> Result<Limit, RepositoryError> {
        let mut limit = self.find_by_id(id)?.ok_or(RepositoryError::NotFound)?;
        limit.limit_amount = limit_amount;

        self.conn.update(TABLE, id, &LimitRecord::from(&limit))?;
        Ok(limit)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), RepositoryError> {
        self.conn.delete(TABLE, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    fn new_limit<'r>(slug: &'r str, period: &'r str) -> NewLimit<'r> {
        NewLimit {
            category_slug: slug,
            category_name: "Health",
            period,
            period_label: "March 2026",
            limit_amount: 5000.0,
        }
    }

    #[tokio::test]
    async fn test_create_limit() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = LimitRepository::new(uow.connection());

        let id = repo.create(&new_limit("health", "2026-03")).unwrap();
        let limit = repo.find_by_id(&id).unwrap().unwrap();
        assert_eq!(limit.spent_amount, 0.0);
        assert_eq!(limit.limit_amount, 5000.0);
    }

    #[tokio::test]
    async fn test_one_limit_per_category_and_period() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = LimitRepository::new(uow.connection());

        assert!(matches!(
            repo.create(&new_limit("products", "2026-02")),
            Err(RepositoryError::UniqueViolation(_))
        ));
        assert!(repo.create(&new_limit("products", "2026-03")).is_ok());
    }

    #[tokio::test]
    async fn test_list_by_period() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = LimitRepository::new(uow.connection());

        repo.create(&new_limit("health", "2026-03")).unwrap();
        assert_eq!(repo.list(None).unwrap().len(), 4);
        assert_eq!(repo.list(Some("2026-02")).unwrap().len(), 3);
        assert_eq!(repo.list(Some("2026-03")).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_limit() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = LimitRepository::new(uow.connection());

        let updated = repo.update_amount("2", 20000.0).unwrap();
        assert_eq!(updated.limit_amount, 20000.0);
        assert_eq!(updated.spent_amount, 12300.0);
        assert_eq!(repo.find_by_id("2").unwrap().unwrap().limit_amount, 20000.0);

        repo.delete("2").unwrap();
        assert!(matches!(repo.update_amount("2", 1.0), Err(RepositoryError::NotFound)));
    }
}
