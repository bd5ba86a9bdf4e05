use crate::models::{CategoryTag, CreateTransactionRequest, TransactionKind, TransactionRecord};
use database::{self, RepositoryError};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

const TABLE: &str = "transactions";

#[derive(Serialize, Deserialize)]
struct TransactionRow {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    amount: f64,
    kind: TransactionKind,
    category: CategoryTag,
    date_label: String,
    time_label: Option<String>,
}

impl From<TransactionRow> for TransactionRecord {
    fn from(row: TransactionRow) -> Self {
        TransactionRecord {
            id: row.id,
            title: row.title,
            description: row.description,
            amount: row.amount,
            kind: row.kind,
            category: row.category,
            date_label: row.date_label,
            time_label: row.time_label,
        }
    }
}

/// Reads work over any borrow of the connection; writes need a mutable one.
pub(crate) struct TransactionRepository<C> {
    conn: C,
}

impl<C: Deref<Target = database::Connection>> TransactionRepository<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Newest first, exactly as stored.
    pub fn list(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let rows: Vec<TransactionRow> = self.conn.select(TABLE)?;
        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let mut records = self.list()?;
        records.truncate(limit);
        Ok(records)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<TransactionRecord>, RepositoryError> {
        let row: Option<TransactionRow> = self.conn.find(TABLE, id)?;
        Ok(row.map(|r| r.into()))
    }
}

impl<C: DerefMut<Target = database::Connection>> TransactionRepository<C> {
    pub fn create(&mut self, req: &CreateTransactionRequest) -> Result<String, RepositoryError> {
        let id = format!("op_{}", self.conn.next_id());
        let row = TransactionRow {
            id: id.clone(),
            title: req.title().to_string(),
            description: req.description().to_string(),
            amount: req.amount(),
            kind: req.kind(),
            category: req.category(),
            date_label: req.date_label().to_string(),
            time_label: req.time_label().map(str::to_string),
        };

        self.conn.prepend(TABLE, &row)?;
        Ok(id)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), RepositoryError> {
        self.conn.delete(TABLE, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    fn expense(title: &str) -> CreateTransactionRequest {
        CreateTransactionRequest::new(
            title.to_string(),
            Some("Notes".into()),
            10.0,
            TransactionKind::Expense,
            CategoryTag::Products,
            None,
            Some("12:00".into()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_transaction() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        let id = repo.create(&expense("Bakery")).unwrap();
        let t = repo.find_by_id(&id).unwrap().unwrap();
        assert_eq!(t.amount, -10.0);
        assert_eq!(t.description, "Notes");
        assert_eq!(t.date_label, "Today");
        assert_eq!(t.time_label, Some("12:00".to_string()));
    }

    #[tokio::test]
    async fn test_created_transaction_is_listed_first() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        let before = repo.list().unwrap().len();
        let id = repo.create(&expense("Bakery")).unwrap();

        let list = repo.list().unwrap();
        assert_eq!(list.len(), before + 1);
        assert_eq!(list[0].id, id);
    }

    #[tokio::test]
    async fn test_read_transactions_in_stored_order() {
        let db = get_test_db().await;
        let view = db.read().await.unwrap();
        let repo = TransactionRepository::new(view.connection());

        let list = repo.list().unwrap();
        assert_eq!(list.len(), 8);
        assert_eq!(list[0].id, "op_1");
        assert_eq!(list[7].id, "op_8");

        let recent = repo.recent(3).unwrap();
        let ids: Vec<&str> = recent.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["op_1", "op_2", "op_3"]);
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        assert!(repo.find_by_id("op_4").unwrap().is_some());
        repo.delete("op_4").unwrap();
        assert!(repo.find_by_id("op_4").unwrap().is_none());
        assert!(matches!(repo.delete("op_4"), Err(RepositoryError::NotFound)));
    }
}
