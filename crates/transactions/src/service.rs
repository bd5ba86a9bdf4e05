use crate::dashboard_repository::DashboardRepository;
use crate::models::{
    CategoryExpense, CategoryTag, CreateTransactionRequest, FinanceStats, HomeOverview, MonthlyStats,
    RawCreateTransactionRequest, TransactionGroup, TransactionRecord, TypeFilter,
};
use crate::query::QueryEngine;
use crate::repository::TransactionRepository;
use database::{Database, RepositoryError};
use tracing::instrument;

pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Infrastructure(String),
    #[error("Transaction not found")]
    NotFound,
}

impl From<RepositoryError> for TransactionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => TransactionError::NotFound,
            other => TransactionError::Infrastructure(other.to_string()),
        }
    }
}

pub struct TransactionService;

impl TransactionService {
    #[instrument(skip(db))]
    pub async fn list_grouped(
        db: &Database,
        filter: TypeFilter,
        search: &str,
    ) -> Result<Vec<TransactionGroup>, TransactionError> {
        let view = db.read().await?;
        let repo = TransactionRepository::new(view.connection());

        let records = repo.list()?;
        let groups = QueryEngine::filter_and_group(&records, filter, search);
        tracing::debug!(groups = groups.len(), "Grouped transactions");

        Ok(groups)
    }

    #[instrument(skip(db))]
    pub async fn recent(db: &Database, limit: usize) -> Result<Vec<TransactionRecord>, TransactionError> {
        let view = db.read().await?;
        let repo = TransactionRepository::new(view.connection());

        Ok(repo.recent(limit)?)
    }

    #[instrument(skip(db))]
    pub async fn get_transaction(db: &Database, id: &str) -> Result<TransactionRecord, TransactionError> {
        let view = db.read().await?;
        let repo = TransactionRepository::new(view.connection());

        let transaction = repo.find_by_id(id)?
            .ok_or(TransactionError::NotFound)?;

        Ok(transaction)
    }

    #[instrument(skip(db))]
    pub async fn create_transaction(
        db: &Database,
        raw: RawCreateTransactionRequest,
    ) -> Result<TransactionRecord, TransactionError> {
        let req = CreateTransactionRequest::from_raw(raw)
            .map_err(TransactionError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = TransactionRepository::new(uow.connection());

        let id = repo.create(&req)?;
        let transaction = repo.find_by_id(&id)?
            .ok_or(TransactionError::NotFound)?;

        uow.commit().await?;
        tracing::info!(id = %transaction.id, "Created transaction");

        Ok(transaction)
    }

    #[instrument(skip(db))]
    pub async fn delete_transaction(db: &Database, id: &str) -> Result<(), TransactionError> {
        let mut uow = db.begin().await?;
        let mut repo = TransactionRepository::new(uow.connection());

        repo.delete(id)?;

        uow.commit().await?;
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn finance_stats(db: &Database) -> Result<FinanceStats, TransactionError> {
        let view = db.read().await?;
        let repo = DashboardRepository::new(view.connection());

        repo.finance_stats()?.ok_or_else(|| {
            TransactionError::Infrastructure("Finance stats are missing from the store".into())
        })
    }

    #[instrument(skip(db))]
    pub async fn category_expenses(db: &Database) -> Result<Vec<CategoryExpense>, TransactionError> {
        let view = db.read().await?;
        let repo = DashboardRepository::new(view.connection());

        Ok(expense_shares(repo.category_totals()?))
    }

    #[instrument(skip(db))]
    pub async fn monthly_stats(db: &Database) -> Result<Vec<MonthlyStats>, TransactionError> {
        let view = db.read().await?;
        let repo = DashboardRepository::new(view.connection());

        Ok(repo.monthly_stats()?)
    }

    /// Loads the four home screen blocks concurrently.
    #[instrument(skip(db))]
    pub async fn dashboard(db: &Database) -> Result<HomeOverview, TransactionError> {
        let (stats, category_expenses, monthly_stats, recent_transactions) = tokio::try_join!(
            Self::finance_stats(db),
            Self::category_expenses(db),
            Self::monthly_stats(db),
            Self::recent(db, RECENT_LIMIT),
        )?;

        Ok(HomeOverview {
            stats,
            category_expenses,
            monthly_stats,
            recent_transactions,
        })
    }
}

// Percentages are rounded to one decimal; an empty or zero total gives 0 everywhere.
fn expense_shares(totals: Vec<(CategoryTag, f64)>) -> Vec<CategoryExpense> {
    let total: f64 = totals.iter().map(|(_, amount)| amount).sum();

    totals
        .into_iter()
        .map(|(category, amount)| {
            let percentage = if total > 0.0 {
                (amount / total * 1000.0).round() / 10.0
            } else {
                0.0
            };
            CategoryExpense {
                category,
                label: category.display_name().to_string(),
                color: category.color().to_string(),
                amount,
                percentage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use database::get_test_db;

    fn raw(title: &str, amount: f64, kind: TransactionKind) -> RawCreateTransactionRequest {
        RawCreateTransactionRequest {
            title: title.to_string(),
            description: Some("Weekly shop".into()),
            amount,
            kind,
            category: CategoryTag::Products,
            date_label: None,
            time_label: None,
        }
    }

    #[tokio::test]
    async fn test_list_grouped_uses_fixture_order() {
        let db = get_test_db().await;
        let groups = TransactionService::list_grouped(&db, TypeFilter::All, "").await.unwrap();

        let labels: Vec<&str> = groups.iter().map(|g| g.date_label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday", "2 days ago", "3 days ago", "5 days ago"]);
        assert_eq!(groups[1].transactions.len(), 2);
    }

    #[tokio::test]
    async fn test_list_grouped_income_search() {
        let db = get_test_db().await;
        let groups = TransactionService::list_grouped(&db, TypeFilter::Income, "FREE").await.unwrap();

        let ids: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.transactions.iter().map(|t| t.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["op_5", "op_8"]);
    }

    #[tokio::test]
    async fn test_create_then_group_under_today() {
        let db = get_test_db().await;
        let created = TransactionService::create_transaction(&db, raw("Bakery", 250.0, TransactionKind::Expense))
            .await
            .unwrap();
        assert_eq!(created.amount, -250.0);

        let groups = TransactionService::list_grouped(&db, TypeFilter::Expense, "").await.unwrap();
        assert_eq!(groups[0].date_label, "Today");
        assert_eq!(groups[0].transactions[0].id, created.id);
    }

    #[tokio::test]
    async fn test_create_validation_failure() {
        let db = get_test_db().await;
        let err = TransactionService::create_transaction(&db, raw("  ", 250.0, TransactionKind::Expense)).await;
        assert!(matches!(err, Err(TransactionError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let db = get_test_db().await;
        let t = TransactionService::get_transaction(&db, "op_2").await.unwrap();
        assert_eq!(t.title, "Salary");

        TransactionService::delete_transaction(&db, "op_2").await.unwrap();
        let err = TransactionService::get_transaction(&db, "op_2").await;
        assert!(matches!(err, Err(TransactionError::NotFound)));

        let err = TransactionService::delete_transaction(&db, "op_2").await;
        assert!(matches!(err, Err(TransactionError::NotFound)));
    }

    #[tokio::test]
    async fn test_dashboard() {
        let db = get_test_db().await;
        let home = TransactionService::dashboard(&db).await.unwrap();

        assert_eq!(home.stats.balance, 245680.0);
        assert_eq!(home.recent_transactions.len(), RECENT_LIMIT);
        assert_eq!(home.monthly_stats.len(), 5);

        let shares: Vec<f64> = home.category_expenses.iter().map(|c| c.percentage).collect();
        assert_eq!(shares, vec![33.4, 20.1, 10.7, 24.1, 8.0, 3.7]);
        assert_eq!(home.category_expenses[0].label, "Groceries");
    }

    #[tokio::test]
    async fn test_dashboard_runs_alongside_other_readers() {
        let db = get_test_db().await;
        let _reader = db.read().await.unwrap();

        let home = tokio::time::timeout(std::time::Duration::from_secs(1), TransactionService::dashboard(&db))
            .await
            .expect("dashboard waited on an open reader")
            .unwrap();
        assert_eq!(home.recent_transactions.len(), RECENT_LIMIT);
    }

    #[test]
    fn test_expense_shares_of_zero_total() {
        let shares = expense_shares(vec![(CategoryTag::Other, 0.0)]);
        assert_eq!(shares[0].percentage, 0.0);
        assert!(expense_shares(Vec::new()).is_empty());
    }
}
