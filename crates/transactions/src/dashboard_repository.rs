use crate::models::{CategoryTag, FinanceStats, MonthlyStats};
use database::{self, RepositoryError};
use serde::Deserialize;

const STATS_TABLE: &str = "finance_stats";
const STATS_ID: &str = "current";

#[derive(Deserialize)]
struct FinanceStatsRow {
    balance: f64,
    balance_change: f64,
    income: f64,
    income_change: f64,
    expense: f64,
    expense_change: f64,
    savings: f64,
    savings_change: f64,
}

impl From<FinanceStatsRow> for FinanceStats {
    fn from(row: FinanceStatsRow) -> Self {
        FinanceStats {
            balance: row.balance,
            balance_change: row.balance_change,
            income: row.income,
            income_change: row.income_change,
            expense: row.expense,
            expense_change: row.expense_change,
            savings: row.savings,
            savings_change: row.savings_change,
        }
    }
}

#[derive(Deserialize)]
struct CategoryExpenseRow {
    category: CategoryTag,
    amount: f64,
}

#[derive(Deserialize)]
struct MonthlyStatsRow {
    month: String,
    income: f64,
    expense: f64,
}

pub(crate) struct DashboardRepository<'a> {
    conn: &'a database::Connection,
}

impl<'a> DashboardRepository<'a> {
    pub fn new(conn: &'a database::Connection) -> Self {
        Self { conn }
    }

    pub fn finance_stats(&self) -> Result<Option<FinanceStats>, RepositoryError> {
        let row: Option<FinanceStatsRow> = self.conn.find(STATS_TABLE, STATS_ID)?;
        Ok(row.map(|r| r.into()))
    }

    /// Raw spend per category, in display order.
    pub fn category_totals(&self) -> Result<Vec<(CategoryTag, f64)>, RepositoryError> {
        let rows: Vec<CategoryExpenseRow> = self.conn.select("category_expenses")?;
        Ok(rows.into_iter().map(|r| (r.category, r.amount)).collect())
    }

    pub fn monthly_stats(&self) -> Result<Vec<MonthlyStats>, RepositoryError> {
        let rows: Vec<MonthlyStatsRow> = self.conn.select("monthly_stats")?;
        Ok(rows
            .into_iter()
            .map(|r| MonthlyStats { month: r.month, income: r.income, expense: r.expense })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    #[tokio::test]
    async fn test_read_dashboard_fixtures() {
        let db = get_test_db().await;
        let view = db.read().await.unwrap();
        let repo = DashboardRepository::new(view.connection());

        let stats = repo.finance_stats().unwrap().unwrap();
        assert_eq!(stats.expense, 74770.0);

        let totals = repo.category_totals().unwrap();
        assert_eq!(totals.len(), 6);
        assert_eq!(totals[0], (CategoryTag::Products, 25000.0));

        let months: Vec<String> = repo.monthly_stats().unwrap().into_iter().map(|m| m.month).collect();
        assert_eq!(months, vec!["Jan", "Feb", "Mar", "Apr", "May"]);
    }
}
