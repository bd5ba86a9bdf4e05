use crate::debt_repository::DebtRepository;
use crate::models::{CreateDebtRequest, Debt, DebtsOverview};
use database::{Database, RepositoryError};
use tracing::instrument;
use validator::Validate;

#[derive(Debug, thiserror::Error)]
pub enum DebtError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Infrastructure(String),
    #[error("Debt is already paid: {0}")]
    Conflict(String),
    #[error("Debt not found")]
    NotFound,
}

impl From<RepositoryError> for DebtError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => DebtError::NotFound,
            RepositoryError::CheckViolation(msg) => DebtError::Conflict(msg),
            other => DebtError::Infrastructure(other.to_string()),
        }
    }
}

pub struct DebtService;

impl DebtService {
    #[instrument(skip(db))]
    pub async fn list_debts(db: &Database) -> Result<Vec<Debt>, DebtError> {
        let view = db.read().await?;
        let repo = DebtRepository::new(view.connection());

        Ok(repo.list()?)
    }

    #[instrument(skip(db))]
    pub async fn overview(db: &Database) -> Result<DebtsOverview, DebtError> {
        let debts = Self::list_debts(db).await?;
        Ok(DebtsOverview::from_debts(debts))
    }

    #[instrument(skip(db))]
    pub async fn create_debt(db: &Database, req: CreateDebtRequest) -> Result<Debt, DebtError> {
        req.validate()
            .map_err(|e| DebtError::InvalidInput(e.to_string()))?;

        let mut uow = db.begin().await?;
        let mut repo = DebtRepository::new(uow.connection());

        let id = repo.create(req.person_name.trim(), req.kind, req.amount, &req.due_date)?;
        let debt = repo.find_by_id(&id)?
            .ok_or(DebtError::NotFound)?;

        uow.commit().await?;
        tracing::info!(id = %debt.id, kind = ?debt.kind, "Created debt");

        Ok(debt)
    }

    #[instrument(skip(db))]
    pub async fn mark_as_paid(db: &Database, id: &str) -> Result<Debt, DebtError> {
        let mut uow = db.begin().await?;
        let mut repo = DebtRepository::new(uow.connection());

        let debt = repo.mark_paid(id).map_err(|e| {
            tracing::warn!("mark_as_paid rejected for {}: {}", id, e);
            DebtError::from(e)
        })?;

        uow.commit().await?;
        Ok(debt)
    }

    #[instrument(skip(db))]
    pub async fn delete_debt(db: &Database, id: &str) -> Result<(), DebtError> {
        let mut uow = db.begin().await?;
        let mut repo = DebtRepository::new(uow.connection());

        repo.delete(id)?;

        uow.commit().await?;
        Ok(())
    }
}
