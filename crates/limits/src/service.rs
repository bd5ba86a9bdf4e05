use crate::models::{CreateLimitRequest, Limit, LimitView, LimitsOverview, UpdateLimitRequest, parse_period, period_label};
use crate::repository::{LimitRepository, NewLimit};
use categories::service::{CategoryError, CategoryService};
use database::{Database, RepositoryError};
use metrics::MetricsEngine;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, thiserror::Error)]
pub enum LimitError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Infrastructure(String),
    #[error("Limit already exists: {0}")]
    Conflict(String),
    #[error("Limit not found")]
    NotFound,
}

impl From<RepositoryError> for LimitError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => LimitError::NotFound,
            RepositoryError::UniqueViolation(msg) => LimitError::Conflict(msg),
            other => LimitError::Infrastructure(other.to_string()),
        }
    }
}

pub struct LimitService;

impl LimitService {
    #[instrument(skip(db))]
    pub async fn overview(db: &Database, period: Option<&str>) -> Result<LimitsOverview, LimitError> {
        if let Some(p) = period {
            parse_period(p).ok_or_else(|| LimitError::InvalidInput(format!("Invalid period {p}, expected YYYY-MM")))?;
        }

        let limits = Self::list_limits(db, period).await?;
        let summary = MetricsEngine::aggregate_summary(&limits);

        Ok(LimitsOverview {
            period: period.map(str::to_string),
            limits: limits.into_iter().map(LimitView::from).collect(),
            summary,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_limits(db: &Database, period: Option<&str>) -> Result<Vec<Limit>, LimitError> {
        let view = db.read().await?;
        let repo = LimitRepository::new(view.connection());

        Ok(repo.list(period)?)
    }

    #[instrument(skip(db))]
    pub async fn create_limit(db: &Database, req: CreateLimitRequest) -> Result<LimitView, LimitError> {
        req.validate()
            .map_err(|e| LimitError::InvalidInput(e.to_string()))?;
        let label = period_label(&req.period)
            .ok_or_else(|| LimitError::InvalidInput(format!("Invalid period {}", req.period)))?;

        let category = CategoryService::get_by_slug(db, &req.category_slug)
            .await
            .map_err(|e| match e {
                CategoryError::NotFound => {
                    LimitError::InvalidInput(format!("Unknown category: {}", req.category_slug))
                }
                other => LimitError::Infrastructure(other.to_string()),
            })?;

        let mut uow = db.begin().await?;
        let mut repo = LimitRepository::new(uow.connection());

        let id = repo.create(&NewLimit {
            category_slug: &category.slug,
            category_name: &category.name,
            period: &req.period,
            period_label: &label,
            limit_amount: req.amount,
        })?;
        let limit = repo.find_by_id(&id)?
            .ok_or(LimitError::NotFound)?;

        uow.commit().await?;
        tracing::info!(id = %limit.id, category = %limit.category_slug, period = %limit.period, "Created limit");

        Ok(limit.into())
    }

    #[instrument(skip(db))]
    pub async fn update_limit(db: &Database, id: &str, req: UpdateLimitRequest) -> Result<LimitView, LimitError> {
        req.validate()
            .map_err(|e| LimitError::InvalidInput(e.to_string()))?;

        let mut uow = db.begin().await?;
        let mut repo = LimitRepository::new(uow.connection());

        let limit = repo.update_amount(id, req.amount)?;

        uow.commit().await?;
        Ok(limit.into())
    }

    #[instrument(skip(db))]
    pub async fn delete_limit(db: &Database, id: &str) -> Result<(), LimitError> {
        let mut uow = db.begin().await?;
        let mut repo = LimitRepository::new(uow.connection());

        repo.delete(id)?;

        uow.commit().await?;
        Ok(())
    }
}
