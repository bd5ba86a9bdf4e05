use crate::debt_service::{DebtError, DebtService};
use crate::models::{ACCENT_PALETTE, ContributionRequest, CreateGoalRequest, Goal, GoalView, GoalsScreen, parse_date};
use crate::repository::GoalRepository;
use chrono::NaiveDate;
use database::{Database, RepositoryError};
use rand::seq::SliceRandom;
use tracing::instrument;
use validator::Validate;

#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Infrastructure(String),
    #[error("Goal not found")]
    NotFound,
}

impl From<RepositoryError> for GoalError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => GoalError::NotFound,
            other => GoalError::Infrastructure(other.to_string()),
        }
    }
}

impl From<DebtError> for GoalError {
    fn from(err: DebtError) -> Self {
        GoalError::Infrastructure(err.to_string())
    }
}

pub struct GoalService;

impl GoalService {
    fn pick_accent_color() -> String {
        let mut rng = rand::thread_rng();
        ACCENT_PALETTE.choose(&mut rng).unwrap_or(&ACCENT_PALETTE[0]).to_string()
    }

    #[instrument(skip(db))]
    pub async fn list_goals(db: &Database) -> Result<Vec<GoalView>, GoalError> {
        let view = db.read().await?;
        let repo = GoalRepository::new(view.connection());

        let goals = repo.list()?;
        Ok(goals.into_iter().map(GoalView::from).collect())
    }

    /// `today` anchors both the past-date check and `days_left`.
    #[instrument(skip(db))]
    pub async fn create_goal(db: &Database, req: CreateGoalRequest, today: NaiveDate) -> Result<GoalView, GoalError> {
        req.validate()
            .map_err(|e| GoalError::InvalidInput(e.to_string()))?;
        let target_date = parse_date(&req.target_date)
            .ok_or_else(|| GoalError::InvalidInput(format!("Invalid date {}", req.target_date)))?;
        if target_date < today {
            return Err(GoalError::InvalidInput("Target date cannot be in the past".into()));
        }

        let draft = Goal {
            id: String::new(),
            emoji: req.emoji.trim().to_string(),
            title: req.title.trim().to_string(),
            days_left: (target_date - today).num_days(),
            saved_amount: 0.0,
            target_amount: req.target_amount,
            accent_color: Self::pick_accent_color(),
        };

        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        let id = repo.create(&draft)?;
        let goal = repo.find_by_id(&id)?
            .ok_or(GoalError::NotFound)?;

        uow.commit().await?;
        tracing::info!(id = %goal.id, days_left = goal.days_left, "Created goal");

        Ok(goal.into())
    }

    #[instrument(skip(db))]
    pub async fn add_contribution(db: &Database, id: &str, req: ContributionRequest) -> Result<GoalView, GoalError> {
        req.validate()
            .map_err(|e| GoalError::InvalidInput(e.to_string()))?;

        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        let goal = repo.add_contribution(id, req.amount)?;

        uow.commit().await?;
        Ok(goal.into())
    }

    #[instrument(skip(db))]
    pub async fn delete_goal(db: &Database, id: &str) -> Result<(), GoalError> {
        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        repo.delete(id)?;

        uow.commit().await?;
        Ok(())
    }

    /// Loads both tabs of the goals screen concurrently.
    #[instrument(skip(db))]
    pub async fn goals_with_debts(db: &Database) -> Result<GoalsScreen, GoalError> {
        let (goals, debts) = tokio::try_join!(Self::list_goals(db), async {
            DebtService::overview(db).await.map_err(GoalError::from)
        })?;

        Ok(GoalsScreen { goals, debts })
    }
}
