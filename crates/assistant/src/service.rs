use crate::insights::{Topic, debts_reply, derive_insights, general_reply, goals_reply, limits_reply};
use crate::models::{ChatExchange, ChatMessage, HealthScore, Insight, Tip};
use crate::repository::AssistantRepository;
use database::{Database, RepositoryError};
use goals::debt_service::{DebtError, DebtService};
use goals::service::{GoalError, GoalService};
use limits::models::LimitView;
use limits::service::{LimitError, LimitService};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Infrastructure(String),
    #[error("Health score not found")]
    NotFound,
}

impl From<RepositoryError> for AssistantError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AssistantError::NotFound,
            other => AssistantError::Infrastructure(other.to_string()),
        }
    }
}

impl From<LimitError> for AssistantError {
    fn from(err: LimitError) -> Self {
        AssistantError::Infrastructure(err.to_string())
    }
}

impl From<GoalError> for AssistantError {
    fn from(err: GoalError) -> Self {
        AssistantError::Infrastructure(err.to_string())
    }
}

impl From<DebtError> for AssistantError {
    fn from(err: DebtError) -> Self {
        AssistantError::Infrastructure(err.to_string())
    }
}

pub struct AssistantService;

impl AssistantService {
    #[instrument(skip(db))]
    pub async fn health_score(db: &Database) -> Result<HealthScore, AssistantError> {
        let view = db.read().await?;
        let repo = AssistantRepository::new(view.connection());

        repo.health_score()?.ok_or(AssistantError::NotFound)
    }

    #[instrument(skip(db))]
    pub async fn insights(db: &Database) -> Result<Vec<Insight>, AssistantError> {
        let (limits, goals) = tokio::try_join!(
            async { LimitService::list_limits(db, None).await.map_err(AssistantError::from) },
            async { GoalService::list_goals(db).await.map_err(AssistantError::from) },
        )?;

        let limits: Vec<LimitView> = limits.into_iter().map(LimitView::from).collect();
        Ok(derive_insights(&limits, &goals))
    }

    #[instrument(skip(db))]
    pub async fn tips(db: &Database) -> Result<Vec<Tip>, AssistantError> {
        let view = db.read().await?;
        let repo = AssistantRepository::new(view.connection());

        Ok(repo.tips()?)
    }

    #[instrument(skip(db))]
    pub async fn chat_history(db: &Database) -> Result<Vec<ChatMessage>, AssistantError> {
        let view = db.read().await?;
        let repo = AssistantRepository::new(view.connection());

        Ok(repo.chat_history()?)
    }

    /// Stores the trimmed question and the reply, in that order.
    #[instrument(skip(db))]
    pub async fn send_message(db: &Database, text: &str) -> Result<ChatExchange, AssistantError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::InvalidInput("Message cannot be empty".into()));
        }

        let topic = Topic::detect(text);
        let answer = Self::compose_reply(db, topic).await?;
        tracing::debug!(?topic, "Composed assistant reply");

        let mut uow = db.begin().await?;
        let mut repo = AssistantRepository::new(uow.connection());

        let now = chrono::Utc::now().timestamp_millis();
        let question = repo.append_message(text, true, now)?;
        let reply = repo.append_message(&answer, false, now)?;

        uow.commit().await?;
        Ok(ChatExchange { question, reply })
    }

    async fn compose_reply(db: &Database, topic: Topic) -> Result<String, AssistantError> {
        let reply = match topic {
            Topic::Limits => limits_reply(&LimitService::list_limits(db, None).await?),
            Topic::Goals => goals_reply(&GoalService::list_goals(db).await?),
            Topic::Debts => debts_reply(&DebtService::overview(db).await?),
            Topic::General => general_reply(),
        };
        Ok(reply)
    }
}
