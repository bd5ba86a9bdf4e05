use crate::debt_service::{DebtError, DebtService};
use crate::models::{ContributionRequest, CreateDebtRequest, CreateGoalRequest};
use crate::service::{GoalError, GoalService};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use common::AppState;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for GoalError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            GoalError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            GoalError::NotFound => (StatusCode::NOT_FOUND, "Goal not found".to_string()),
            GoalError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

impl IntoResponse for DebtError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            DebtError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            DebtError::Conflict(_) => (StatusCode::CONFLICT, "Debt is already paid".to_string()),
            DebtError::NotFound => (StatusCode::NOT_FOUND, "Debt not found".to_string()),
            DebtError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub fn goals_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_goals).post(create_goal))
        .route("/overview", get(goals_overview))
        .route("/{id}/contributions", post(add_contribution))
        .route("/{id}", delete(delete_goal))
        .with_state(state)
}

pub fn debts_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(debts_overview).post(create_debt))
        .route("/{id}/paid", put(mark_as_paid))
        .route("/{id}", delete(delete_debt))
        .with_state(state)
}

async fn list_goals(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, GoalError> {
    let goals = GoalService::list_goals(&state.db).await?;
    Ok(Json(goals))
}

async fn goals_overview(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, GoalError> {
    let screen = GoalService::goals_with_debts(&state.db).await?;
    Ok(Json(screen))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, GoalError> {
    let today = chrono::Local::now().date_naive();
    let goal = GoalService::create_goal(&state.db, payload, today).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn add_contribution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ContributionRequest>,
) -> Result<impl IntoResponse, GoalError> {
    let goal = GoalService::add_contribution(&state.db, &id, payload).await?;
    Ok(Json(goal))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GoalError> {
    GoalService::delete_goal(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn debts_overview(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, DebtError> {
    let overview = DebtService::overview(&state.db).await?;
    Ok(Json(overview))
}

async fn create_debt(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDebtRequest>,
) -> Result<impl IntoResponse, DebtError> {
    let debt = DebtService::create_debt(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(debt)))
}

async fn mark_as_paid(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DebtError> {
    let debt = DebtService::mark_as_paid(&state.db, &id).await?;
    Ok(Json(debt))
}

async fn delete_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, DebtError> {
    DebtService::delete_debt(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use common::Config;
    use database::get_test_db;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn state() -> Arc<AppState> {
        Arc::new(AppState {
            db: get_test_db().await,
            config: Config { port: 0, mock_latency_ms: 0 },
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_goals_overview_has_both_tabs() {
        let state = state().await;
        let app: Router = goals_router(state.clone()).with_state(state);

        let response = app
            .oneshot(Request::builder().uri("/overview").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["goals"][0]["percent_label"], "72%");
        assert_eq!(body["debts"]["total_i_owe"], 50000.0);
    }

    #[tokio::test]
    async fn test_contribution_must_be_positive() {
        let state = state().await;
        let app: Router = goals_router(state.clone()).with_state(state);

        let response = app
            .oneshot(json_request("POST", "/1/contributions", json!({ "amount": -10.0 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_goal_with_past_date_is_400() {
        let state = state().await;
        let app: Router = goals_router(state.clone()).with_state(state);

        let payload = json!({
            "emoji": "🎓",
            "title": "Course",
            "target_amount": 30000.0,
            "target_date": "2000-01-01"
        });
        let response = app.oneshot(json_request("POST", "/", payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_paying_a_paid_debt_is_409() {
        let state = state().await;
        let app: Router = debts_router(state.clone()).with_state(state);

        let response = app
            .oneshot(Request::builder().method("PUT").uri("/3/paid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_debt_is_201() {
        let state = state().await;
        let app: Router = debts_router(state.clone()).with_state(state);

        let payload = json!({
            "person_name": "Olga",
            "kind": "THEY_OWE",
            "amount": 1500.0,
            "due_date": "2026-06-01"
        });
        let response = app.oneshot(json_request("POST", "/", payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
