use crate::models::{CreateLimitRequest, UpdateLimitRequest};
use crate::service::{LimitError, LimitService};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use common::AppState;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for LimitError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            LimitError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            LimitError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            LimitError::NotFound => (StatusCode::NOT_FOUND, "Limit not found".to_string()),
            LimitError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[derive(Deserialize)]
struct PeriodQuery {
    period: Option<String>,
}

pub fn limits_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(limits_overview).post(create_limit))
        .route("/{id}", put(update_limit).delete(delete_limit))
        .with_state(state)
}

async fn limits_overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<impl IntoResponse, LimitError> {
    let overview = LimitService::overview(&state.db, params.period.as_deref()).await?;
    Ok(Json(overview))
}

async fn create_limit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateLimitRequest>,
) -> Result<impl IntoResponse, LimitError> {
    let limit = LimitService::create_limit(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(limit)))
}

async fn update_limit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLimitRequest>,
) -> Result<impl IntoResponse, LimitError> {
    let limit = LimitService::update_limit(&state.db, &id, payload).await?;
    Ok(Json(limit))
}

async fn delete_limit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, LimitError> {
    LimitService::delete_limit(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
