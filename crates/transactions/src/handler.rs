use crate::models::{RawCreateTransactionRequest, TypeFilter};
use crate::service::{RECENT_LIMIT, TransactionError, TransactionService};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use common::AppState;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            TransactionError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            TransactionError::NotFound => (StatusCode::NOT_FOUND, "Transaction not found".to_string()),
            TransactionError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(rename = "type", default)]
    pub filter: TypeFilter,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

pub fn transactions_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        // Fixed segments before the id capture
        .route("/", get(list_transactions).post(create_transaction))
        .route("/recent", get(recent_transactions))
        .route("/{id}", get(get_transaction).delete(delete_transaction))
        .with_state(state)
}

pub fn home_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home_overview))
        .with_state(state)
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, TransactionError> {
    let groups = TransactionService::list_grouped(&state.db, query.filter, &query.search).await?;
    Ok(Json(groups))
}

async fn recent_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, TransactionError> {
    let limit = query.limit.unwrap_or(RECENT_LIMIT);
    let transactions = TransactionService::recent(&state.db, limit).await?;
    Ok(Json(transactions))
}

async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, TransactionError> {
    let transaction = TransactionService::get_transaction(&state.db, &id).await?;
    Ok(Json(transaction))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RawCreateTransactionRequest>,
) -> Result<impl IntoResponse, TransactionError> {
    let transaction = TransactionService::create_transaction(&state.db, payload)
        .await
        .map_err(|e| {
            tracing::error!("create_transaction error: {:?}", e);
            e
        })?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, TransactionError> {
    TransactionService::delete_transaction(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn home_overview(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, TransactionError> {
    let overview = TransactionService::dashboard(&state.db).await?;
    Ok(Json(overview))
}
