use crate::models::SendMessageRequest;
use crate::service::{AssistantError, AssistantService};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use common::AppState;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for AssistantError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AssistantError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AssistantError::NotFound => (StatusCode::NOT_FOUND, "Health score not found".to_string()),
            AssistantError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub fn assistant_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_score))
        .route("/insights", get(insights))
        .route("/tips", get(tips))
        .route("/chat", get(chat_history).post(send_message))
        .with_state(state)
}

async fn health_score(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AssistantError> {
    Ok(Json(AssistantService::health_score(&state.db).await?))
}

async fn insights(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AssistantError> {
    Ok(Json(AssistantService::insights(&state.db).await?))
}

async fn tips(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AssistantError> {
    Ok(Json(AssistantService::tips(&state.db).await?))
}

async fn chat_history(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AssistantError> {
    Ok(Json(AssistantService::chat_history(&state.db).await?))
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AssistantError> {
    let exchange = AssistantService::send_message(&state.db, &payload.message).await?;
    Ok((StatusCode::CREATED, Json(exchange)))
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

    async fn app() -> Router {
        let state = Arc::new(AppState {
            db: get_test_db().await,
            config: Config { port: 0, mock_latency_ms: 0 },
        });
        assistant_router(state.clone()).with_state(state)
    }

    #[tokio::test]
    async fn test_tips_endpoint() {
        let response = app()
            .await
            .oneshot(Request::builder().uri("/tips").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let tips: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(tips.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_blank_chat_message_is_400() {
        let response = app()
            .await
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "message": "  " }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_insights_endpoint_uses_wire_names() {
        let response = app()
            .await
            .oneshot(Request::builder().uri("/insights").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let insights: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(insights[0]["kind"], "WARNING");
    }
}
