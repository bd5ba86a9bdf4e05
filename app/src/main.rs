use axum::{
    Router,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use clap::Parser;
use common::{AppState, Config};
use database::Database;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Load Config from .env, environment and CLI args
    dotenvy::dotenv().ok();
    let config = Config::parse();

    // 3. Seed the in-memory store
    let db = Database::with_fixtures(config.mock_latency())?;

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    // 4. Routing
    let app = app_router(state).layer(TraceLayer::new_for_http());

    // 5. Start Server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn app_router(state: Arc<AppState>) -> Router {
    Router::<Arc<AppState>>::new()
        .route("/", get(root_redirect))
        .nest("/home", transactions::handler::home_router(state.clone()))
        .nest("/transactions", transactions::handler::transactions_router(state.clone()))
        .nest("/categories", categories::handler::categories_router(state.clone()))
        .nest("/limits", limits::handler::limits_router(state.clone()))
        .nest("/goals", goals::handler::goals_router(state.clone()))
        .nest("/debts", goals::handler::debts_router(state.clone()))
        .nest("/assistant", assistant::handler::assistant_router(state.clone()))
        .with_state(state)
}

async fn root_redirect() -> Response {
    Redirect::to("/home").into_response()
}
