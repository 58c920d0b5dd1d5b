pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// OpenAPI / Swagger UI
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bank::BankStore;
use crate::config::HttpConfig;
use state::AppState;

/// Build the complete router around a store
pub fn app(store: Arc<dyn BankStore>) -> Router {
    let state = Arc::new(AppState::new(store));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/users/{userId}/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route(
            "/users/{userId}/accounts/{id}",
            delete(handlers::delete_account),
        )
        .route(
            "/users/{userId}/transactions",
            get(handlers::list_transfers).post(handlers::create_transfer),
        )
        .with_state(state)
        // stateless, added after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start HTTP server; returns when the listener fails or the process is stopped
pub async fn run_server(config: &HttpConfig, store: Arc<dyn BankStore>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        tracing::error!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.port
        );
    })?;

    tracing::info!(store = store.name(), "Gateway listening on http://{}", addr);
    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);

    axum::serve(listener, app(store)).await
}
