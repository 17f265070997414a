//! HTTP surface for the search pipeline.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/search` | Rank a page's sections against a query |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! `POST /search` takes `{"url": ..., "query": ...}` and returns
//! `{"results": [{"text", "html", "tag", "score"}, ...]}` ascending by
//! score. A missing or empty `url`/`query` is a `400`; any downstream
//! failure (fetch, parse, embedding, index) is a `500` whose body carries
//! the failure description: `{"error": "..."}`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser extensions
//! and local frontends can call the service directly.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::error::PipelineError;
use crate::models::SearchResult;
use crate::search::{run_search, SearchContext};

/// Shared application state passed to route handlers.
#[derive(Clone)]
struct AppState {
    ctx: Arc<SearchContext>,
}

/// Start the HTTP server on the configured bind address. Runs until the
/// process is terminated.
pub async fn run_server(ctx: Arc<SearchContext>) -> anyhow::Result<()> {
    let bind_addr = ctx.config.server.bind.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/search", post(handle_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { ctx });

    info!("listening on http://{bind_addr}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

/// JSON error body: `{"error": "..."}`.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Wraps a [`PipelineError`] into an HTTP response: `400` for client input
/// errors, `500` for everything downstream.
struct ApiError(PipelineError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self.0, "search request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============ POST /search ============

/// Request body for `POST /search`. Both fields are required; they default
/// to empty so the handler can reject them with a `400` instead of a
/// deserialization rejection.
#[derive(Deserialize)]
struct SearchRequestBody {
    #[serde(default)]
    url: String,
    #[serde(default)]
    query: String,
}

/// Response body for `POST /search`.
#[derive(Serialize)]
struct SearchResponseBody {
    results: Vec<SearchResult>,
}

async fn handle_search(
    State(state): State<AppState>,
    Json(body): Json<SearchRequestBody>,
) -> Result<Json<SearchResponseBody>, ApiError> {
    let results = run_search(&state.ctx, &body.url, &body.query)
        .await
        .map_err(ApiError)?;
    Ok(Json(SearchResponseBody { results }))
}

// ============ GET /health ============

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
