//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/formats", get(http::http_list_formats))
        .route("/api/v1/format", get(http::http_get_format).post(http::http_save_format))
        .route("/api/v1/format/delete", post(http::http_delete_format))
        .route("/api/v1/workspace", get(http::http_get_workspace))
        .route("/api/v1/workspace/prompt", post(http::http_post_prompt))
        .route("/api/v1/workspace/lock", post(http::http_post_lock))
        .route("/api/v1/workspace/shuffle", post(http::http_post_shuffle))
        .route("/api/v1/workspace/reset", post(http::http_post_reset))
        .route("/api/v1/workspace/lineup", post(http::http_post_lineup))
        .route("/api/v1/workspace/option/label", post(http::http_post_option_label))
        .route("/api/v1/workspace/option/correct", post(http::http_post_option_correct))
        .route("/api/v1/workspace/keyword", post(http::http_post_keyword))
        .route("/api/v1/workspace/keyword/add", post(http::http_post_keyword_add))
        .route("/api/v1/workspace/keyword/remove", post(http::http_post_keyword_remove))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
