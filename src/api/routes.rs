use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Leave headroom for multipart framing around the file payload itself.
    let body_limit = state.config.max_upload_size as usize + 64 * 1024;

    Router::new()
        // Messages
        .route("/api/messages", get(handlers::list_messages))
        .route("/api/messages", post(handlers::create_message))
        .route("/api/messages", delete(handlers::clear_messages))
        .route("/api/messages/:id", delete(handlers::delete_message))
        // Files
        .route("/api/files", get(handlers::list_files))
        .route(
            "/api/files",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/files", delete(handlers::clear_files))
        .route("/api/files/:id", delete(handlers::delete_file))
        .route("/api/files/:id/download", get(handlers::download_file))
        // Liveness
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
