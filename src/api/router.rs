//! Application router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::AppState;
use crate::config::MAX_UPLOAD_BYTES;

/// Build the application router.
///
/// Stored photos are served read-only from the pipeline's upload directory
/// under `/uploads/`.
pub fn app_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.pipeline.upload_dir());

    Router::new()
        .route("/", get(endpoints::listing::index))
        .route("/submit", post(endpoints::submit::submit))
        .route("/health", get(endpoints::health::check))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
