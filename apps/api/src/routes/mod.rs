pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::analysis::handlers;
use crate::analysis::models::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Upload body cap: the file limit plus room for part headers and a full-length `jobText`.
/// The file itself is held to `MAX_UPLOAD_BYTES` by the handler.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 128 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .route(
            "/api/analyze/upload",
            post(handlers::handle_analyze_upload)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(UPLOAD_BODY_LIMIT)),
        )
        .with_state(state)
}
