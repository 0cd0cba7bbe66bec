pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::optimization::handlers as optimization;
use crate::parsing::handlers as parsing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/parse", post(parsing::handle_parse_resume))
        .route(
            "/api/v1/resumes/analyze-job",
            post(optimization::handle_analyze_job),
        )
        .route("/api/v1/resumes/optimize", post(optimization::handle_optimize))
        // One limit for uploads and JSON bodies alike
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
