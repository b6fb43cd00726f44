//! Route definitions for the Scout web server

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Research pipeline
        .route("/research", post(handlers::research))
        .route("/research/history", get(handlers::research_history))
        .route("/research/models", get(handlers::list_models))
}
