//! Route definitions for the CampusAI web server

use crate::{handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Assistant
        .route("/query", post(handlers::handle_query))
        // Accounts
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login))
        .route("/auth/verify", get(handlers::verify))
        // API documentation
        .route("/openapi.json", get(openapi::openapi_json))
}
