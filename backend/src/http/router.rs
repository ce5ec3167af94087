//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The mock is called from static pages served on another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let fortune = Router::new().route("/analyze/birthday", post(handlers::analyze_birthday));

    let accounts = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/register/send_code", post(handlers::send_code))
        .route("/register/validate_code", post(handlers::validate_code))
        .route("/register/submit", post(handlers::register));

    Router::new()
        .route("/", get(handlers::root_status))
        .route("/health", get(handlers::health_check))
        .route("/debug/codes", get(handlers::debug_codes))
        .merge(fortune)
        .merge(accounts)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
