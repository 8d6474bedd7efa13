//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::{admin_auth_middleware, logging_middleware, rate_limit_middleware};

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - the website is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health & Status
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        // Content documents
        .route(
            "/content/:page",
            get(handlers::get_content).put(handlers::update_content),
        )
        // Calculators
        .route("/loans/quote", post(handlers::loan_quote))
        .route("/impact/estimate", post(handlers::impact_estimate))
        // Forms
        .route("/forms/contact", post(handlers::submit_contact))
        .route("/forms/volunteer", post(handlers::submit_volunteer))
        .route("/loans/apply", post(handlers::apply_loan))
        // Donations
        .route("/donations/initialize", post(handlers::initialize_donation))
        .route("/donations/verify/:reference", get(handlers::verify_donation));

    // Build full router
    Router::new()
        .nest("/v1", api_v1)
        // Also expose at root for convenience
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(middleware::from_fn(admin_auth_middleware))
}
