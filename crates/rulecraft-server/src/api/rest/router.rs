//! Router creation and configuration
//!
//! Creates the Axum router for the REST API endpoints.

use super::handlers::*;
use super::types::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use rulecraft_runtime::RuleEngine;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Request timeout used by [`create_router`]
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create REST API router
pub fn create_router(engine: RuleEngine) -> Router {
    create_router_with_timeout(engine, DEFAULT_REQUEST_TIMEOUT)
}

/// Create REST API router; requests running longer than `timeout` get a
/// `408 Request Timeout`
pub fn create_router_with_timeout(engine: RuleEngine, timeout: Duration) -> Router {
    let state = AppState { engine };

    Router::new()
        .route("/health", get(health))
        .route("/get_attributes", get(get_attributes))
        .route("/add_attribute", post(add_attribute))
        .route("/get_rules", get(get_rules))
        .route("/get_rule/:id", get(get_rule))
        .route("/create_rule", post(create_rule))
        .route("/combine_rules", post(combine_rules))
        .route("/evaluate_rule", post(evaluate_rule))
        .route("/modify_rule", post(modify_rule))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
}
