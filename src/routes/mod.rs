//! Route definitions for the fleet dashboard API.

pub mod dashboard;
pub mod health;
pub mod measures;
pub mod search;
pub mod sensors;
pub mod system;
pub mod users;

use axum::http::HeaderValue;
use axum::routing::{get, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Upper bound on accepted request bodies.
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    let api_routes = Router::new()
        .route("/dashboard-stats", get(dashboard::stats))
        .route("/system-status", get(system::status))
        .route("/search", get(search::search))
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", put(users::update).delete(users::delete))
        .route("/sensors", get(sensors::list).post(sensors::create))
        .route("/sensors/{id}", put(sensors::update).delete(sensors::delete))
        .route("/measures", get(measures::list).post(measures::create))
        .route("/measures/{id}", put(measures::update).delete(measures::delete));

    Router::new()
        .route("/", get(system::banner))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", api_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Allow the configured dashboard origin, or any origin if it cannot be parsed.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) if frontend_url != "*" => cors.allow_origin(origin),
        _ => {
            tracing::warn!(frontend_url, "Allowing any CORS origin");
            cors.allow_origin(Any)
        }
    }
}
