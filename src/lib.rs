pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use sqlx::PgPool;

use crate::services::search::SearchClient;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub search: SearchClient,
}

impl AppState {
    pub fn new(db: PgPool, config: config::AppConfig) -> Self {
        let search = SearchClient::from_config(&config);
        Self { db, config, search }
    }
}
