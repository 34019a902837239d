use std::env;

use crate::models::creation_date::CreationDatePolicy;

/// Default SerpApi endpoint used by the search proxy.
pub const DEFAULT_SERP_API_URL: &str = "https://serpapi.com/search.json";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub serp_api_key: Option<String>,
    pub serp_api_url: String,
    pub creation_date_policy: CreationDatePolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            serp_api_key: env::var("SERP_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            serp_api_url: env::var("SERP_API_URL")
                .unwrap_or_else(|_| DEFAULT_SERP_API_URL.to_string()),
            creation_date_policy: env::var("CREATION_DATE_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        })
    }
}
