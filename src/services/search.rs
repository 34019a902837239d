//! Search proxy for the assistant sidebar, backed by SerpApi.
//!
//! The provider response is passed through untouched; this module only picks
//! the engine, pins the locale and turns provider failures into
//! [`AppError::Upstream`].

use serde::Deserialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Locale parameters sent with every provider request.
pub const GOOGLE_DOMAIN: &str = "google.fr";
pub const COUNTRY: &str = "fr";
pub const LANGUAGE: &str = "fr";

/// Result category requested by the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    #[default]
    Search,
    Shopping,
    News,
}

impl SearchKind {
    /// Provider engine name for this category.
    pub fn engine(&self) -> &'static str {
        match self {
            SearchKind::Search => "google",
            SearchKind::Shopping => "google_shopping",
            SearchKind::News => "google_news",
        }
    }
}

/// Query string accepted by `GET /api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, rename = "type")]
    pub kind: SearchKind,
}

/// Thin client for the external search provider.
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.serp_api_url.clone(), config.serp_api_key.clone())
    }

    /// Forward a query to the provider and return its raw JSON response.
    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<Value, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Search query must not be empty".to_string()));
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("SERP_API_KEY is not configured".to_string()))?;

        tracing::info!(engine = kind.engine(), query, "Forwarding search request");

        let response = self
            .http
            .get(&self.base_url)
            .query(&request_params(query, kind, api_key))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("provider returned {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("undecodable response: {}", e.without_url())))?;

        check_payload(body)
    }
}

/// Query parameters sent to the provider, in a stable order.
pub fn request_params<'a>(query: &'a str, kind: SearchKind, api_key: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("q", query),
        ("engine", kind.engine()),
        ("google_domain", GOOGLE_DOMAIN),
        ("gl", COUNTRY),
        ("hl", LANGUAGE),
        ("api_key", api_key),
    ]
}

/// Reject provider payloads that carry no usable result.
fn check_payload(body: Value) -> Result<Value, AppError> {
    match &body {
        Value::Null => Err(AppError::Upstream("empty response".to_string())),
        Value::Object(map) => match map.get("error") {
            Some(err) if !err.is_null() => {
                Err(AppError::Upstream(format!("provider error: {err}")))
            }
            _ => Ok(body),
        },
        _ => Ok(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_map_to_engines() {
        assert_eq!(SearchKind::Search.engine(), "google");
        assert_eq!(SearchKind::Shopping.engine(), "google_shopping");
        assert_eq!(SearchKind::News.engine(), "google_news");
    }

    #[test]
    fn query_defaults_to_general_search() {
        let q: SearchQuery = serde_json::from_value(json!({ "q": "thermostat" })).unwrap();
        assert_eq!(q.kind, SearchKind::Search);

        let q: SearchQuery =
            serde_json::from_value(json!({ "q": "thermostat", "type": "shopping" })).unwrap();
        assert_eq!(q.kind, SearchKind::Shopping);
    }

    #[test]
    fn params_pin_the_locale() {
        let params = request_params("capteur co2", SearchKind::News, "key");
        assert!(params.contains(&("q", "capteur co2")));
        assert!(params.contains(&("engine", "google_news")));
        assert!(params.contains(&("google_domain", "google.fr")));
        assert!(params.contains(&("gl", "fr")));
        assert!(params.contains(&("hl", "fr")));
        assert!(params.contains(&("api_key", "key")));
    }

    #[test]
    fn provider_error_member_is_upstream_failure() {
        let err = check_payload(json!({ "error": "Invalid API key." })).unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[test]
    fn null_payload_is_upstream_failure() {
        assert!(matches!(check_payload(Value::Null), Err(AppError::Upstream(_))));
    }

    #[test]
    fn usable_payload_passes_through_unchanged() {
        let body = json!({ "organic_results": [{ "title": "Capteur" }], "error": null });
        assert_eq!(check_payload(body.clone()).unwrap(), body);
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_call() {
        let client = SearchClient::new("http://127.0.0.1:9/unreachable", Some("key".to_string()));
        let err = client.search("   ", SearchKind::Search).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_api_key_is_upstream_failure() {
        let client = SearchClient::new("http://127.0.0.1:9/unreachable", None);
        let err = client.search("thermostat", SearchKind::Search).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn transport_failure_does_not_expose_the_api_key() {
        let client = SearchClient::new("http://127.0.0.1:9/search.json", Some("TOPSECRETKEY".to_string()));
        let err = client.search("thermostat", SearchKind::Search).await.unwrap_err();
        let AppError::Upstream(message) = &err else {
            panic!("expected an upstream error, got {err:?}");
        };
        assert!(message.starts_with("request failed"));
        assert!(!message.contains("TOPSECRETKEY"));
        assert!(!err.to_string().contains("api_key"));
    }
}
