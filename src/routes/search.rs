//! Search proxy route for the assistant sidebar.

use axum::{
    extract::State,
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::middleware::query_params::QueryParams;
use crate::services::search::SearchQuery;
use crate::AppState;

/// GET /api/search?q=...&type=search|shopping|news: raw provider response.
pub async fn search(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let result = state.search.search(&query.q, query.kind).await?;
    Ok(Json(result))
}
