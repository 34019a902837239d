//! Household routes: list, create, update and delete.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::middleware::query_params::QueryParams;
use crate::middleware::validated_json::ValidatedJson;
use crate::models::document::{Collection, DeleteResult, Document};
use crate::models::pagination::Pagination;
use crate::models::user::{CreateUser, UpdateUser};
use crate::services::documents;
use crate::AppState;

/// GET /api/users: most recent households first.
pub async fn list(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> Result<Json<Vec<Document>>, AppError> {
    let result = documents::list(&state.db, Collection::Users, None, &pagination).await?;
    Ok(Json(result))
}

/// POST /api/users: register a household.
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateUser>,
) -> Result<Json<Document>, AppError> {
    let user = documents::create(&state.db, Collection::Users, &body).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id: update household fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateUser>,
) -> Result<Json<Document>, AppError> {
    let user = documents::update(&state.db, Collection::Users, &id, &body).await?;
    Ok(Json(user))
}

/// DELETE /api/users/:id: remove a household. Sensors referencing it are kept.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let result = documents::delete(&state.db, Collection::Users, &id).await?;
    Ok(Json(result))
}
