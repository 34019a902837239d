//! Measurement routes: list (optionally per sensor), create, update and delete.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::middleware::query_params::QueryParams;
use crate::middleware::validated_json::ValidatedJson;
use crate::models::document::{Collection, DeleteResult, Document};
use crate::models::measure::{CreateMeasure, UpdateMeasure};
use crate::models::pagination::Pagination;
use crate::services::documents;
use crate::AppState;

/// Filters for listing measurements.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeasureFilters {
    #[serde(rename = "sensorID")]
    pub sensor_id: Option<String>,
}

/// GET /api/measures[?sensorID=...]: most recent measurements first.
pub async fn list(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
    QueryParams(filters): QueryParams<MeasureFilters>,
) -> Result<Json<Vec<Document>>, AppError> {
    let result = documents::list(
        &state.db,
        Collection::Measures,
        filters.sensor_id.as_deref(),
        &pagination,
    )
    .await?;
    Ok(Json(result))
}

/// POST /api/measures: record a measurement.
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateMeasure>,
) -> Result<Json<Document>, AppError> {
    let measure = documents::create(&state.db, Collection::Measures, &body).await?;
    Ok(Json(measure))
}

/// PUT /api/measures/:id: correct a measurement.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateMeasure>,
) -> Result<Json<Document>, AppError> {
    let measure = documents::update(&state.db, Collection::Measures, &id, &body).await?;
    Ok(Json(measure))
}

/// DELETE /api/measures/:id: remove a measurement.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let result = documents::delete(&state.db, Collection::Measures, &id).await?;
    Ok(Json(result))
}
