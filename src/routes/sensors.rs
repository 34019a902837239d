//! Sensor routes: list (optionally per household), create, update and delete.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::middleware::query_params::QueryParams;
use crate::middleware::validated_json::ValidatedJson;
use crate::models::document::{Collection, DeleteResult, Document};
use crate::models::pagination::Pagination;
use crate::models::sensor::{CreateSensor, UpdateSensor};
use crate::services::documents;
use crate::AppState;

/// Filters for listing sensors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorFilters {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
}

/// GET /api/sensors[?userID=...]: most recent sensors first.
pub async fn list(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
    QueryParams(filters): QueryParams<SensorFilters>,
) -> Result<Json<Vec<Document>>, AppError> {
    let result = documents::list(
        &state.db,
        Collection::Sensors,
        filters.user_id.as_deref(),
        &pagination,
    )
    .await?;
    Ok(Json(result))
}

/// POST /api/sensors: register a sensor.
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateSensor>,
) -> Result<Json<Document>, AppError> {
    let sensor = documents::create(&state.db, Collection::Sensors, &body).await?;
    Ok(Json(sensor))
}

/// PUT /api/sensors/:id: update sensor fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateSensor>,
) -> Result<Json<Document>, AppError> {
    let sensor = documents::update(&state.db, Collection::Sensors, &id, &body).await?;
    Ok(Json(sensor))
}

/// DELETE /api/sensors/:id: remove a sensor. Its measures are kept.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let result = documents::delete(&state.db, Collection::Sensors, &id).await?;
    Ok(Json(result))
}
