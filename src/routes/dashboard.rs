//! Dashboard routes: aggregated statistics for the overview page.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

/// GET /api/dashboard-stats: aggregated dashboard statistics.
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = dashboard::get_stats(&state.db, state.config.creation_date_policy).await?;
    Ok(Json(stats))
}
