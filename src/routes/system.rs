//! Static system endpoints.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;


/// Fixed status payload shown in the dashboard header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub alerts: u32,
    pub status: &'static str,
    pub updated_at: DateTime<Utc>,
}

/// GET /: plain-text banner.
pub async fn banner() -> &'static str {
    "fleetdash API is running"
}

/// GET /api/system-status: static health payload.
pub async fn status() -> Json<SystemStatus> {
    Json(SystemStatus {
        alerts: 0,
        status: "Optimal",
        updated_at: Utc::now(),
    })
}
