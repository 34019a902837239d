//! Sensor payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::creation_date::SensorDate;
use crate::models::record_id;

/// Create payload for a sensor.
///
/// `creationDate` accepts `MM/DD/YYYY` or `YYYY-MM-DD` and is stored as ISO;
/// it defaults to today when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSensor {
    #[validate(length(min = 1, max = 120))]
    pub location: String,
    #[serde(rename = "userID", deserialize_with = "record_id::deserialize")]
    pub user_id: String,
    #[serde(default = "SensorDate::today")]
    pub creation_date: SensorDate,
}

/// Partial update payload for a sensor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSensor {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120))]
    pub location: Option<String>,
    #[serde(
        rename = "userID",
        default,
        deserialize_with = "record_id::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<SensorDate>,
}
