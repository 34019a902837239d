//! Measurement payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::record_id;

/// Create payload for a measurement reported by a sensor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMeasure {
    #[serde(rename = "sensorID", deserialize_with = "record_id::deserialize")]
    pub sensor_id: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 60))]
    pub kind: String,
    #[serde(deserialize_with = "deserialize_reading")]
    pub value: f64,
    #[serde(default = "Utc::now")]
    pub creation_date: DateTime<Utc>,
}

/// Partial update payload for a measurement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMeasure {
    #[serde(
        rename = "sensorID",
        default,
        deserialize_with = "record_id::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub sensor_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 60))]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_reading_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

/// Read a measurement value sent either as a JSON number or a numeric string.
pub fn parse_reading(value: &Value) -> Option<f64> {
    let reading = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    reading.is_finite().then_some(reading)
}

fn deserialize_reading<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    parse_reading(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid measure value '{value}'")))
}

fn deserialize_reading_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse_reading(&value).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid measure value '{value}'"))
        }),
    }
}
