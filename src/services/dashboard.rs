//! Dashboard statistics aggregation over the three collections.
//!
//! The store is only asked for the handful of fields the summary needs; the
//! grouping, month bucketing and de-duplication happen in [`summarize`], which
//! is pure so it can be exercised without a database.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::creation_date::CreationDatePolicy;

/// Display name for records whose grouping field is missing or blank.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Summary document rendered by the dashboard overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_sensors: i64,
    pub total_measures: i64,
    pub sensor_type_data: Vec<NamedCount>,
    pub location_data: Vec<NamedCount>,
    pub creation_history: Vec<MonthBucket>,
    pub active_countries: Vec<String>,
    /// Sensors whose `creationDate` is missing or rejected by the date policy.
    pub undated_sensors: i64,
}

/// One slice of a pie or bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub value: i64,
}

/// Sensors created during one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub name: String,
    pub sensors: i64,
}

/// The sensor fields the summary reads, as stored.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct SensorFacts {
    pub location: Option<Value>,
    pub creation_date: Option<Value>,
}

/// Fetch the raw fields concurrently and build the summary.
///
/// Rows are read oldest first so grouped entries keep discovery order.
/// Any failing query fails the whole request.
pub async fn get_stats(
    pool: &PgPool,
    policy: CreationDatePolicy,
) -> Result<DashboardStats, AppError> {
    let (measure_types, sensors, user_locations) = tokio::try_join!(
        fetch_measure_types(pool),
        fetch_sensor_facts(pool),
        fetch_user_locations(pool),
    )?;

    let stats = summarize(&measure_types, &sensors, &user_locations, policy);
    tracing::debug!(
        users = stats.total_users,
        sensors = stats.total_sensors,
        measures = stats.total_measures,
        undated_sensors = stats.undated_sensors,
        "Dashboard statistics computed"
    );
    Ok(stats)
}

/// One `type` value per measure.
async fn fetch_measure_types(pool: &PgPool) -> Result<Vec<Option<Value>>, AppError> {
    let rows = sqlx::query_scalar::<_, Option<Value>>(
        "SELECT doc->'type' FROM measures ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Location and creation date of every sensor.
async fn fetch_sensor_facts(pool: &PgPool) -> Result<Vec<SensorFacts>, AppError> {
    let rows = sqlx::query_as::<_, SensorFacts>(
        "SELECT doc->'location' AS location, doc->'creationDate' AS creation_date \
         FROM sensors ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// One `location` value per user.
async fn fetch_user_locations(pool: &PgPool) -> Result<Vec<Option<Value>>, AppError> {
    let rows = sqlx::query_scalar::<_, Option<Value>>(
        "SELECT doc->'location' FROM users ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Build the dashboard summary from one entry per stored record.
pub fn summarize(
    measure_types: &[Option<Value>],
    sensors: &[SensorFacts],
    user_locations: &[Option<Value>],
    policy: CreationDatePolicy,
) -> DashboardStats {
    let (creation_history, undated_sensors) = bucket_by_month(sensors, policy);

    DashboardStats {
        total_users: user_locations.len() as i64,
        total_sensors: sensors.len() as i64,
        total_measures: measure_types.len() as i64,
        sensor_type_data: group_counts(measure_types.iter().map(|t| text(t.as_ref()))),
        location_data: group_counts(sensors.iter().map(|s| text(s.location.as_ref()))),
        creation_history,
        active_countries: distinct_texts(user_locations.iter().map(|l| text(l.as_ref()))),
        undated_sensors,
    }
}

/// Read a field as text; blank or whitespace-only strings and other JSON
/// types count as absent.
fn text(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Count occurrences per distinct value, in first-seen order.
fn group_counts<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<NamedCount> {
    let mut order: Vec<(Option<&str>, i64)> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();

    for value in values {
        match index.entry(value) {
            Entry::Occupied(slot) => order[*slot.get()].1 += 1,
            Entry::Vacant(slot) => {
                slot.insert(order.len());
                order.push((value, 1));
            }
        }
    }

    order
        .into_iter()
        .map(|(value, count)| NamedCount {
            name: value.map_or_else(|| UNKNOWN_LABEL.to_string(), capitalize_first),
            value: count,
        })
        .collect()
}

/// Bucket sensors by creation month; returns the sorted buckets and the
/// number of sensors that could not be dated.
fn bucket_by_month(sensors: &[SensorFacts], policy: CreationDatePolicy) -> (Vec<MonthBucket>, i64) {
    // Keyed on the first day of the month so ordering is chronological.
    let mut months: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    let mut undated = 0i64;

    for sensor in sensors {
        let month = text(sensor.creation_date.as_ref())
            .and_then(|raw| policy.parse(raw))
            .and_then(|date| date.with_day(1));

        match month {
            Some(month) => *months.entry(month).or_insert(0) += 1,
            None => undated += 1,
        }
    }

    let buckets = months
        .into_iter()
        .map(|(month, count)| MonthBucket {
            name: month.format("%b %Y").to_string(),
            sensors: count,
        })
        .collect();

    (buckets, undated)
}

/// Distinct values in first-seen order, skipping absent ones.
fn distinct_texts<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Upper-case the first character, leaving the rest untouched.
fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn types(values: &[&str]) -> Vec<Option<Value>> {
        values.iter().map(|v| Some(json!(v))).collect()
    }

    fn sensor(location: Option<Value>, creation_date: Option<Value>) -> SensorFacts {
        SensorFacts {
            location,
            creation_date,
        }
    }

    fn dated(dates: &[&str]) -> Vec<SensorFacts> {
        dates
            .iter()
            .map(|d| sensor(Some(json!("kitchen")), Some(json!(d))))
            .collect()
    }

    #[test]
    fn measure_types_are_grouped_in_discovery_order() {
        let stats = summarize(
            &types(&["temperature", "temperature", "humidity"]),
            &[],
            &[],
            CreationDatePolicy::Tolerant,
        );
        assert_eq!(
            stats.sensor_type_data,
            vec![
                NamedCount { name: "Temperature".to_string(), value: 2 },
                NamedCount { name: "Humidity".to_string(), value: 1 },
            ]
        );
        assert_eq!(stats.total_measures, 3);
    }

    #[test]
    fn missing_blank_and_non_string_types_fall_into_unknown() {
        let measures = vec![None, Some(json!("")), Some(json!(null)), Some(json!(5)), Some(json!("airpollution"))];
        let stats = summarize(&measures, &[], &[], CreationDatePolicy::Tolerant);
        assert_eq!(
            stats.sensor_type_data,
            vec![
                NamedCount { name: "Unknown".to_string(), value: 4 },
                NamedCount { name: "Airpollution".to_string(), value: 1 },
            ]
        );
    }

    #[test]
    fn whitespace_only_values_count_as_unknown() {
        let measures = vec![Some(json!("   ")), Some(json!("humidity")), Some(json!("\t"))];
        let sensors = vec![sensor(Some(json!(" ")), None), sensor(Some(json!("attic")), None)];
        let stats = summarize(&measures, &sensors, &[], CreationDatePolicy::Tolerant);
        assert_eq!(
            stats.sensor_type_data,
            vec![
                NamedCount { name: "Unknown".to_string(), value: 2 },
                NamedCount { name: "Humidity".to_string(), value: 1 },
            ]
        );
        assert_eq!(
            stats.location_data,
            vec![
                NamedCount { name: "Unknown".to_string(), value: 1 },
                NamedCount { name: "Attic".to_string(), value: 1 },
            ]
        );
    }

    #[test]
    fn capitalization_only_touches_the_first_character() {
        assert_eq!(capitalize_first("living room"), "Living room");
        assert_eq!(capitalize_first("airPollution"), "AirPollution");
        assert_eq!(capitalize_first("étage"), "Étage");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn type_counts_sum_to_total_measures() {
        let measures = types(&["a", "b", "a", "c", "b", "a"]);
        let stats = summarize(&measures, &[], &[], CreationDatePolicy::Tolerant);
        let sum: i64 = stats.sensor_type_data.iter().map(|c| c.value).sum();
        assert_eq!(sum, stats.total_measures);
    }

    #[test]
    fn location_counts_sum_to_total_sensors() {
        let sensors = vec![
            sensor(Some(json!("kitchen")), None),
            sensor(Some(json!("garage")), None),
            sensor(None, None),
            sensor(Some(json!("kitchen")), None),
        ];
        let stats = summarize(&[], &sensors, &[], CreationDatePolicy::Tolerant);
        assert_eq!(
            stats.location_data,
            vec![
                NamedCount { name: "Kitchen".to_string(), value: 2 },
                NamedCount { name: "Garage".to_string(), value: 1 },
                NamedCount { name: "Unknown".to_string(), value: 1 },
            ]
        );
        let sum: i64 = stats.location_data.iter().map(|c| c.value).sum();
        assert_eq!(sum, stats.total_sensors);
    }

    #[test]
    fn legacy_policy_drops_iso_dates_from_history() {
        let sensors = dated(&["01/15/2024", "02/01/2024", "2024-03-01"]);
        let stats = summarize(&[], &sensors, &[], CreationDatePolicy::Legacy);
        assert_eq!(
            stats.creation_history,
            vec![
                MonthBucket { name: "Jan 2024".to_string(), sensors: 1 },
                MonthBucket { name: "Feb 2024".to_string(), sensors: 1 },
            ]
        );
        assert_eq!(stats.undated_sensors, 1);
    }

    #[test]
    fn tolerant_policy_keeps_iso_dates() {
        let sensors = dated(&["01/15/2024", "02/01/2024", "2024-03-01"]);
        let stats = summarize(&[], &sensors, &[], CreationDatePolicy::Tolerant);
        assert_eq!(
            stats.creation_history,
            vec![
                MonthBucket { name: "Jan 2024".to_string(), sensors: 1 },
                MonthBucket { name: "Feb 2024".to_string(), sensors: 1 },
                MonthBucket { name: "Mar 2024".to_string(), sensors: 1 },
            ]
        );
        assert_eq!(stats.undated_sensors, 0);
    }

    #[test]
    fn history_is_chronological_across_years() {
        let sensors = dated(&["03/02/2024", "12/31/2023", "2023-01-05", "03/20/2024", "10/10/2023"]);
        let stats = summarize(&[], &sensors, &[], CreationDatePolicy::Tolerant);
        let names: Vec<&str> = stats.creation_history.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Jan 2023", "Oct 2023", "Dec 2023", "Mar 2024"]);
        assert_eq!(stats.creation_history[3].sensors, 2);
    }

    #[test]
    fn history_plus_undated_accounts_for_every_sensor() {
        let mut sensors = dated(&["01/15/2024", "garbage", "2024-06-30T12:00:00Z", ""]);
        sensors.push(sensor(Some(json!("attic")), None));
        sensors.push(sensor(Some(json!("attic")), Some(json!(20240101))));

        for policy in [CreationDatePolicy::Tolerant, CreationDatePolicy::Legacy] {
            let stats = summarize(&[], &sensors, &[], policy);
            let dated: i64 = stats.creation_history.iter().map(|b| b.sensors).sum();
            assert_eq!(dated + stats.undated_sensors, stats.total_sensors);
        }
    }

    #[test]
    fn legacy_history_counts_only_legacy_dates() {
        let sensors = dated(&["01/15/2024", "01/20/2024", "2024-01-25", "05/05/2023"]);
        let stats = summarize(&[], &sensors, &[], CreationDatePolicy::Legacy);
        let dated: i64 = stats.creation_history.iter().map(|b| b.sensors).sum();
        assert_eq!(dated, 3);
    }

    #[test]
    fn active_countries_are_distinct_and_non_empty() {
        let users = vec![
            Some(json!("France")),
            Some(json!("france")),
            None,
            Some(json!("")),
            Some(json!("   ")),
            Some(json!(null)),
            Some(json!("France")),
            Some(json!("Belgium")),
        ];
        let stats = summarize(&[], &[], &users, CreationDatePolicy::Tolerant);
        assert_eq!(stats.active_countries, vec!["France", "france", "Belgium"]);
        assert_eq!(stats.total_users, 8);
    }

    #[test]
    fn empty_store_yields_empty_summary() {
        let stats = summarize(&[], &[], &[], CreationDatePolicy::Tolerant);
        assert_eq!(stats.total_users, 0);
        assert!(stats.sensor_type_data.is_empty());
        assert!(stats.creation_history.is_empty());
        assert!(stats.active_countries.is_empty());
    }

    #[test]
    fn summary_serializes_with_camel_case_keys() {
        let sensors = dated(&["01/15/2024"]);
        let stats = summarize(&types(&["humidity"]), &sensors, &[Some(json!("Spain"))], CreationDatePolicy::Tolerant);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalUsers"], 1);
        assert_eq!(json["totalSensors"], 1);
        assert_eq!(json["totalMeasures"], 1);
        assert_eq!(json["sensorTypeData"][0]["name"], "Humidity");
        assert_eq!(json["locationData"][0]["value"], 1);
        assert_eq!(json["creationHistory"][0]["name"], "Jan 2024");
        assert_eq!(json["creationHistory"][0]["sensors"], 1);
        assert_eq!(json["activeCountries"][0], "Spain");
        assert_eq!(json["undatedSensors"], 0);
    }
}
