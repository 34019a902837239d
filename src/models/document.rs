//! Stored documents and the collections that hold them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::models::record_id;

/// The three record collections of the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Sensors,
    Measures,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Users, Collection::Sensors, Collection::Measures];

    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Sensors => "sensors",
            Collection::Measures => "measures",
        }
    }

    /// Singular label used in log lines and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Collection::Users => "User",
            Collection::Sensors => "Sensor",
            Collection::Measures => "Measure",
        }
    }

    /// The foreign-key field list endpoints may filter on, if any.
    pub fn reference_field(&self) -> Option<&'static str> {
        match self {
            Collection::Users => None,
            Collection::Sensors => Some("userID"),
            Collection::Measures => Some("sensorID"),
        }
    }
}

/// Raw row as stored in any collection table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub doc: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A record as returned by the API: its id plus the free-form document fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        let mut fields = match row.doc {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                // Scalars or arrays at the top level cannot be flattened.
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        fields.remove("_id");
        record_id::normalize_references(&mut fields);
        Self { id: row.id, fields }
    }
}

/// Outcome of a delete request.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub id: String,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(doc: Value) -> DocumentRow {
        DocumentRow {
            id: "65a1f0c2e4b0a1b2c3d4e5f6".to_string(),
            doc,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn document_flattens_fields_next_to_id() {
        let document: Document = row(json!({ "location": "Kitchen", "creationDate": "2024-01-15" })).into();
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["_id"], "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(json["location"], "Kitchen");
        assert_eq!(json["creationDate"], "2024-01-15");
    }

    #[test]
    fn document_normalizes_references_on_read() {
        let document: Document = row(json!({ "userID": { "$oid": "u-42" } })).into();
        assert_eq!(document.fields["userID"], json!("u-42"));
    }

    #[test]
    fn embedded_legacy_id_does_not_shadow_row_id() {
        let document: Document = row(json!({ "_id": { "$oid": "stale" }, "type": "humidity" })).into();
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["_id"], "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn collection_metadata() {
        assert_eq!(Collection::Users.reference_field(), None);
        assert_eq!(Collection::Sensors.reference_field(), Some("userID"));
        assert_eq!(Collection::Measures.reference_field(), Some("sensorID"));
        assert_eq!(Collection::Measures.table(), "measures");
        assert_eq!(Collection::Sensors.label(), "Sensor");
    }
}
