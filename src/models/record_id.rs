//! Canonical record ids.
//!
//! Legacy exports wrap ids in an extended-JSON envelope (`{"$oid": "..."}`)
//! while records written by the API hold bare strings. Every read boundary
//! goes through [`normalize`] so comparisons only ever see the bare form.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Envelope key used by extended-JSON object ids.
pub const OID_KEY: &str = "$oid";

/// Foreign-key fields that may carry either id representation.
pub const REFERENCE_FIELDS: [&str; 2] = ["userID", "sensorID"];

/// Convert a bare string or a `{"$oid": ...}` envelope to a canonical id.
///
/// Returns `None` for anything else, including blank strings.
pub fn normalize(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get(OID_KEY)?.as_str()?,
        _ => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Rewrite every reference field of a document to its canonical string form.
///
/// Unresolvable values are left untouched; a dangling or malformed reference
/// is not an error.
pub fn normalize_references(doc: &mut Map<String, Value>) {
    for field in REFERENCE_FIELDS {
        if let Some(value) = doc.get_mut(field) {
            if let Some(id) = normalize(value) {
                *value = Value::String(id);
            }
        }
    }
}

/// Serde adapter accepting either id representation in request payloads.
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    normalize(&value).ok_or_else(|| {
        serde::de::Error::custom("expected a non-empty id string or {\"$oid\": ...} envelope")
    })
}

/// Optional variant of [`deserialize`] for partial updates.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => normalize(&value).map(Some).ok_or_else(|| {
            serde::de::Error::custom("expected a non-empty id string or {\"$oid\": ...} envelope")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_string_is_kept() {
        assert_eq!(
            normalize(&json!("65a1f0c2e4b0a1b2c3d4e5f6")),
            Some("65a1f0c2e4b0a1b2c3d4e5f6".to_string())
        );
    }

    #[test]
    fn oid_envelope_is_unwrapped() {
        assert_eq!(
            normalize(&json!({ "$oid": "65a1f0c2e4b0a1b2c3d4e5f6" })),
            Some("65a1f0c2e4b0a1b2c3d4e5f6".to_string())
        );
    }

    #[test]
    fn both_forms_compare_equal() {
        let bare = normalize(&json!("abc123"));
        let wrapped = normalize(&json!({ "$oid": "abc123" }));
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn unusable_values_yield_none() {
        assert_eq!(normalize(&json!(null)), None);
        assert_eq!(normalize(&json!("")), None);
        assert_eq!(normalize(&json!("   ")), None);
        assert_eq!(normalize(&json!(42)), None);
        assert_eq!(normalize(&json!({ "id": "abc" })), None);
        assert_eq!(normalize(&json!({ "$oid": 7 })), None);
    }

    #[test]
    fn references_are_rewritten_in_place() {
        let mut doc = json!({
            "location": "kitchen",
            "userID": { "$oid": "u-1" },
            "sensorID": "s-1"
        })
        .as_object()
        .cloned()
        .unwrap();

        normalize_references(&mut doc);

        assert_eq!(doc["userID"], json!("u-1"));
        assert_eq!(doc["sensorID"], json!("s-1"));
        assert_eq!(doc["location"], json!("kitchen"));
    }

    #[test]
    fn malformed_reference_is_left_alone() {
        let mut doc = json!({ "userID": 12 }).as_object().cloned().unwrap();
        normalize_references(&mut doc);
        assert_eq!(doc["userID"], json!(12));
    }
}
