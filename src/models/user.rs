//! Household ("user") payloads.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use validator::Validate;

/// Named house size categories used by the admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseCategory {
    Small,
    Medium,
    Big,
}

/// House size: either a category or a floor area in square meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HouseSize {
    Category(HouseCategory),
    Area(f64),
}

impl Serialize for HouseSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HouseSize::Category(category) => category.serialize(serializer),
            HouseSize::Area(area) => serializer.serialize_f64(*area),
        }
    }
}

impl<'de> Deserialize<'de> for HouseSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "small" => Ok(HouseSize::Category(HouseCategory::Small)),
                "medium" => Ok(HouseSize::Category(HouseCategory::Medium)),
                "big" => Ok(HouseSize::Category(HouseCategory::Big)),
                other => match other.parse::<f64>() {
                    Ok(area) if area.is_finite() && area > 0.0 => Ok(HouseSize::Area(area)),
                    _ => Err(invalid_house_size(&s)),
                },
            },
            Value::Number(n) => match n.as_f64() {
                Some(area) if area > 0.0 => Ok(HouseSize::Area(area)),
                _ => Err(invalid_house_size(&n)),
            },
            other => Err(invalid_house_size(&other)),
        }
    }
}

fn invalid_house_size<E: serde::de::Error>(shown: impl std::fmt::Display) -> E {
    E::custom(format!(
        "invalid houseSize '{shown}', expected small, medium, big or a positive area"
    ))
}

/// Create payload for a household.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 120))]
    pub location: String,
    #[validate(range(min = 1, max = 50))]
    pub persons_in_house: u32,
    pub house_size: HouseSize,
}

/// Partial update payload for a household.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120))]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 50))]
    pub persons_in_house: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_size: Option<HouseSize>,
}
