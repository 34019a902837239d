//! Sensor creation dates and the policy used to read them.
//!
//! Historical records hold `MM/DD/YYYY` while newer ones hold ISO
//! `YYYY-MM-DD`. Writes go through [`SensorDate`], which accepts either and
//! always stores ISO.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Legacy `month/day/year` layout.
pub const LEGACY_FORMAT: &str = "%m/%d/%Y";

/// Canonical ISO calendar date layout.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Which `creationDate` layouts the dashboard history accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreationDatePolicy {
    /// Legacy, ISO date and ISO date-time layouts.
    #[default]
    Tolerant,
    /// Only `MM/DD/YYYY`; everything else is reported as undated.
    Legacy,
}

impl CreationDatePolicy {
    /// Parse a stored `creationDate` under this policy.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        match self {
            CreationDatePolicy::Tolerant => parse_any(raw),
            CreationDatePolicy::Legacy => parse_legacy(raw),
        }
    }
}

impl FromStr for CreationDatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tolerant" => Ok(Self::Tolerant),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown creation date policy '{other}'")),
        }
    }
}

/// Parse the legacy `MM/DD/YYYY` layout only.
pub fn parse_legacy(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), LEGACY_FORMAT).ok()
}

/// Parse any accepted layout: legacy, ISO date, RFC 3339 or naive ISO date-time.
pub fn parse_any(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    parse_legacy(raw)
        .or_else(|| NaiveDate::parse_from_str(raw, ISO_FORMAT).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// A validated sensor creation date, stored in ISO form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDate(pub NaiveDate);

impl SensorDate {
    pub fn today() -> Self {
        Self(chrono::Utc::now().date_naive())
    }
}

impl fmt::Display for SensorDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl Serialize for SensorDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SensorDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_any(&raw).map(SensorDate).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid creationDate '{raw}', expected MM/DD/YYYY or YYYY-MM-DD"
            ))
        })
    }
}
