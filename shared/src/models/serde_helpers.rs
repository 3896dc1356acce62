//! Common serde helpers for timestamp rendering
//!
//! Orders expose their creation timestamp as `YYYY-MM-DD HH:MM:SS` (no zone),
//! the format the store returns for `TIMESTAMP` columns.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Wire format for order timestamps
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialize a `NaiveDateTime` as `YYYY-MM-DD HH:MM:SS`
pub fn serialize_datetime<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(DATETIME_FORMAT))
}

/// Deserialize `YYYY-MM-DD HH:MM:SS` (a `T` separator is also accepted)
pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| serde::de::Error::custom(format!("invalid datetime {raw:?}: {e}")))
}
