//! Field access and date helpers shared by the models

use crate::aggregate::id_to_string;
use crate::ModelError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Display format for timestamps, e.g. `02/15/2026 11:59 PM`
pub(crate) const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// Required identifier, stringified
pub(crate) fn require_id(value: &Value) -> Result<String, ModelError> {
    if !value.is_object() {
        return Err(ModelError::NotAnObject);
    }
    value
        .get("id")
        .and_then(id_to_string)
        .ok_or(ModelError::MissingField("id"))
}

/// Optional id-like field (number or string)
pub(crate) fn id_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(id_to_string)
}

/// String field; `null` and missing are both `None`
pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// String field with a fallback for missing or `null`
pub(crate) fn str_or(value: &Value, key: &str, default: &str) -> String {
    str_field(value, key).unwrap_or_else(|| default.to_string())
}

pub(crate) fn f64_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

pub(crate) fn bool_or(value: &Value, key: &str, default: bool) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Parses an ISO-8601 timestamp; values without an offset are taken as UTC
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Formats a timestamp for display in its own offset
///
/// Missing values become `missing`; unparsable values are shown as written.
pub(crate) fn format_timestamp(raw: Option<&str>, missing: &str) -> String {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return missing.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return dt.format(DISPLAY_DATE_FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S") {
        Ok(naive) => naive.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Formats a point value without a trailing `.0`
pub(crate) fn format_points(points: f64) -> String {
    if points.fract() == 0.0 && points.abs() < 1e15 {
        format!("{}", points as i64)
    } else {
        points.to_string()
    }
}
