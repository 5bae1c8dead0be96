//! Upstream response shapes as requested from the completion service.
//!
//! The service is asked for a JSON schema but nothing guarantees it honours
//! it, so parsing is done field by field from a `serde_json::Value` and any
//! field that is missing or has the wrong type comes back as `None`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecastResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub days: Vec<RawForecastDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecastDay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hiking_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hiking_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowboard_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowboard_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ski_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ski_note: Option<String>,
}

impl RawForecastResponse {
    /// Lenient parse. A missing or non-array `days` yields no days, and
    /// entries that are not objects are skipped.
    pub fn from_value(value: &Value) -> Self {
        let location = value
            .get("location")
            .and_then(Value::as_str)
            .map(str::to_string);

        let days = match value.get("days") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => Some(RawForecastDay::from_object(obj)),
                    other => {
                        debug!(entry = %other, "Skipping non-object forecast day");
                        None
                    }
                })
                .collect(),
            Some(other) => {
                debug!(days = %other, "Forecast response `days` is not an array");
                Vec::new()
            }
            None => Vec::new(),
        };

        Self { location, days }
    }
}

impl RawForecastDay {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            date: text(obj, "date"),
            temp_high: number(obj, "temp_high"),
            temp_low: number(obj, "temp_low"),
            condition: text(obj, "condition"),
            wind_speed: number(obj, "wind_speed"),
            precipitation: number(obj, "precipitation"),
            hiking_score: number(obj, "hiking_score"),
            hiking_note: text(obj, "hiking_note"),
            snowboard_score: number(obj, "snowboard_score"),
            snowboard_note: text(obj, "snowboard_note"),
            ski_score: number(obj, "ski_score"),
            ski_note: text(obj, "ski_note"),
        }
    }
}

/// Accepts JSON numbers and numeric strings ("12", "12.5"). Non-finite
/// values ("NaN", "inf") count as missing.
pub(crate) fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

pub(crate) fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}
