use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

use super::forecast::WeatherCondition;

/// Current weather at a location, rated for outdoor activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub location: String,
    pub temperature: f64,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub condition: WeatherCondition,
    pub wind_speed: f64,
    /// km
    pub visibility: f64,
    pub adventure_score: u8,
    pub recommended_activity: String,
    #[serde(default)]
    pub insights: Vec<Insight>,
}

/// A short AI-written observation about the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    /// Percent, 0-100
    pub confidence: u8,
}
