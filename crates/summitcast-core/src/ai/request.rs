use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A prompt plus the JSON schema the answer must follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub add_context_from_internet: bool,
    pub response_json_schema: Value,
}

impl CompletionRequest {
    /// 7-day forecast with per-activity ratings.
    pub fn forecast(location: &str) -> Self {
        Self {
            prompt: format!(
                "Get a 7-day weather forecast for {}. For each day provide: date, high temperature, \
                 low temperature, weather condition (sunny/cloudy/rainy/snowy), wind speed in km/h, \
                 and precipitation chance as percentage. Also rate each day for outdoor activities \
                 (hiking, snowboarding, skiing) with scores 0-100 and brief recommendations.",
                location
            ),
            add_context_from_internet: true,
            response_json_schema: json!({
                "type": "object",
                "properties": {
                    "location": { "type": "string" },
                    "days": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "date": { "type": "string" },
                                "temp_high": { "type": "number" },
                                "temp_low": { "type": "number" },
                                "condition": { "type": "string" },
                                "wind_speed": { "type": "number" },
                                "precipitation": { "type": "number" },
                                "hiking_score": { "type": "number" },
                                "hiking_note": { "type": "string" },
                                "snowboard_score": { "type": "number" },
                                "snowboard_note": { "type": "string" },
                                "ski_score": { "type": "number" },
                                "ski_note": { "type": "string" }
                            }
                        }
                    }
                }
            }),
        }
    }

    /// Today's conditions, an adventure score and optional insights.
    pub fn current_conditions(location: &str) -> Self {
        Self {
            prompt: format!(
                "Get current weather for {} and analyze for outdoor activities. Provide temperature, \
                 condition (sunny/cloudy/rainy/snowy), wind speed, visibility, and rate the day for \
                 adventures with a score 0-100 plus recommend the best activity for today.",
                location
            ),
            add_context_from_internet: true,
            response_json_schema: json!({
                "type": "object",
                "properties": {
                    "location": { "type": "string" },
                    "temperature": { "type": "number" },
                    "condition": { "type": "string" },
                    "wind_speed": { "type": "number" },
                    "visibility": { "type": "number" },
                    "adventure_score": { "type": "number" },
                    "recommended_activity": { "type": "string" },
                    "insights": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": { "type": "string" },
                                "title": { "type": "string" },
                                "description": { "type": "string" },
                                "confidence": { "type": "number" }
                            }
                        }
                    }
                }
            }),
        }
    }

    /// Up to five real place names matching a partial query.
    pub fn location_search(query: &str) -> Self {
        Self {
            prompt: format!(
                "Find 5 real locations that match \"{}\". Include cities, states/provinces, and \
                 countries. Format as: City, State/Province, Country (if international). Return \
                 only location names, one per line.",
                query
            ),
            add_context_from_internet: true,
            response_json_schema: json!({
                "type": "object",
                "properties": {
                    "locations": {
                        "type": "array",
                        "items": { "type": "string" }
                    }
                }
            }),
        }
    }
}
