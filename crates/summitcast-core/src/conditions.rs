//! Today's conditions for the dashboard.
//!
//! Not cached: every call asks the completion service, and a fixed
//! placeholder is returned when that fails.

use serde_json::Value;
use tracing::{error, warn};

use crate::ai::{CompletionRequest, CompletionService};
use crate::models::raw::{number, text};
use crate::models::{CurrentConditions, Insight, WeatherCondition};

/// Where current conditions came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionsOutcome {
    Live(CurrentConditions),
    Fallback(CurrentConditions),
}

impl ConditionsOutcome {
    pub fn conditions(&self) -> &CurrentConditions {
        match self {
            ConditionsOutcome::Live(c) | ConditionsOutcome::Fallback(c) => c,
        }
    }

    pub fn into_conditions(self) -> CurrentConditions {
        match self {
            ConditionsOutcome::Live(c) | ConditionsOutcome::Fallback(c) => c,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ConditionsOutcome::Fallback(_))
    }
}

/// Fetch current conditions for `location`. Insights are a premium feature
/// and are dropped unless `include_insights` is set.
pub async fn current_conditions(
    service: &dyn CompletionService,
    location: &str,
    include_insights: bool,
) -> ConditionsOutcome {
    let parsed = match service
        .complete(CompletionRequest::current_conditions(location))
        .await
    {
        Ok(value) => parse_conditions(&value, location),
        Err(e) => {
            error!(location = %location, error = %e, "Current conditions request failed");
            None
        }
    };

    match parsed {
        Some(mut conditions) => {
            if !include_insights {
                conditions.insights.clear();
            }
            ConditionsOutcome::Live(conditions)
        }
        None => ConditionsOutcome::Fallback(fallback_conditions(location, include_insights)),
    }
}

/// A response without a temperature is unusable.
fn parse_conditions(value: &Value, requested: &str) -> Option<CurrentConditions> {
    let Some(obj) = value.as_object() else {
        warn!("Current conditions response is not an object");
        return None;
    };
    let Some(temperature) = number(obj, "temperature") else {
        warn!(location = %requested, "Current conditions response has no temperature");
        return None;
    };

    let insights = match obj.get("insights") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|item| {
                Some(Insight {
                    kind: text(item, "type").unwrap_or_else(|| "recommendation".to_string()),
                    title: text(item, "title")?,
                    description: text(item, "description").unwrap_or_default(),
                    confidence: percent(number(item, "confidence")).unwrap_or(0),
                })
            })
            .collect(),
        _ => Vec::new(),
    };

    Some(CurrentConditions {
        location: text(obj, "location").unwrap_or_else(|| requested.to_string()),
        temperature,
        condition: text(obj, "condition")
            .map(|c| WeatherCondition::parse(&c))
            .unwrap_or_else(|| WeatherCondition::Other(String::new())),
        wind_speed: number(obj, "wind_speed").unwrap_or_default().max(0.0),
        visibility: number(obj, "visibility").unwrap_or_default().max(0.0),
        adventure_score: percent(number(obj, "adventure_score")).unwrap_or(0),
        recommended_activity: text(obj, "recommended_activity").unwrap_or_default(),
        insights,
    })
}

fn percent(value: Option<f64>) -> Option<u8> {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
}

/// Mild sunny placeholder day.
pub fn fallback_conditions(location: &str, include_insights: bool) -> CurrentConditions {
    let insights = if include_insights {
        vec![Insight {
            kind: "recommendation".to_string(),
            title: "Perfect Hiking Weather".to_string(),
            description:
                "Clear skies and moderate temperatures make today ideal for hiking trails."
                    .to_string(),
            confidence: 92,
        }]
    } else {
        Vec::new()
    };

    CurrentConditions {
        location: location.to_string(),
        temperature: 22.0,
        condition: WeatherCondition::Sunny,
        wind_speed: 8.0,
        visibility: 15.0,
        adventure_score: 85,
        recommended_activity: "hiking".to_string(),
        insights,
    }
}
