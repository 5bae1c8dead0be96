use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

use super::conditions::CurrentConditions;
use super::forecast::ForecastDay;

/// Activities an alert can be created for.
pub const ALERT_ACTIVITIES: [&str; 8] = [
    "hiking",
    "snowboarding",
    "skiing",
    "camping",
    "climbing",
    "cycling",
    "photography",
    "surfing",
];

/// Condition names offered when editing an alert.
pub const ALERT_WEATHER_OPTIONS: [&str; 6] =
    ["sunny", "clear", "partly_cloudy", "cloudy", "rainy", "snowy"];

/// Thresholds an alert fires on. Unset bounds are not checked and an empty
/// `weather_conditions` list accepts any sky.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct AlertConditions {
    /// °C
    #[serde(default)]
    pub min_temp: Option<f64>,
    /// °C
    #[serde(default)]
    pub max_temp: Option<f64>,
    /// km/h
    #[serde(default)]
    pub max_wind_speed: Option<f64>,
    /// km
    #[serde(default)]
    pub min_visibility: Option<f64>,
    #[serde(default)]
    pub weather_conditions: Vec<String>,
}

impl Default for AlertConditions {
    fn default() -> Self {
        Self::bounds(10.0, 25.0, 20.0, 5.0, &["sunny", "clear"])
    }
}

impl AlertConditions {
    fn bounds(min_temp: f64, max_temp: f64, wind: f64, visibility: f64, skies: &[&str]) -> Self {
        Self {
            min_temp: Some(min_temp),
            max_temp: Some(max_temp),
            max_wind_speed: Some(wind),
            min_visibility: Some(visibility),
            weather_conditions: skies.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Starting thresholds for a one-step alert. Unknown activities get the
    /// hiking thresholds.
    pub fn for_activity(activity_type: &str) -> Self {
        match activity_type {
            "snowboarding" => Self::bounds(-10.0, 5.0, 25.0, 2.0, &["snowy", "clear"]),
            "skiing" => Self::bounds(-8.0, 3.0, 30.0, 3.0, &["snowy", "clear"]),
            _ => Self::bounds(10.0, 30.0, 20.0, 5.0, &["sunny", "clear", "partly_cloudy"]),
        }
    }

    fn temperature_ok(&self, celsius: f64) -> bool {
        self.min_temp.map_or(true, |min| celsius >= min)
            && self.max_temp.map_or(true, |max| celsius <= max)
    }

    fn wind_ok(&self, wind_speed: f64) -> bool {
        self.max_wind_speed.map_or(true, |max| wind_speed <= max)
    }

    fn sky_ok(&self, condition: &str) -> bool {
        self.weather_conditions.is_empty()
            || self.weather_conditions.iter().any(|c| c == condition)
    }

    /// Daytime check against a forecast day: the high must sit inside the
    /// temperature bounds. Forecast days carry no visibility, so
    /// `min_visibility` is not checked here.
    pub fn matches_day(&self, day: &ForecastDay) -> bool {
        self.temperature_ok(day.temperature_high)
            && self.wind_ok(day.wind_speed)
            && self.sky_ok(day.condition.as_str())
    }

    pub fn matches_now(&self, conditions: &CurrentConditions) -> bool {
        self.temperature_ok(conditions.temperature)
            && self.wind_ok(conditions.wind_speed)
            && self
                .min_visibility
                .map_or(true, |min| conditions.visibility >= min)
            && self.sky_ok(conditions.condition.as_str())
    }
}

/// A saved request to be told when an activity looks good somewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct WeatherAlert {
    pub id: String,
    pub location: String,
    pub activity_type: String,
    #[serde(default)]
    pub alert_conditions: AlertConditions,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub created_date: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl WeatherAlert {
    /// Days that satisfy the alert. Inactive alerts match nothing.
    pub fn matching_days<'a>(&self, days: &'a [ForecastDay]) -> Vec<&'a ForecastDay> {
        if !self.is_active {
            return Vec::new();
        }
        days.iter()
            .filter(|day| self.alert_conditions.matches_day(day))
            .collect()
    }
}

/// Editable fields of an alert, used for both create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDraft {
    pub location: String,
    pub activity_type: String,
    #[serde(default)]
    pub alert_conditions: AlertConditions,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl AlertDraft {
    /// Active alert with the activity's starting thresholds.
    pub fn quick(location: impl Into<String>, activity_type: impl Into<String>) -> Self {
        let activity_type = activity_type.into();
        Self {
            location: location.into(),
            alert_conditions: AlertConditions::for_activity(&activity_type),
            activity_type,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityScores, WeatherCondition};

    fn day(high: f64, wind: f64, condition: WeatherCondition) -> ForecastDay {
        ForecastDay {
            date: "2026-10-20".to_string(),
            temperature_high: high,
            temperature_low: high - 10.0,
            condition,
            wind_speed: wind,
            precipitation_chance: 10.0,
            activity_scores: ActivityScores::default(),
        }
    }

    #[test]
    fn test_activity_thresholds() {
        let hiking = AlertConditions::for_activity("hiking");
        assert_eq!(hiking.min_temp, Some(10.0));
        assert_eq!(hiking.max_temp, Some(30.0));
        assert!(hiking.weather_conditions.contains(&"partly_cloudy".to_string()));

        let skiing = AlertConditions::for_activity("skiing");
        assert_eq!(skiing.max_wind_speed, Some(30.0));
        assert_eq!(skiing.weather_conditions, vec!["snowy", "clear"]);

        assert_eq!(AlertConditions::for_activity("kayaking"), hiking);
    }

    #[test]
    fn test_matches_day() {
        let hiking = AlertConditions::for_activity("hiking");
        assert!(hiking.matches_day(&day(18.0, 12.0, WeatherCondition::Sunny)));
        assert!(hiking.matches_day(&day(10.0, 20.0, WeatherCondition::Clear)));
        assert!(!hiking.matches_day(&day(9.5, 12.0, WeatherCondition::Sunny)));
        assert!(!hiking.matches_day(&day(18.0, 21.0, WeatherCondition::Sunny)));
        assert!(!hiking.matches_day(&day(18.0, 12.0, WeatherCondition::Rainy)));
        assert!(hiking.matches_day(&day(
            18.0,
            12.0,
            WeatherCondition::Other("partly_cloudy".to_string())
        )));
    }

    #[test]
    fn test_unset_bounds_are_ignored() {
        let open = AlertConditions {
            min_temp: None,
            max_temp: None,
            max_wind_speed: None,
            min_visibility: None,
            weather_conditions: Vec::new(),
        };
        assert!(open.matches_day(&day(-40.0, 150.0, WeatherCondition::Snowy)));
    }

    #[test]
    fn test_matches_now_checks_visibility() {
        let skiing = AlertConditions::for_activity("skiing");
        let mut now = CurrentConditions {
            location: "Alta, UT".to_string(),
            temperature: -4.0,
            condition: WeatherCondition::Snowy,
            wind_speed: 15.0,
            visibility: 4.0,
            adventure_score: 80,
            recommended_activity: "skiing".to_string(),
            insights: Vec::new(),
        };
        assert!(skiing.matches_now(&now));
        now.visibility = 1.0;
        assert!(!skiing.matches_now(&now));
    }

    #[test]
    fn test_inactive_alert_matches_nothing() {
        let mut alert = WeatherAlert {
            id: "a1".to_string(),
            location: "Moab, UT".to_string(),
            activity_type: "hiking".to_string(),
            alert_conditions: AlertConditions::for_activity("hiking"),
            is_active: true,
            created_date: Utc::now(),
        };
        let days = vec![
            day(18.0, 5.0, WeatherCondition::Sunny),
            day(18.0, 5.0, WeatherCondition::Rainy),
        ];
        assert_eq!(alert.matching_days(&days).len(), 1);

        alert.is_active = false;
        assert!(alert.matching_days(&days).is_empty());
    }

    #[test]
    fn test_alert_json_uses_snake_case_and_fills_defaults() {
        let alert: WeatherAlert = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "location": "Moab, UT",
            "activity_type": "climbing",
            "created_date": "2026-10-19T09:30:00Z"
        }))
        .unwrap();
        assert!(alert.is_active);
        assert_eq!(alert.alert_conditions, AlertConditions::default());

        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["alert_conditions"]["max_wind_speed"], 20.0);
    }
}
