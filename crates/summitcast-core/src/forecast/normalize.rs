//! Raw completion output to canonical forecast days.

use tracing::{debug, warn};

use crate::models::{
    Activity, ActivityScore, ActivityScores, ForecastDay, RawForecastDay, RawForecastResponse,
    WeatherCondition,
};

/// Normalize every usable day of a response, keeping upstream order.
pub fn normalize(response: &RawForecastResponse) -> Vec<ForecastDay> {
    response.days.iter().filter_map(normalize_day).collect()
}

/// A day without a date cannot be placed in the sequence and is dropped.
pub fn normalize_day(raw: &RawForecastDay) -> Option<ForecastDay> {
    let Some(date) = raw.date.clone() else {
        warn!("Dropping forecast day without a date");
        return None;
    };

    let temperature_high = raw.temp_high.unwrap_or_default();
    let temperature_low = raw.temp_low.unwrap_or_default();
    if temperature_high < temperature_low {
        debug!(date = %date, temperature_high, temperature_low, "High below low in upstream data");
    }

    Some(ForecastDay {
        date,
        temperature_high,
        temperature_low,
        condition: raw
            .condition
            .as_deref()
            .map(WeatherCondition::parse)
            .unwrap_or_else(|| WeatherCondition::Other(String::new())),
        wind_speed: raw.wind_speed.unwrap_or_default().max(0.0),
        precipitation_chance: raw.precipitation.unwrap_or_default().clamp(0.0, 100.0),
        activity_scores: ActivityScores {
            hiking: activity_score(Activity::Hiking, raw.hiking_score, &raw.hiking_note),
            snowboarding: activity_score(
                Activity::Snowboarding,
                raw.snowboard_score,
                &raw.snowboard_note,
            ),
            skiing: activity_score(Activity::Skiing, raw.ski_score, &raw.ski_note),
        },
    })
}

/// Missing values take the activity's default; an explicit 0 is kept.
fn activity_score(activity: Activity, score: Option<f64>, note: &Option<String>) -> ActivityScore {
    let score = score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or_else(|| activity.default_score());
    let recommendation = note
        .clone()
        .unwrap_or_else(|| activity.default_recommendation().to_string());
    ActivityScore::new(score, recommendation)
}

impl ForecastDay {
    /// Re-derive the upstream shape.
    pub fn to_raw(&self) -> RawForecastDay {
        let scores = &self.activity_scores;
        RawForecastDay {
            date: Some(self.date.clone()),
            temp_high: Some(self.temperature_high),
            temp_low: Some(self.temperature_low),
            condition: Some(self.condition.as_str().to_string()),
            wind_speed: Some(self.wind_speed),
            precipitation: Some(self.precipitation_chance),
            hiking_score: Some(f64::from(scores.hiking.score)),
            hiking_note: Some(scores.hiking.recommendation.clone()),
            snowboard_score: Some(f64::from(scores.snowboarding.score)),
            snowboard_note: Some(scores.snowboarding.recommendation.clone()),
            ski_score: Some(f64::from(scores.skiing.score)),
            ski_note: Some(scores.skiing.recommendation.clone()),
        }
    }
}
