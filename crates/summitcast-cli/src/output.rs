//! Plain-text rendering of forecasts and conditions.

use summitcast_core::config::TemperatureUnit;
use summitcast_core::models::{Activity, CurrentConditions, ForecastDay, WeatherAlert};

/// Width of the condition column.
const CONDITION_WIDTH: usize = 10;

pub fn forecast_line(day: &ForecastDay, unit: TemperatureUnit) -> String {
    let (best, best_score) = day.activity_scores.best();
    format!(
        "{}  {:<width$}  {:>4.0}{} / {:>4.0}{}  wind {:>3.0} km/h  precip {:>3.0}%  best: {} {}",
        day.date,
        truncate(day.condition.as_str(), CONDITION_WIDTH),
        unit.convert(day.temperature_high),
        unit.symbol(),
        unit.convert(day.temperature_low),
        unit.symbol(),
        day.wind_speed,
        day.precipitation_chance,
        best,
        best_score.score,
        width = CONDITION_WIDTH,
    )
}

/// Per-activity detail lines for one day.
pub fn activity_lines(day: &ForecastDay) -> Vec<String> {
    Activity::ALL
        .iter()
        .map(|activity| {
            let score = day.activity_scores.get(*activity);
            format!("    {:<13} {:>3}  {}", activity.key(), score.score, score.recommendation)
        })
        .collect()
}

pub fn conditions_lines(c: &CurrentConditions, unit: TemperatureUnit) -> Vec<String> {
    let mut lines = vec![
        c.location.clone(),
        format!(
            "  {:.0}{}, {}, wind {:.0} km/h, visibility {:.0} km",
            unit.convert(c.temperature),
            unit.symbol(),
            c.condition,
            c.wind_speed,
            c.visibility
        ),
        format!(
            "  Adventure score {} - try {}",
            c.adventure_score,
            if c.recommended_activity.is_empty() {
                "anything"
            } else {
                c.recommended_activity.as_str()
            }
        ),
    ];
    for insight in &c.insights {
        lines.push(format!(
            "  [{}] {} ({}%): {}",
            insight.kind, insight.title, insight.confidence, insight.description
        ));
    }
    lines
}

pub fn alert_line(alert: &WeatherAlert) -> String {
    let c = &alert.alert_conditions;
    let mut limits = Vec::new();
    match (c.min_temp, c.max_temp) {
        (Some(min), Some(max)) => limits.push(format!("{}..{}°C", min, max)),
        (Some(min), None) => limits.push(format!(">={}°C", min)),
        (None, Some(max)) => limits.push(format!("<={}°C", max)),
        (None, None) => {}
    }
    if let Some(wind) = c.max_wind_speed {
        limits.push(format!("wind <={} km/h", wind));
    }
    if !c.weather_conditions.is_empty() {
        limits.push(c.weather_conditions.join("/"));
    }

    format!(
        "[{}] {} {} in {} ({})",
        if alert.is_active { "on" } else { "off" },
        alert.id,
        alert.activity_type,
        alert.location,
        limits.join(", ")
    )
}

/// Truncate a string to a maximum length, adding ellipsis if needed
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
