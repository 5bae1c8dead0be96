//! Checking saved alerts against forecasts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::forecast::{ForecastCache, ForecastOutcome};
use crate::models::WeatherAlert;

/// An active alert and the forecast dates that satisfy it.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMatch {
    pub alert: WeatherAlert,
    pub dates: Vec<String>,
}

/// Run every active alert against its location's forecast.
///
/// Each location is forecast once. Placeholder forecasts are skipped, since
/// random data must not fire an alert.
pub async fn check_alerts(
    cache: &ForecastCache,
    alerts: &[WeatherAlert],
    now: DateTime<Utc>,
) -> Vec<AlertMatch> {
    let mut forecasts: HashMap<&str, ForecastOutcome> = HashMap::new();
    let mut matches = Vec::new();

    for alert in alerts.iter().filter(|a| a.is_active) {
        let location = alert.location.as_str();
        if !forecasts.contains_key(location) {
            let outcome = cache.get_forecast(location, now).await;
            forecasts.insert(location, outcome);
        }
        let Some(outcome) = forecasts.get(location) else {
            continue;
        };

        if outcome.is_fallback() {
            warn!(id = %alert.id, location = %location, "No forecast available, skipping alert");
            continue;
        }

        let dates: Vec<String> = alert
            .matching_days(outcome.days())
            .into_iter()
            .map(|day| day.date.clone())
            .collect();
        debug!(id = %alert.id, matched = dates.len(), "Checked alert");
        if !dates.is_empty() {
            matches.push(AlertMatch {
                alert: alert.clone(),
                dates,
            });
        }
    }

    matches
}
