use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ForecastDay;

/// How long a fetched forecast is served from cache: 2 hours.
pub const FORECAST_TTL_MS: i64 = 2 * 60 * 60 * 1000;

/// Prefix shared by every forecast cache key.
const FORECAST_KEY_PREFIX: &str = "forecast_cache_";

/// Storage key for a location's forecast.
///
/// Every run of whitespace becomes a single `_`, so "New York" and
/// "New   York" share an entry. Case is preserved.
pub fn cache_key_for(location: &str) -> String {
    let mut key = String::with_capacity(FORECAST_KEY_PREFIX.len() + location.len());
    key.push_str(FORECAST_KEY_PREFIX);

    let mut in_whitespace = false;
    for c in location.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                key.push('_');
            }
            in_whitespace = true;
        } else {
            key.push(c);
            in_whitespace = false;
        }
    }
    key
}

/// A forecast as persisted in the keyed store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Epoch milliseconds at write time.
    pub timestamp: i64,
    pub data: Vec<ForecastDay>,
}

impl CacheEntry {
    pub fn new(data: Vec<ForecastDay>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.timestamp_millis(),
            data,
        }
    }

    /// Saturates, so a garbage timestamp reads as very old or very new
    /// instead of overflowing.
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis().saturating_sub(self.timestamp)
    }

    /// Fresh iff `now - timestamp < TTL`. An entry stamped in the future
    /// (clock skew) counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.age_ms(now) < FORECAST_TTL_MS
    }

    /// Entries written by `ForecastCache` always carry data and a timestamp
    /// no further ahead than clock skew explains. Anything else is corrupt.
    pub fn is_plausible(&self, now: DateTime<Utc>) -> bool {
        !self.data.is_empty() && self.age_ms(now) > -FORECAST_TTL_MS
    }

    pub fn age_display(&self, now: DateTime<Utc>) -> String {
        let minutes = self.age_ms(now) / 60_000;
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}
