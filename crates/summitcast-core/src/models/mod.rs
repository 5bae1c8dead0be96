//! Data models for adventure forecasts.
//!
//! - `ForecastDay`, `ActivityScores`: the canonical per-day forecast handed to
//!   callers and stored in the cache
//! - `RawForecastResponse`, `RawForecastDay`: the shape requested from the
//!   completion service, parsed leniently
//! - `CurrentConditions`, `Insight`: dashboard conditions for today
//! - `WeatherAlert`, `AlertConditions`: saved activity alerts
//! - `UserPreferences`: preferred activities and notification settings

pub mod alert;
pub mod conditions;
pub mod forecast;
pub mod preferences;
pub mod raw;

pub use alert::{
    AlertConditions, AlertDraft, WeatherAlert, ALERT_ACTIVITIES, ALERT_WEATHER_OPTIONS,
};
pub use conditions::{CurrentConditions, Insight};
pub use forecast::{Activity, ActivityScore, ActivityScores, ForecastDay, WeatherCondition};
pub use preferences::{AlertFrequency, NotificationPreferences, UserPreferences};
pub use raw::{RawForecastDay, RawForecastResponse};
