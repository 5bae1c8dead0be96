//! Seven-day adventure forecasts.
//!
//! `ForecastCache` decides between a cached forecast and a fresh completion,
//! `normalize` turns the completion's raw days into `ForecastDay`s, and
//! `fallback_forecast` builds placeholder days when the service is down.

pub mod fallback;
pub mod manager;
pub mod normalize;

pub use fallback::{fallback_forecast, FALLBACK_DAYS};
pub use manager::{ForecastCache, ForecastOutcome};
pub use normalize::{normalize, normalize_day};
