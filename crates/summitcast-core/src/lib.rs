//! Summitcast core library.
//!
//! Adventure-activity forecasts backed by a language-model completion
//! service, with a two-hour per-location cache and placeholder data when the
//! service is unavailable.
//!
//! - `forecast`: `ForecastCache`, normalization and fallback generation
//! - `cache`: keyed stores and the persisted `CacheEntry`
//! - `ai`: the `CompletionService` port and its HTTP adapter
//! - `conditions`, `locations`: current conditions and location search
//! - `entities`, `alerts`: saved alerts and preferences, and alert checks
//! - `models`: canonical and raw data shapes
//! - `config`, `auth`: configuration and API key storage

pub mod ai;
pub mod alerts;
pub mod auth;
pub mod cache;
pub mod conditions;
pub mod config;
pub mod entities;
pub mod forecast;
pub mod locations;
pub mod models;

pub use alerts::{check_alerts, AlertMatch};
pub use ai::{CompletionError, CompletionRequest, CompletionService, HttpCompletionClient};
pub use cache::{cache_key_for, CacheEntry, FileStore, KeyValueStore, MemoryStore, FORECAST_TTL_MS};
pub use conditions::{current_conditions, ConditionsOutcome};
pub use config::Config;
pub use entities::{EntityError, EntityStore};
pub use forecast::{ForecastCache, ForecastOutcome};
pub use locations::suggest_locations;
