//! Keyed storage for fetched forecasts.
//!
//! A forecast is stored under a key derived from its location and is served
//! back while it is younger than two hours. Nothing is evicted; a stale entry
//! is overwritten by the next successful fetch.

pub mod entry;
pub mod store;

pub use entry::{cache_key_for, CacheEntry, FORECAST_TTL_MS};
pub use store::{FileStore, KeyValueStore, MemoryStore};
