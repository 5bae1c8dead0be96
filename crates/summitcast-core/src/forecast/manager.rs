use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use crate::ai::{CompletionRequest, CompletionService};
use crate::cache::{cache_key_for, CacheEntry, KeyValueStore};
use crate::models::{ForecastDay, RawForecastResponse};

use super::fallback::fallback_forecast;
use super::normalize::normalize;

/// Where a forecast came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    /// Served from a fresh cache entry, no upstream call.
    Hit(Vec<ForecastDay>),
    /// Fetched from the completion service and written to the cache.
    Fetched(Vec<ForecastDay>),
    /// Placeholder data; the service failed or returned nothing usable.
    Fallback(Vec<ForecastDay>),
}

impl ForecastOutcome {
    pub fn days(&self) -> &[ForecastDay] {
        match self {
            ForecastOutcome::Hit(days)
            | ForecastOutcome::Fetched(days)
            | ForecastOutcome::Fallback(days) => days,
        }
    }

    pub fn into_days(self) -> Vec<ForecastDay> {
        match self {
            ForecastOutcome::Hit(days)
            | ForecastOutcome::Fetched(days)
            | ForecastOutcome::Fallback(days) => days,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ForecastOutcome::Fallback(_))
    }

    pub fn source(&self) -> &'static str {
        match self {
            ForecastOutcome::Hit(_) => "cache",
            ForecastOutcome::Fetched(_) => "live",
            ForecastOutcome::Fallback(_) => "placeholder",
        }
    }
}

type InFlight = Shared<BoxFuture<'static, ForecastOutcome>>;

/// Per-location forecast cache in front of the completion service.
///
/// Callers always get a well-formed forecast back: upstream failures and
/// unreadable cache entries are logged and absorbed. Concurrent misses for
/// the same location share a single upstream call.
///
/// Clone is cheap and clones share the store, the random source and the
/// in-flight table.
#[derive(Clone)]
pub struct ForecastCache {
    store: Arc<dyn KeyValueStore>,
    service: Arc<dyn CompletionService>,
    rng: Arc<Mutex<StdRng>>,
    in_flight: Arc<Mutex<HashMap<String, InFlight>>>,
}

impl ForecastCache {
    pub fn new(store: Arc<dyn KeyValueStore>, service: Arc<dyn CompletionService>) -> Self {
        Self {
            store,
            service,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Replace the random source used for placeholder forecasts.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Arc::new(Mutex::new(rng));
        self
    }

    /// Forecast for `location` as of the wall clock.
    pub async fn forecast(&self, location: &str) -> ForecastOutcome {
        self.get_forecast(location, Utc::now()).await
    }

    /// Forecast for `location` as of `now`.
    pub async fn get_forecast(&self, location: &str, now: DateTime<Utc>) -> ForecastOutcome {
        if location.trim().is_empty() {
            warn!("Forecast requested for an empty location, using placeholder data");
            return ForecastOutcome::Fallback(self.fallback(now));
        }

        let key = cache_key_for(location);
        if let Some(entry) = self.load_entry(&key, now) {
            if entry.is_fresh(now) {
                debug!(location = %location, age_ms = entry.age_ms(now), "Forecast served from cache");
                return ForecastOutcome::Hit(entry.data);
            }
            debug!(location = %location, age_ms = entry.age_ms(now), "Cached forecast is stale");
        }

        self.fetch_shared(location, key, now).await
    }

    /// How long ago the cached forecast for `location` was fetched, if any.
    pub fn cache_age(&self, location: &str, now: DateTime<Utc>) -> Option<String> {
        self.load_entry(&cache_key_for(location), now)
            .map(|entry| entry.age_display(now))
    }

    /// Storage errors, unparseable blobs and implausible entries count as a
    /// miss.
    fn load_entry(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        match self.store.get(key) {
            Ok(Some(contents)) => match serde_json::from_str::<CacheEntry>(&contents) {
                Ok(entry) if entry.is_plausible(now) => Some(entry),
                Ok(entry) => {
                    warn!(
                        key = key,
                        timestamp = entry.timestamp,
                        days = entry.data.len(),
                        "Ignoring implausible cached forecast, refetching"
                    );
                    None
                }
                Err(e) => {
                    warn!(key = key, error = %e, "Failed to parse cached forecast, refetching");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read cached forecast, refetching");
                None
            }
        }
    }

    fn save_entry(&self, key: &str, days: &[ForecastDay], now: DateTime<Utc>) {
        let entry = CacheEntry::new(days.to_vec(), now);
        let result = serde_json::to_string(&entry)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(key, &json));
        if let Err(e) = result {
            warn!(key = key, error = %e, "Failed to write forecast to cache");
        }
    }

    /// Join the in-flight fetch for `key`, or start one.
    async fn fetch_shared(&self, location: &str, key: String, now: DateTime<Utc>) -> ForecastOutcome {
        let fetch = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match in_flight.get(&key) {
                Some(existing) => {
                    debug!(key = %key, "Joining in-flight forecast fetch");
                    existing.clone()
                }
                None => {
                    let this = self.clone();
                    let location = location.to_string();
                    let slot = key.clone();
                    let fetch = async move {
                        let outcome = this.fetch_fresh(&location, &slot, now).await;
                        this.release(&slot);
                        outcome
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(key, fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }

    fn release(&self, key: &str) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    async fn fetch_fresh(&self, location: &str, key: &str, now: DateTime<Utc>) -> ForecastOutcome {
        info!(location = %location, "Fetching fresh forecast");

        let value = match self.service.complete(CompletionRequest::forecast(location)).await {
            Ok(value) => value,
            Err(e) => {
                error!(location = %location, error = %e, "Forecast request failed, using placeholder data");
                return ForecastOutcome::Fallback(self.fallback(now));
            }
        };

        let days = normalize(&RawForecastResponse::from_value(&value));
        if days.is_empty() {
            warn!(location = %location, "Forecast response had no usable days, using placeholder data");
            return ForecastOutcome::Fallback(self.fallback(now));
        }

        self.save_entry(key, &days, now);
        ForecastOutcome::Fetched(days)
    }

    /// Never written to the store.
    fn fallback(&self, now: DateTime<Utc>) -> Vec<ForecastDay> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        fallback_forecast(now.date_naive(), &mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use serde_json::{json, Value};

    use crate::ai::CompletionError;
    use crate::cache::{MemoryStore, FORECAST_TTL_MS};
    use crate::models::WeatherCondition;

    /// Answers every request with a clone of `response`, counting calls.
    struct ScriptedService {
        response: Option<Value>,
        delay: Option<StdDuration>,
        calls: AtomicUsize,
    }

    impl ScriptedService {
        fn ok(response: Value) -> Arc<Self> {
            Arc::new(Self {
                response: Some(response),
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: None,
                delay: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(response: Value, delay: StdDuration) -> Arc<Self> {
            Arc::new(Self {
                response: Some(response),
                delay: Some(delay),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedService {
        async fn complete(&self, _request: CompletionRequest) -> Result<Value, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response
                .clone()
                .ok_or_else(|| CompletionError::ServerError("scripted failure".to_string()))
        }
    }

    /// Store whose reads always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    fn week() -> Value {
        let days: Vec<Value> = (19..26)
            .map(|d| {
                json!({
                    "date": format!("2026-10-{}", d),
                    "temp_high": 15,
                    "temp_low": 3,
                    "condition": "clear",
                    "wind_speed": 10,
                    "precipitation": 20,
                    "hiking_score": 80,
                    "hiking_note": "Crisp and clear"
                })
            })
            .collect();
        json!({ "location": "Denver, CO", "days": days })
    }

    fn cache_with(store: Arc<MemoryStore>, service: Arc<ScriptedService>) -> ForecastCache {
        ForecastCache::new(store, service).with_rng(StdRng::seed_from_u64(3))
    }

    #[tokio::test]
    async fn test_miss_fetches_normalizes_and_stores() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::ok(week());
        let cache = cache_with(store.clone(), service.clone());

        let outcome = cache.get_forecast("Denver, CO", t0()).await;
        assert!(matches!(outcome, ForecastOutcome::Fetched(_)));
        assert_eq!(outcome.days().len(), 7);
        assert_eq!(outcome.days()[0].condition, WeatherCondition::Clear);
        assert_eq!(outcome.days()[0].activity_scores.hiking.score, 80);
        assert_eq!(outcome.days()[0].activity_scores.skiing.score, 35);
        assert_eq!(service.calls(), 1);

        let stored = store.get("forecast_cache_Denver,_CO").unwrap().unwrap();
        let entry: CacheEntry = serde_json::from_str(&stored).unwrap();
        assert_eq!(entry.timestamp, t0().timestamp_millis());
        assert_eq!(entry.data, outcome.into_days());
    }

    #[tokio::test]
    async fn test_hit_within_ttl_skips_service() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::ok(week());
        let cache = cache_with(store, service.clone());

        let first = cache.get_forecast("Denver, CO", t0()).await;
        let second = cache
            .get_forecast("Denver, CO", t0() + Duration::milliseconds(FORECAST_TTL_MS - 1))
            .await;

        assert!(matches!(second, ForecastOutcome::Hit(_)));
        assert_eq!(first.days(), second.days());
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_fetch() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::ok(week());
        let cache = cache_with(store, service.clone());

        cache.get_forecast("Denver, CO", t0()).await;
        let later = cache
            .get_forecast("Denver, CO", t0() + Duration::milliseconds(FORECAST_TTL_MS))
            .await;

        assert!(matches!(later, ForecastOutcome::Fetched(_)));
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_whitespace_variants_share_entry() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::ok(week());
        let cache = cache_with(store, service.clone());

        cache.get_forecast("New York", t0()).await;
        let again = cache.get_forecast("New   York", t0()).await;
        assert!(matches!(again, ForecastOutcome::Hit(_)));

        let shouted = cache.get_forecast("NEW YORK", t0()).await;
        assert!(matches!(shouted, ForecastOutcome::Fetched(_)));
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_returns_uncached_fallback() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::failing();
        let cache = cache_with(store.clone(), service.clone());

        let first = cache.get_forecast("Denver, CO", t0()).await;
        assert!(first.is_fallback());
        assert_eq!(first.days().len(), 7);
        assert_eq!(first.days()[0].date, "2026-10-19");
        assert_eq!(first.days()[6].date, "2026-10-25");
        for day in first.days() {
            let scores = &day.activity_scores;
            assert!((60..100).contains(&scores.hiking.score));
            assert!((30..100).contains(&scores.snowboarding.score));
            assert!((40..100).contains(&scores.skiing.score));
        }
        assert!(store.is_empty());

        let second = cache.get_forecast("Denver, CO", t0()).await;
        assert!(second.is_fallback());
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_days_is_treated_as_failure() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::ok(json!({ "location": "Denver, CO", "days": [] }));
        let cache = cache_with(store.clone(), service);

        let outcome = cache.get_forecast("Denver, CO", t0()).await;
        assert!(outcome.is_fallback());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_days_is_treated_as_failure() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::ok(json!({ "location": "Denver, CO" }));
        let cache = cache_with(store.clone(), service);

        assert!(cache.get_forecast("Denver, CO", t0()).await.is_fallback());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set("forecast_cache_Denver,_CO", "{not json").unwrap();
        let service = ScriptedService::ok(week());
        let cache = cache_with(store.clone(), service.clone());

        let outcome = cache.get_forecast("Denver, CO", t0()).await;
        assert!(matches!(outcome, ForecastOutcome::Fetched(_)));
        assert_eq!(service.calls(), 1);

        let repaired = store.get("forecast_cache_Denver,_CO").unwrap().unwrap();
        assert!(serde_json::from_str::<CacheEntry>(&repaired).is_ok());
    }

    #[tokio::test]
    async fn test_extreme_timestamps_are_a_miss() {
        for timestamp in [i64::MIN, i64::MAX] {
            let store = Arc::new(MemoryStore::new());
            let blob = json!({
                "timestamp": timestamp,
                "data": serde_json::to_value(fallback_forecast(
                    t0().date_naive(),
                    &mut StdRng::seed_from_u64(9)
                ))
                .unwrap()
            });
            store.set("forecast_cache_Denver", &blob.to_string()).unwrap();
            let service = ScriptedService::ok(week());
            let cache = cache_with(store.clone(), service.clone());

            let outcome = cache.get_forecast("Denver", t0()).await;
            assert!(matches!(outcome, ForecastOutcome::Fetched(_)), "timestamp {}", timestamp);
            assert_eq!(service.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_entry_without_days_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        let blob = json!({ "timestamp": t0().timestamp_millis(), "data": [] });
        store.set("forecast_cache_Denver", &blob.to_string()).unwrap();
        let service = ScriptedService::ok(week());
        let cache = cache_with(store, service.clone());

        let outcome = cache.get_forecast("Denver", t0()).await;
        assert!(matches!(outcome, ForecastOutcome::Fetched(_)));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_finite_values_still_cache() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::ok(json!({
            "days": [{ "date": "2026-10-19", "temp_high": "NaN", "precipitation": "nan" }]
        }));
        let cache = cache_with(store.clone(), service.clone());

        let first = cache.get_forecast("Denver", t0()).await;
        assert!(matches!(first, ForecastOutcome::Fetched(_)));
        assert_eq!(first.days()[0].temperature_high, 0.0);
        assert_eq!(first.days()[0].precipitation_chance, 0.0);

        let second = cache.get_forecast("Denver", t0()).await;
        assert!(matches!(second, ForecastOutcome::Hit(_)));
        assert_eq!(first.days(), second.days());
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_store_errors_fail_open() {
        let service = ScriptedService::ok(week());
        let cache = ForecastCache::new(Arc::new(BrokenStore), service.clone());

        let outcome = cache.get_forecast("Denver, CO", t0()).await;
        assert!(matches!(outcome, ForecastOutcome::Fetched(_)));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_location_skips_service() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::ok(week());
        let cache = cache_with(store, service.clone());

        let outcome = cache.get_forecast("   ", t0()).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.days().len(), 7);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::slow(week(), StdDuration::from_millis(50));
        let cache = cache_with(store, service.clone());

        let (a, b) = tokio::join!(
            cache.get_forecast("Denver, CO", t0()),
            cache.get_forecast("Denver, CO", t0()),
        );

        assert_eq!(service.calls(), 1);
        assert_eq!(a, b);
        assert!(matches!(a, ForecastOutcome::Fetched(_)));
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_misses_for_different_locations_fetch_separately() {
        let store = Arc::new(MemoryStore::new());
        let service = ScriptedService::slow(week(), StdDuration::from_millis(20));
        let cache = cache_with(store, service.clone());

        tokio::join!(
            cache.get_forecast("Denver, CO", t0()),
            cache.get_forecast("Boulder, CO", t0()),
        );
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn test_cache_age() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store, ScriptedService::ok(week()));

        assert!(cache.cache_age("Denver, CO", t0()).is_none());
        cache.get_forecast("Denver, CO", t0()).await;
        assert_eq!(
            cache.cache_age("Denver, CO", t0() + Duration::minutes(12)).as_deref(),
            Some("12m ago")
        );
    }
}
