//! Saved alerts and user preferences.
//!
//! Each collection is one JSON document in a [`KeyValueStore`], so the same
//! file store that holds forecasts can hold these under its own directory.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::KeyValueStore;
use crate::models::{AlertDraft, UserPreferences, WeatherAlert};

const ALERTS_KEY: &str = "entity_weather_alerts";
const PREFERENCES_KEY: &str = "entity_user_preferences";

#[derive(Error, Debug)]
pub enum EntityError {
    #[error("No alert with id {0}")]
    NotFound(String),

    #[error("Alert location is required")]
    MissingLocation,

    #[error("Alert activity is required")]
    MissingActivity,

    #[error("Corrupt {what} record: {source}")]
    Corrupt {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EntityError>;

/// Alert and preference records over a keyed store.
///
/// Writes are read-modify-write on a whole collection and are serialized by
/// an internal lock. Unlike the forecast cache, unreadable records are
/// reported rather than ignored, so a bad file is never silently replaced.
pub struct EntityStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl EntityStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// All alerts, newest first.
    pub fn list_alerts(&self) -> Result<Vec<WeatherAlert>> {
        let mut alerts: Vec<WeatherAlert> = self.read(ALERTS_KEY, "alert")?.unwrap_or_default();
        alerts.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(alerts)
    }

    pub fn get_alert(&self, id: &str) -> Result<WeatherAlert> {
        self.list_alerts()?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(|| EntityError::NotFound(id.to_string()))
    }

    pub fn create_alert(&self, draft: AlertDraft, now: DateTime<Utc>) -> Result<WeatherAlert> {
        let draft = validate(draft)?;
        let alert = WeatherAlert {
            id: Uuid::new_v4().to_string(),
            location: draft.location,
            activity_type: draft.activity_type,
            alert_conditions: draft.alert_conditions,
            is_active: draft.is_active,
            created_date: now,
        };

        self.modify_alerts(|alerts| {
            alerts.push(alert.clone());
            Ok(())
        })?;
        info!(id = %alert.id, location = %alert.location, activity = %alert.activity_type, "Created alert");
        Ok(alert)
    }

    /// Replace the editable fields of an alert. Id and creation time stay.
    pub fn update_alert(&self, id: &str, draft: AlertDraft) -> Result<WeatherAlert> {
        let draft = validate(draft)?;
        self.modify_alert(id, |alert| {
            alert.location = draft.location;
            alert.activity_type = draft.activity_type;
            alert.alert_conditions = draft.alert_conditions;
            alert.is_active = draft.is_active;
        })
    }

    pub fn set_alert_active(&self, id: &str, is_active: bool) -> Result<WeatherAlert> {
        self.modify_alert(id, |alert| alert.is_active = is_active)
    }

    pub fn toggle_alert(&self, id: &str) -> Result<WeatherAlert> {
        self.modify_alert(id, |alert| alert.is_active = !alert.is_active)
    }

    /// Saved preferences, or defaults if none were saved yet.
    pub fn preferences(&self) -> Result<UserPreferences> {
        Ok(self
            .read(PREFERENCES_KEY, "preferences")?
            .unwrap_or_default())
    }

    pub fn save_preferences(&self, preferences: &UserPreferences) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(PREFERENCES_KEY, preferences)
    }

    fn modify_alert(&self, id: &str, edit: impl FnOnce(&mut WeatherAlert)) -> Result<WeatherAlert> {
        let mut updated = None;
        self.modify_alerts(|alerts| {
            let alert = alerts
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| EntityError::NotFound(id.to_string()))?;
            edit(alert);
            updated = Some(alert.clone());
            Ok(())
        })?;
        updated.ok_or_else(|| EntityError::NotFound(id.to_string()))
    }

    fn modify_alerts(&self, edit: impl FnOnce(&mut Vec<WeatherAlert>) -> Result<()>) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut alerts: Vec<WeatherAlert> = self.read(ALERTS_KEY, "alert")?.unwrap_or_default();
        edit(&mut alerts)?;
        self.write(ALERTS_KEY, &alerts)
    }

    fn read<T: DeserializeOwned>(&self, key: &str, what: &'static str) -> Result<Option<T>> {
        match self.store.get(key).map_err(EntityError::Storage)? {
            Some(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(|source| EntityError::Corrupt { what, source }),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| EntityError::Storage(e.into()))?;
        self.store.set(key, &json).map_err(EntityError::Storage)?;
        debug!(key = key, bytes = json.len(), "Saved records");
        Ok(())
    }
}

fn validate(mut draft: AlertDraft) -> Result<AlertDraft> {
    draft.location = draft.location.trim().to_string();
    draft.activity_type = draft.activity_type.trim().to_lowercase();
    if draft.location.is_empty() {
        return Err(EntityError::MissingLocation);
    }
    if draft.activity_type.is_empty() {
        return Err(EntityError::MissingActivity);
    }
    Ok(draft)
}
