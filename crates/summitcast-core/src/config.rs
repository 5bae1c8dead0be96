//! Application configuration management.
//!
//! Holds the user's default location, the completion service endpoint and
//! display preferences. Stored at `~/.config/summitcast/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "summitcast";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Location used until the user picks one.
pub const DEFAULT_LOCATION: &str = "Mountain View, CA";

/// Overrides `ai_endpoint`.
pub const ENDPOINT_ENV: &str = "SUMMITCAST_AI_URL";

/// API key for the completion service; takes precedence over the keychain.
pub const API_KEY_ENV: &str = "SUMMITCAST_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius reading into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub default_location: Option<String>,
    pub ai_endpoint: Option<String>,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    /// Premium tier: include AI insights with current conditions.
    #[serde(default)]
    pub insights_enabled: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Saved alerts and preferences live here, apart from the disposable
    /// forecast cache.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// The saved default location, or `DEFAULT_LOCATION`.
    pub fn preferred_location(&self) -> String {
        self.default_location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string()
    }

    /// Environment variable first, then the saved endpoint.
    pub fn endpoint(&self) -> Option<String> {
        std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| self.ai_endpoint.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_location_defaults() {
        let mut config = Config::default();
        assert_eq!(config.preferred_location(), "Mountain View, CA");

        config.default_location = Some("   ".to_string());
        assert_eq!(config.preferred_location(), "Mountain View, CA");

        config.default_location = Some("Chamonix, France".to_string());
        assert_eq!(config.preferred_location(), "Chamonix, France");
    }

    #[test]
    fn test_config_parses_partial_file() {
        let config: Config = serde_json::from_str(r#"{"default_location": "Bend, OR"}"#).unwrap();
        assert_eq!(config.default_location.as_deref(), Some("Bend, OR"));
        assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
        assert!(!config.insights_enabled);
        assert!(config.ai_endpoint.is_none());
    }

    #[test]
    fn test_temperature_unit_conversion() {
        assert_eq!(TemperatureUnit::Celsius.convert(21.0), 21.0);
        assert_eq!(TemperatureUnit::Fahrenheit.convert(100.0), 212.0);
        let unit: TemperatureUnit = serde_json::from_str("\"fahrenheit\"").unwrap();
        assert_eq!(unit.symbol(), "°F");
    }
}
