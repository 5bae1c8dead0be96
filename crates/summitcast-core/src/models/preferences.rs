use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// How often matched alerts are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum AlertFrequency {
    Immediately,
    #[default]
    Daily,
    Weekly,
}

/// Missing fields take their defaults, so older records keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(default)]
pub struct NotificationPreferences {
    pub email_alerts: bool,
    pub advance_notice_hours: u32,
    pub alert_frequency: AlertFrequency,
    /// "HH:MM"
    pub quiet_hours_start: String,
    /// "HH:MM"
    pub quiet_hours_end: String,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_alerts: true,
            advance_notice_hours: 24,
            alert_frequency: AlertFrequency::Daily,
            quiet_hours_start: "22:00".to_string(),
            quiet_hours_end: "07:00".to_string(),
        }
    }
}

/// Per-user choices that are not part of the local config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(default)]
pub struct UserPreferences {
    pub preferred_activities: Vec<String>,
    pub notification_preferences: NotificationPreferences,
}
