use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// Sky condition reported for a forecast day.
///
/// Only the exact lowercase names map to a known variant; anything else,
/// including "Sunny" or " clear ", is kept verbatim so it can be written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Clear,
    Overcast,
    Other(String),
}

impl WeatherCondition {
    pub fn parse(s: &str) -> Self {
        match s {
            "sunny" => WeatherCondition::Sunny,
            "cloudy" => WeatherCondition::Cloudy,
            "rainy" => WeatherCondition::Rainy,
            "snowy" => WeatherCondition::Snowy,
            "clear" => WeatherCondition::Clear,
            "overcast" => WeatherCondition::Overcast,
            _ => WeatherCondition::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Snowy => "snowy",
            WeatherCondition::Clear => "clear",
            WeatherCondition::Overcast => "overcast",
            WeatherCondition::Other(s) => s,
        }
    }
}

impl From<String> for WeatherCondition {
    fn from(s: String) -> Self {
        WeatherCondition::parse(&s)
    }
}

impl From<WeatherCondition> for String {
    fn from(c: WeatherCondition) -> Self {
        c.as_str().to_string()
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outdoor activities rated for every forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity {
    Hiking,
    Snowboarding,
    Skiing,
}

impl Activity {
    pub const ALL: [Activity; 3] = [Activity::Hiking, Activity::Snowboarding, Activity::Skiing];

    /// Key used in the serialized `activityScores` map.
    pub fn key(&self) -> &'static str {
        match self {
            Activity::Hiking => "hiking",
            Activity::Snowboarding => "snowboarding",
            Activity::Skiing => "skiing",
        }
    }

    /// Score used when the upstream service leaves this activity unrated.
    pub fn default_score(&self) -> u8 {
        match self {
            Activity::Hiking => 50,
            Activity::Snowboarding => 30,
            Activity::Skiing => 35,
        }
    }

    pub fn default_recommendation(&self) -> &'static str {
        match self {
            Activity::Hiking => "Check conditions",
            Activity::Snowboarding | Activity::Skiing => "Check snow conditions",
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct ActivityScore {
    pub score: u8,
    pub recommendation: String,
}

impl ActivityScore {
    pub fn new(score: u8, recommendation: impl Into<String>) -> Self {
        Self {
            score: score.min(100),
            recommendation: recommendation.into(),
        }
    }

    pub fn default_for(activity: Activity) -> Self {
        Self::new(activity.default_score(), activity.default_recommendation())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct ActivityScores {
    pub hiking: ActivityScore,
    pub snowboarding: ActivityScore,
    pub skiing: ActivityScore,
}

impl ActivityScores {
    pub fn get(&self, activity: Activity) -> &ActivityScore {
        match activity {
            Activity::Hiking => &self.hiking,
            Activity::Snowboarding => &self.snowboarding,
            Activity::Skiing => &self.skiing,
        }
    }

    /// Highest-rated activity; ties go to the earlier entry in `Activity::ALL`.
    pub fn best(&self) -> (Activity, &ActivityScore) {
        let mut best = (Activity::Hiking, &self.hiking);
        for activity in Activity::ALL {
            let score = self.get(activity);
            if score.score > best.1.score {
                best = (activity, score);
            }
        }
        best
    }
}

impl Default for ActivityScores {
    fn default() -> Self {
        Self {
            hiking: ActivityScore::default_for(Activity::Hiking),
            snowboarding: ActivityScore::default_for(Activity::Snowboarding),
            skiing: ActivityScore::default_for(Activity::Skiing),
        }
    }
}

/// One day of the canonical adventure forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// ISO `YYYY-MM-DD`
    pub date: String,
    pub temperature_high: f64,
    pub temperature_low: f64,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub condition: WeatherCondition,
    /// km/h
    pub wind_speed: f64,
    /// Percent, 0-100
    pub precipitation_chance: f64,
    pub activity_scores: ActivityScores,
}

impl ForecastDay {
    pub fn display_temperatures(&self) -> String {
        format!("{:.0}° / {:.0}°", self.temperature_high, self.temperature_low)
    }
}
