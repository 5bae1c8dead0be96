//! Placeholder forecast used when the completion service is unavailable.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::models::{ActivityScore, ActivityScores, ForecastDay, WeatherCondition};

/// Number of days in a placeholder forecast.
pub const FALLBACK_DAYS: usize = 7;

const FALLBACK_CONDITIONS: [WeatherCondition; 3] = [
    WeatherCondition::Sunny,
    WeatherCondition::Cloudy,
    WeatherCondition::Rainy,
];

/// Seven consecutive days starting at `start` with bounded random values:
/// high in [20,30), low in [10,18), wind in [5,20), precipitation in [0,100),
/// hiking in [60,100), snowboarding in [30,100), skiing in [40,100).
pub fn fallback_forecast<R: Rng>(start: NaiveDate, rng: &mut R) -> Vec<ForecastDay> {
    (0..FALLBACK_DAYS)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            ForecastDay {
                date: date.format("%Y-%m-%d").to_string(),
                temperature_high: f64::from(rng.gen_range(20u8..30)),
                temperature_low: f64::from(rng.gen_range(10u8..18)),
                condition: FALLBACK_CONDITIONS[rng.gen_range(0..FALLBACK_CONDITIONS.len())].clone(),
                wind_speed: f64::from(rng.gen_range(5u8..20)),
                precipitation_chance: f64::from(rng.gen_range(0u8..100)),
                activity_scores: ActivityScores {
                    hiking: ActivityScore::new(rng.gen_range(60..100), "Good conditions"),
                    snowboarding: ActivityScore::new(
                        rng.gen_range(30..100),
                        "Check snow conditions",
                    ),
                    skiing: ActivityScore::new(rng.gen_range(40..100), "Moderate conditions"),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fallback_shape_and_bounds() {
        let start = NaiveDate::from_ymd_opt(2026, 12, 28).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let days = fallback_forecast(start, &mut rng);
            assert_eq!(days.len(), FALLBACK_DAYS);

            for (i, day) in days.iter().enumerate() {
                let expected = start + Duration::days(i as i64);
                assert_eq!(day.date, expected.format("%Y-%m-%d").to_string());
                assert!((20.0..30.0).contains(&day.temperature_high));
                assert!((10.0..18.0).contains(&day.temperature_low));
                assert!(FALLBACK_CONDITIONS.contains(&day.condition));
                assert!((5.0..20.0).contains(&day.wind_speed));
                assert!((0.0..100.0).contains(&day.precipitation_chance));
                assert!((60..100).contains(&day.activity_scores.hiking.score));
                assert!((30..100).contains(&day.activity_scores.snowboarding.score));
                assert!((40..100).contains(&day.activity_scores.skiing.score));
            }
        }
    }

    #[test]
    fn test_fallback_crosses_year_boundary() {
        let start = NaiveDate::from_ymd_opt(2026, 12, 30).unwrap();
        let days = fallback_forecast(start, &mut StdRng::seed_from_u64(1));
        assert_eq!(days[0].date, "2026-12-30");
        assert_eq!(days[2].date, "2027-01-01");
    }

    #[test]
    fn test_fallback_is_deterministic_for_seed() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let a = fallback_forecast(start, &mut StdRng::seed_from_u64(42));
        let b = fallback_forecast(start, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
