//! Mock weather for project sites. Values are random within fixed plausible
//! ranges; no external weather provider is called.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;

const FORECAST_DAYS: i64 = 7;
const CONDITIONS: [&str; 4] = ["sunny", "partly_cloudy", "cloudy", "rainy"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: WeatherLocation,
    pub timestamp: DateTime<Utc>,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// °C
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    /// m/s
    pub wind_speed: f64,
    /// degrees
    pub wind_direction: f64,
    /// mm
    pub precipitation: f64,
    /// km
    pub visibility: f64,
    pub uv_index: f64,
    /// %
    pub cloud_cover: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    pub temp_high: f64,
    pub temp_low: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub wind_speed: f64,
    pub conditions: String,
}

/// Uniform draw in `[base, base + span)`.
fn around<R: Rng + ?Sized>(rng: &mut R, base: f64, span: f64) -> f64 {
    base + rng.random::<f64>() * span
}

/// Build a mock report for a coordinate at `now`.
pub fn mock_report<R: Rng + ?Sized>(
    latitude: f64,
    longitude: f64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> WeatherReport {
    let current = CurrentConditions {
        temperature: around(rng, 24.0, 10.0),
        humidity: around(rng, 60.0, 30.0),
        pressure: around(rng, 1013.0, 20.0),
        wind_speed: around(rng, 0.0, 15.0),
        wind_direction: around(rng, 0.0, 360.0),
        precipitation: around(rng, 0.0, 5.0),
        visibility: around(rng, 10.0, 15.0),
        uv_index: around(rng, 0.0, 11.0),
        cloud_cover: around(rng, 0.0, 100.0),
    };

    let daily = (0..FORECAST_DAYS)
        .map(|i| DailyForecast {
            date: (now + Duration::days(i)).format("%Y-%m-%d").to_string(),
            temp_high: around(rng, 28.0, 8.0),
            temp_low: around(rng, 20.0, 5.0),
            humidity: around(rng, 65.0, 25.0),
            precipitation: around(rng, 0.0, 10.0),
            wind_speed: around(rng, 0.0, 12.0),
            conditions: CONDITIONS[rng.random_range(0..CONDITIONS.len())].to_string(),
        })
        .collect();

    WeatherReport {
        location: WeatherLocation {
            latitude,
            longitude,
            name: "Project Location".to_string(),
        },
        timestamp: now,
        current,
        forecast: Forecast { daily },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn seven_consecutive_days_from_today() {
        let now = Utc.with_ymd_and_hms(2024, 2, 27, 18, 0, 0).unwrap();
        let report = mock_report(12.9, 80.2, now, &mut StdRng::seed_from_u64(3));
        let dates: Vec<_> = report.forecast.daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            vec![
                "2024-02-27",
                "2024-02-28",
                "2024-02-29",
                "2024-03-01",
                "2024-03-02",
                "2024-03-03",
                "2024-03-04"
            ]
        );
    }

    #[test]
    fn values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let report = mock_report(0.5, 0.5, Utc::now(), &mut rng);
            let c = &report.current;
            assert!((24.0..34.0).contains(&c.temperature));
            assert!((60.0..90.0).contains(&c.humidity));
            assert!((1013.0..1033.0).contains(&c.pressure));
            assert!((0.0..360.0).contains(&c.wind_direction));
            for day in &report.forecast.daily {
                assert!((28.0..36.0).contains(&day.temp_high));
                assert!((20.0..25.0).contains(&day.temp_low));
                assert!(CONDITIONS.contains(&day.conditions.as_str()));
            }
        }
    }

    #[test]
    fn echoes_requested_location() {
        let report = mock_report(-8.5, 115.2, Utc::now(), &mut StdRng::seed_from_u64(0));
        assert_eq!(report.location.latitude, -8.5);
        assert_eq!(report.location.longitude, 115.2);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["current"].get("windSpeed").is_some());
        assert!(json["forecast"]["daily"][0].get("tempHigh").is_some());
    }
}
