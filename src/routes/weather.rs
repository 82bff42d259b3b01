//! Mock weather route.

use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use super::extract::AppQuery;
use crate::errors::{ApiResponse, AppError};
use crate::services::weather::{self, WeatherReport};

#[derive(Debug, Deserialize, Default)]
pub struct WeatherParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

fn coordinate(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// GET /api/weather?lat&lon
pub async fn current(
    AppQuery(params): AppQuery<WeatherParams>,
) -> Result<Json<ApiResponse<WeatherReport>>, AppError> {
    let (Some(lat), Some(lon)) = (
        coordinate(params.lat.as_deref()),
        coordinate(params.lon.as_deref()),
    ) else {
        return Err(AppError::Validation(
            "Latitude and longitude are required".to_string(),
        ));
    };

    let report = weather::mock_report(lat, lon, Utc::now(), &mut rand::rng());
    Ok(ApiResponse::success(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_must_be_finite_numbers() {
        assert_eq!(coordinate(Some("12.5")), Some(12.5));
        assert_eq!(coordinate(Some(" -8 ")), Some(-8.0));
        assert_eq!(coordinate(Some("")), None);
        assert_eq!(coordinate(Some("north")), None);
        assert_eq!(coordinate(Some("NaN")), None);
        assert_eq!(coordinate(Some("inf")), None);
        assert_eq!(coordinate(None), None);
    }
}
