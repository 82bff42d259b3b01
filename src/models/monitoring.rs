//! Field monitoring measurements attached to a project.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::timestamp::IsoTimestamp;
use super::validation::{not_blank, FieldOrder};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_coordinates"))]
pub struct Coordinates {
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
}

fn validate_coordinates(coordinates: &Coordinates) -> Result<(), ValidationError> {
    if coordinates.latitude == 0.0 || coordinates.longitude == 0.0 {
        let mut err = ValidationError::new("coordinates");
        err.message = Some("Valid coordinates are required".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaterQuality {
    #[validate(range(min = 0.0, max = 14.0, message = "pH must be between 0 and 14"))]
    pub ph: f64,
    pub salinity: f64,
    #[validate(range(
        min = -10.0,
        max = 50.0,
        message = "Temperature must be realistic (-10°C to 50°C)"
    ))]
    pub temperature: f64,
    pub dissolved_oxygen: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Biodiversity {
    #[serde(default)]
    pub species_count: u32,
    #[serde(default)]
    pub dominant_species: Vec<String>,
    #[serde(default)]
    pub threatened_species: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    #[validate(range(min = 0.0, message = "Carbon stock cannot be negative"))]
    pub carbon_stock: f64,
    #[serde(default)]
    pub biomass_above_ground: f64,
    #[serde(default)]
    pub biomass_below_ground: f64,
    #[serde(default)]
    pub soil_carbon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub water_quality: Option<WaterQuality>,
    #[serde(default)]
    pub biodiversity: Biodiversity,
}

/// Weather observed on site at collection time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringRecord {
    pub id: String,
    pub project_id: String,
    pub timestamp: IsoTimestamp,
    #[serde(default)]
    pub collected_by: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    pub measurements: Measurements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<SiteWeather>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonitoringRecord {
    #[validate(
        required(message = "Project ID is required"),
        custom(function = "not_blank", message = "Project ID is required")
    )]
    pub project_id: Option<String>,
    #[validate(
        required(message = "Timestamp is required"),
        custom(function = "iso_timestamp", message = "Timestamp must be an ISO-8601 date")
    )]
    pub timestamp: Option<String>,
    #[validate(
        required(message = "Collector information is required"),
        custom(function = "not_blank", message = "Collector information is required")
    )]
    pub collected_by: Option<String>,
    #[validate(required(message = "Coordinates are required"), nested)]
    pub coordinates: Option<Coordinates>,
    #[validate(required(message = "Measurements are required"), nested)]
    pub measurements: Option<Measurements>,
    pub weather: Option<SiteWeather>,
    pub notes: Option<String>,
    pub verified: Option<bool>,
    pub images: Option<Vec<String>>,
}

impl FieldOrder for CreateMonitoringRecord {
    const FIELDS: &'static [&'static str] = &[
        "project_id",
        "timestamp",
        "collected_by",
        "coordinates",
        "coordinates.__all__",
        "coordinates.latitude",
        "coordinates.longitude",
        "measurements",
        "measurements.carbon_stock",
        "measurements.water_quality",
        "measurements.water_quality.ph",
        "measurements.water_quality.temperature",
    ];
}

fn iso_timestamp(value: &str) -> Result<(), ValidationError> {
    IsoTimestamp::parse(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("timestamp"))
}
