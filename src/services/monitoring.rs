//! Monitoring service: ingest and list field measurements.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::db::documents::{self, Direction, DocumentQuery, MONITORING};
use crate::errors::AppError;
use crate::models::monitoring::{CreateMonitoringRecord, MonitoringRecord};
use crate::models::timestamp::IsoTimestamp;
use crate::models::validation;

/// Query parameters for a project's monitoring history.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringFilters {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<usize>,
}

/// Inclusive time bounds resolved from [`MonitoringFilters`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub until: Option<DateTime<Utc>>,
}

impl MonitoringFilters {
    /// Parse the date bounds. A bare `endDate` covers that whole day.
    pub fn range(&self) -> Result<DateRange, AppError> {
        let parse = |raw: &str, name: &str| {
            IsoTimestamp::parse(raw)
                .map_err(|_| AppError::Validation(format!("{name} must be an ISO-8601 date")))
        };

        let from = self
            .start_date
            .as_deref()
            .map(|raw| parse(raw, "startDate"))
            .transpose()?
            .map(|ts| ts.instant());

        let until = self
            .end_date
            .as_deref()
            .map(|raw| {
                let ts = parse(raw, "endDate")?;
                let is_bare_date = raw.trim().len() == 10;
                Ok::<_, AppError>(if is_bare_date {
                    ts.instant() + Duration::days(1)
                } else {
                    ts.instant() + Duration::milliseconds(1)
                })
            })
            .transpose()?;

        Ok(DateRange { from, until })
    }
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| instant >= from)
            && self.until.map_or(true, |until| instant < until)
    }
}

/// Validate and persist a new monitoring record.
pub async fn create(
    pool: &PgPool,
    input: &CreateMonitoringRecord,
) -> Result<MonitoringRecord, AppError> {
    validation::check(input)?;
    let record = build(documents::new_id(), input)?;

    let mut body = serde_json::to_value(&record).map_err(|e| AppError::Internal(e.to_string()))?;
    if let Value::Object(ref mut map) = body {
        map.remove("id");
    }
    documents::insert(pool, MONITORING, &record.id, &body).await?;

    tracing::info!(
        record_id = %record.id,
        project_id = %record.project_id,
        "Monitoring record created"
    );
    Ok(record)
}

fn build(id: String, input: &CreateMonitoringRecord) -> Result<MonitoringRecord, AppError> {
    let (Some(project_id), Some(timestamp), Some(collected_by), Some(coordinates), Some(measurements)) = (
        input.project_id.clone(),
        input.timestamp.as_deref(),
        input.collected_by.clone(),
        input.coordinates.clone(),
        input.measurements.clone(),
    ) else {
        return Err(AppError::Validation("Incomplete monitoring record".to_string()));
    };

    let timestamp = IsoTimestamp::parse(timestamp)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok(MonitoringRecord {
        id,
        project_id,
        timestamp,
        collected_by,
        coordinates,
        measurements,
        weather: input.weather.clone(),
        notes: input.notes.clone().unwrap_or_default(),
        verified: input.verified.unwrap_or(false),
        images: input.images.clone(),
    })
}

/// Monitoring history for one project, newest first.
pub async fn list_for_project(
    pool: &PgPool,
    project_id: &str,
    filters: &MonitoringFilters,
) -> Result<Vec<MonitoringRecord>, AppError> {
    let range = filters.range()?;
    let query = DocumentQuery::new()
        .eq("projectId", project_id)
        .order_by("timestamp", Direction::Desc);

    let docs = documents::find(pool, MONITORING, &query).await?;
    let records: Vec<MonitoringRecord> = documents::decode_all(docs, MONITORING)?;

    Ok(apply_filters(records, range, filters.limit))
}

fn apply_filters(
    records: Vec<MonitoringRecord>,
    range: DateRange,
    limit: Option<usize>,
) -> Vec<MonitoringRecord> {
    records
        .into_iter()
        .filter(|r| range.contains(r.timestamp.instant()))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::monitoring::{Biodiversity, Coordinates, Measurements};
    use chrono::TimeZone;

    fn record(id: &str, timestamp: &str) -> MonitoringRecord {
        MonitoringRecord {
            id: id.to_string(),
            project_id: "p1".to_string(),
            timestamp: IsoTimestamp::parse(timestamp).unwrap(),
            collected_by: "tester".to_string(),
            coordinates: Coordinates {
                latitude: 1.0,
                longitude: 1.0,
            },
            measurements: Measurements {
                carbon_stock: 1.0,
                biomass_above_ground: 0.0,
                biomass_below_ground: 0.0,
                soil_carbon: 0.0,
                water_quality: None,
                biodiversity: Biodiversity::default(),
            },
            weather: None,
            notes: String::new(),
            verified: false,
            images: None,
        }
    }

    #[test]
    fn bare_end_date_covers_whole_day() {
        let filters = MonitoringFilters {
            end_date: Some("2024-02-10".to_string()),
            ..Default::default()
        };
        let range = filters.range().unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 2, 10, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 2, 11, 0, 0, 0).unwrap()));
    }

    #[test]
    fn start_date_is_inclusive() {
        let filters = MonitoringFilters {
            start_date: Some("2024-02-10".to_string()),
            ..Default::default()
        };
        let range = filters.range().unwrap();
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 2, 9, 23, 59, 59).unwrap()));
    }

    #[test]
    fn invalid_dates_rejected() {
        let filters = MonitoringFilters {
            start_date: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(matches!(filters.range(), Err(AppError::Validation(_))));
    }

    #[test]
    fn filters_then_limits() {
        let records = vec![
            record("c", "2024-03-05"),
            record("b", "2024-02-20"),
            record("a", "2024-01-15"),
        ];
        let filters = MonitoringFilters {
            start_date: Some("2024-02-01".to_string()),
            limit: Some(1),
            ..Default::default()
        };
        let out = apply_filters(records, filters.range().unwrap(), filters.limit);
        let ids: Vec<_> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }
}
