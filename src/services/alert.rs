//! Alert service: list and raise project alerts.

use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::db::documents::{self, Direction, DocumentQuery, ALERTS};
use crate::errors::AppError;
use crate::models::alert::{Alert, AlertSeverity, AlertStatus, CreateAlert};
use crate::models::timestamp::IsoTimestamp;
use crate::models::validation;

/// Filters for listing alerts.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlertFilters {
    pub project_id: Option<String>,
    pub status: Option<AlertStatus>,
    pub severity: Option<AlertSeverity>,
}

/// List alerts, newest first.
pub async fn list(pool: &PgPool, filters: &AlertFilters) -> Result<Vec<Alert>, AppError> {
    let status = filters.status.map(status_name);
    let severity = filters.severity.map(severity_name);
    let query = DocumentQuery::new()
        .eq_opt("projectId", filters.project_id.as_deref())
        .eq_opt("status", status)
        .eq_opt("severity", severity)
        .order_by("createdAt", Direction::Desc);

    let docs = documents::find(pool, ALERTS, &query).await?;
    documents::decode_all(docs, ALERTS)
}

fn status_name(status: AlertStatus) -> &'static str {
    match status {
        AlertStatus::Active => "active",
        AlertStatus::Acknowledged => "acknowledged",
        AlertStatus::Resolved => "resolved",
    }
}

fn severity_name(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::Low => "low",
        AlertSeverity::Medium => "medium",
        AlertSeverity::High => "high",
        AlertSeverity::Critical => "critical",
    }
}

/// Raise a new alert. New alerts always start out `active`.
pub async fn create(pool: &PgPool, input: &CreateAlert) -> Result<Alert, AppError> {
    validation::check(input)?;

    let (Some(project_id), Some(alert_type), Some(severity), Some(title)) = (
        input.project_id.clone(),
        input.alert_type,
        input.severity,
        input.title.clone(),
    ) else {
        return Err(AppError::Validation("Incomplete alert".to_string()));
    };

    let alert = Alert {
        id: documents::new_id(),
        project_id,
        alert_type,
        severity,
        title,
        description: input.description.clone().unwrap_or_default(),
        status: AlertStatus::Active,
        created_at: IsoTimestamp::now(),
        acknowledged_at: None,
        resolved_at: None,
        assigned_to: input.assigned_to.clone(),
    };

    let mut body = serde_json::to_value(&alert).map_err(|e| AppError::Internal(e.to_string()))?;
    if let Value::Object(ref mut map) = body {
        map.remove("id");
    }
    documents::insert(pool, ALERTS, &alert.id, &body).await?;

    tracing::info!(alert_id = %alert.id, severity = severity_name(severity), "Alert raised");
    Ok(alert)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_names_match_serde_encoding() {
        for status in [AlertStatus::Active, AlertStatus::Acknowledged, AlertStatus::Resolved] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status_name(status));
        }
        for severity in [
            AlertSeverity::Low,
            AlertSeverity::Medium,
            AlertSeverity::High,
            AlertSeverity::Critical,
        ] {
            let json = serde_json::to_value(severity).unwrap();
            assert_eq!(json, severity_name(severity));
        }
    }
}
