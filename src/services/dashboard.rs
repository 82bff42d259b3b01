//! Dashboard feed: the threat-alert ticker and the report catalogue.

use sqlx::PgPool;

use crate::db::documents::{self, DocumentQuery, DASHBOARD_ALERTS, DASHBOARD_REPORTS};
use crate::errors::AppError;
use crate::models::dashboard::{DashboardAlert, DashboardReport};

/// Threat alerts, newest first.
pub async fn list_alerts(pool: &PgPool) -> Result<Vec<DashboardAlert>, AppError> {
    let docs = documents::find(pool, DASHBOARD_ALERTS, &DocumentQuery::new()).await?;
    let mut alerts: Vec<DashboardAlert> = documents::decode_all(docs, DASHBOARD_ALERTS)?;
    alerts.sort_by(|a, b| b.timestamp.instant().cmp(&a.timestamp.instant()));
    Ok(alerts)
}

/// Reports, most recent date first.
pub async fn list_reports(pool: &PgPool) -> Result<Vec<DashboardReport>, AppError> {
    let docs = documents::find(pool, DASHBOARD_REPORTS, &DocumentQuery::new()).await?;
    let mut reports: Vec<DashboardReport> = documents::decode_all(docs, DASHBOARD_REPORTS)?;
    reports.sort_by(|a, b| b.date.instant().cmp(&a.date.instant()));
    Ok(reports)
}
