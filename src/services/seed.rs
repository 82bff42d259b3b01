//! One-time seeding of the dashboard feed.
//!
//! Runs as an explicit startup step (and from the `seed` binary). The store
//! itself is the gate: nothing is written once `dashboard-alerts` holds any
//! document, so concurrent or repeated runs across instances are harmless.

use serde_json::{json, Value};
use sqlx::PgPool;

use crate::db::documents::{self, DASHBOARD_ALERTS, DASHBOARD_REPORTS};
use crate::errors::AppError;

/// Outcome of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { alerts: usize, reports: usize },
    AlreadyPresent,
}

/// Initial threat-feed entries as `(id, body)` pairs.
pub fn initial_alerts() -> Vec<(&'static str, Value)> {
    vec![
        (
            "ALERT-001",
            json!({
                "severity": "High",
                "type": "Storm Surge",
                "location": "East Coast",
                "timestamp": "2024-07-29T14:30:00Z"
            }),
        ),
        (
            "ALERT-002",
            json!({
                "severity": "Medium",
                "type": "High Tides",
                "location": "West Coast",
                "timestamp": "2024-07-29T11:00:00Z"
            }),
        ),
        (
            "ALERT-003",
            json!({
                "severity": "Low",
                "type": "Pollution",
                "location": "Gulf Coast",
                "timestamp": "2024-07-28T09:15:00Z"
            }),
        ),
    ]
}

/// Initial report catalogue as `(id, body)` pairs.
pub fn initial_reports() -> Vec<(&'static str, Value)> {
    vec![
        (
            "REP-001",
            json!({
                "name": "Weekly Threat Summary",
                "date": "2024-07-28",
                "type": "Summary",
                "status": "Complete",
                "href": "/dashboard/reports/REP-001"
            }),
        ),
        (
            "REP-002",
            json!({
                "name": "Hurricane Zeta Impact Analysis",
                "date": "2024-07-25",
                "type": "Impact Analysis",
                "status": "Complete",
                "href": "/dashboard/reports/impact-analysis"
            }),
        ),
        (
            "REP-003",
            json!({
                "name": "Q3 Water Quality Report",
                "date": "2024-07-20",
                "type": "Water Quality",
                "status": "Complete",
                "href": "/dashboard/reports/water-quality"
            }),
        ),
        (
            "REP-004",
            json!({
                "name": "Monthly Alert Log",
                "date": "2024-07-31",
                "type": "Log Export",
                "status": "Complete",
                "href": "/dashboard/reports/monthly-log"
            }),
        ),
    ]
}

/// Seed the dashboard feed if it has never been seeded.
pub async fn seed_initial_data(pool: &PgPool) -> Result<SeedOutcome, AppError> {
    if !documents::is_empty(pool, DASHBOARD_ALERTS).await? {
        tracing::debug!("Dashboard feed already present, skipping seed");
        return Ok(SeedOutcome::AlreadyPresent);
    }

    tracing::info!("Seeding initial dashboard data");
    let alerts = initial_alerts();
    let reports = initial_reports();

    // Upserts keep a half-finished earlier run from failing this one.
    for (id, body) in &alerts {
        documents::upsert(pool, DASHBOARD_ALERTS, id, body).await?;
    }
    for (id, body) in &reports {
        documents::upsert(pool, DASHBOARD_REPORTS, id, body).await?;
    }

    tracing::info!(alerts = alerts.len(), reports = reports.len(), "Dashboard data seeded");
    Ok(SeedOutcome::Seeded {
        alerts: alerts.len(),
        reports: reports.len(),
    })
}
