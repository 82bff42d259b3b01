//! Dashboard analytics: turns raw project and monitoring documents into the
//! summary object rendered on the overview page.
//!
//! [`summarize`] is pure and synchronous. The only clock it sees is the `now`
//! passed in, which drives the recency window. [`dashboard_summary`] does the
//! store I/O and hands materialized lists to it.

use std::collections::BTreeMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use sqlx::PgPool;

use crate::db::documents::{self, Direction, DocumentQuery};
use crate::errors::AppError;
use crate::models::monitoring::MonitoringRecord;
use crate::models::project::{EcosystemType, Project, ProjectStatus};

/// Trailing window for "recent activity".
pub const RECENCY_WINDOW_DAYS: i64 = 30;

/// How many recent records are returned in full.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// How many monthly buckets the carbon trend keeps.
pub const CARBON_TREND_MONTHS: usize = 12;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(rename = "summary")]
    pub totals: Totals,
    pub distributions: Distributions,
    pub trends: Trends,
    pub recent_activity: Vec<MonitoringRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_area: f64,
    pub total_carbon_stock: f64,
    pub total_sequestration: f64,
    /// Size of the whole recency window, before truncation.
    pub recent_measurements: usize,
}

/// Counts keyed in order of first occurrence in the input.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Distributions {
    pub ecosystem: IndexMap<EcosystemType, usize>,
    pub status: IndexMap<ProjectStatus, usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trends {
    pub carbon: Vec<CarbonTrendPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonTrendPoint {
    pub month: String,
    pub average_carbon: f64,
}

/// Fetch the inputs for one dashboard request and summarize them.
///
/// Projects are scoped to `organization_id` when given. Monitoring records
/// are not: they carry no organization field, so trends may include other
/// organizations' sites.
pub async fn dashboard_summary(
    pool: &PgPool,
    organization_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DashboardSummary, AppError> {
    let project_query = DocumentQuery::new().eq_opt("organizationId", organization_id);
    let monitoring_query = DocumentQuery::new().order_by("timestamp", Direction::Desc);

    let (project_docs, monitoring_docs) = tokio::try_join!(
        documents::find(pool, documents::PROJECTS, &project_query),
        documents::find(pool, documents::MONITORING, &monitoring_query),
    )?;

    let projects: Vec<Project> = documents::decode_all(project_docs, documents::PROJECTS)?;
    let monitoring: Vec<MonitoringRecord> =
        documents::decode_all(monitoring_docs, documents::MONITORING)?;

    tracing::debug!(
        projects = projects.len(),
        monitoring = monitoring.len(),
        organization_id = organization_id.unwrap_or("*"),
        "Summarizing dashboard"
    );

    Ok(summarize(&projects, &monitoring, now))
}

/// Build the dashboard summary from already-fetched lists.
pub fn summarize(
    projects: &[Project],
    monitoring: &[MonitoringRecord],
    now: DateTime<Utc>,
) -> DashboardSummary {
    let recent = recent_activity(monitoring, now);

    DashboardSummary {
        totals: Totals {
            total_projects: projects.len(),
            active_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            total_area: projects.iter().map(|p| p.area).sum(),
            total_carbon_stock: projects.iter().map(|p| p.carbon_stock).sum(),
            total_sequestration: projects.iter().map(|p| p.sequestration_rate).sum(),
            recent_measurements: recent.len(),
        },
        distributions: Distributions {
            ecosystem: count_by(projects, |p| p.ecosystem_type),
            status: count_by(projects, |p| p.status),
        },
        trends: Trends {
            carbon: carbon_trends(monitoring),
        },
        recent_activity: recent
            .into_iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .cloned()
            .collect(),
    }
}

fn count_by<T, K, F>(items: &[T], key: F) -> IndexMap<K, usize>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut counts = IndexMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
}

/// Records strictly newer than `now - 30 days`, in input order.
pub fn recent_activity(monitoring: &[MonitoringRecord], now: DateTime<Utc>) -> Vec<&MonitoringRecord> {
    let cutoff = now - Duration::days(RECENCY_WINDOW_DAYS);
    monitoring
        .iter()
        .filter(|m| m.timestamp.instant() > cutoff)
        .collect()
}

/// Average carbon stock per `YYYY-MM` bucket, ascending, last 12 buckets present.
pub fn carbon_trends(monitoring: &[MonitoringRecord]) -> Vec<CarbonTrendPoint> {
    let mut buckets: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in monitoring {
        let bucket = buckets.entry(record.timestamp.month()).or_insert((0.0, 0));
        bucket.0 += record.measurements.carbon_stock;
        bucket.1 += 1;
    }

    let points: Vec<CarbonTrendPoint> = buckets
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(month, (total, count))| CarbonTrendPoint {
            month: month.to_string(),
            average_carbon: total / count as f64,
        })
        .collect();

    let skip = points.len().saturating_sub(CARBON_TREND_MONTHS);
    points.into_iter().skip(skip).collect()
}
