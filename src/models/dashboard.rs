//! Threat feed and report catalogue shown on the dashboard landing page.

use serde::{Deserialize, Serialize};

use super::timestamp::IsoTimestamp;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeedSeverity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAlert {
    pub id: String,
    pub severity: FeedSeverity,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub location: String,
    pub timestamp: IsoTimestamp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReportStatus {
    Complete,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub id: String,
    pub name: String,
    pub date: IsoTimestamp,
    #[serde(rename = "type")]
    pub report_type: String,
    pub status: ReportStatus,
    pub href: String,
}
