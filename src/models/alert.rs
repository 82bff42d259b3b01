//! Project alerts raised by monitoring staff or automated checks.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::timestamp::IsoTimestamp;
use super::validation::{not_blank, FieldOrder};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Environmental,
    Security,
    Maintenance,
    Data,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: AlertStatus,
    pub created_at: IsoTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<IsoTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<IsoTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlert {
    #[validate(
        required(message = "Project ID is required"),
        custom(function = "not_blank", message = "Project ID is required")
    )]
    pub project_id: Option<String>,
    #[serde(rename = "type")]
    #[validate(required(message = "Alert type is required"))]
    pub alert_type: Option<AlertType>,
    #[validate(required(message = "Severity is required"))]
    pub severity: Option<AlertSeverity>,
    #[validate(
        required(message = "Title is required"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}

impl FieldOrder for CreateAlert {
    const FIELDS: &'static [&'static str] = &["project_id", "alert_type", "severity", "title"];
}
