//! Blue-carbon restoration project model.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::timestamp::IsoTimestamp;
use super::validation::{not_blank, FieldOrder};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EcosystemType {
    Mangrove,
    Seagrass,
    #[serde(alias = "salt-marsh", alias = "salt_marsh")]
    Saltmarsh,
    Kelp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planning,
    Active,
    Monitoring,
    Completed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_location_coordinates"))]
pub struct Location {
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Address is required"))]
    pub address: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Country is required"))]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// A zero coordinate means the client never picked a point on the map.
fn validate_location_coordinates(location: &Location) -> Result<(), ValidationError> {
    if location.latitude == 0.0 || location.longitude == 0.0 {
        let mut err = ValidationError::new("coordinates");
        err.message = Some("Valid coordinates are required".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub location: Location,
    pub ecosystem_type: EcosystemType,
    pub area: f64,
    #[serde(default)]
    pub carbon_stock: f64,
    #[serde(default)]
    pub sequestration_rate: f64,
    pub status: ProjectStatus,
    #[serde(default)]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub organization_id: String,
    #[serde(default)]
    pub manager_id: String,
    #[serde(default)]
    pub team_members: Vec<String>,
    #[serde(default)]
    pub stakeholders: Vec<String>,
    pub created_at: IsoTimestamp,
    pub updated_at: IsoTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(
        required(message = "Project name is required"),
        custom(function = "not_blank", message = "Project name is required")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(required(message = "Project location is required"), nested)]
    pub location: Option<Location>,
    #[validate(required(message = "Ecosystem type is required"))]
    pub ecosystem_type: Option<EcosystemType>,
    #[validate(
        required(message = "Project area must be greater than 0"),
        range(exclusive_min = 0.0, message = "Project area must be greater than 0")
    )]
    pub area: Option<f64>,
    pub carbon_stock: Option<f64>,
    pub sequestration_rate: Option<f64>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[validate(
        required(message = "Organization ID is required"),
        custom(function = "not_blank", message = "Organization ID is required")
    )]
    pub organization_id: Option<String>,
    pub manager_id: Option<String>,
    pub team_members: Option<Vec<String>>,
    pub stakeholders: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub documents: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

const LOCATION_FIELDS: [&str; 5] = [
    "location.__all__",
    "location.latitude",
    "location.longitude",
    "location.address",
    "location.country",
];

impl FieldOrder for CreateProject {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "location",
        LOCATION_FIELDS[0],
        LOCATION_FIELDS[1],
        LOCATION_FIELDS[2],
        LOCATION_FIELDS[3],
        LOCATION_FIELDS[4],
        "ecosystem_type",
        "area",
        "organization_id",
    ];
}

/// Partial update: only fields present in the body are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Project name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecosystem_type: Option<EcosystemType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "Project area must be greater than 0"))]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequestration_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stakeholders: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl FieldOrder for UpdateProject {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "location",
        LOCATION_FIELDS[0],
        LOCATION_FIELDS[1],
        LOCATION_FIELDS[2],
        LOCATION_FIELDS[3],
        LOCATION_FIELDS[4],
        "area",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation;

    fn valid_create() -> CreateProject {
        CreateProject {
            name: Some("Sundarbans Restoration".to_string()),
            location: Some(Location {
                latitude: 21.95,
                longitude: 89.18,
                address: "Gosaba".to_string(),
                country: "India".to_string(),
                region: None,
            }),
            ecosystem_type: Some(EcosystemType::Mangrove),
            area: Some(120.5),
            organization_id: Some("org-1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn ecosystem_type_accepts_salt_marsh_spellings() {
        for raw in ["\"saltmarsh\"", "\"salt-marsh\"", "\"salt_marsh\""] {
            let parsed: EcosystemType = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, EcosystemType::Saltmarsh);
        }
        assert_eq!(
            serde_json::to_string(&EcosystemType::Saltmarsh).unwrap(),
            "\"saltmarsh\""
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<ProjectStatus>("\"abandoned\"").is_err());
    }

    #[test]
    fn valid_create_passes() {
        assert!(validation::check(&valid_create()).is_ok());
    }

    #[test]
    fn create_reports_every_missing_field() {
        let errors = CreateProject::default().validate().unwrap_err();
        let messages = validation::messages(&errors, CreateProject::FIELDS);
        assert_eq!(
            messages,
            vec![
                "Project name is required",
                "Project location is required",
                "Ecosystem type is required",
                "Project area must be greater than 0",
                "Organization ID is required",
            ]
        );
    }

    #[test]
    fn zero_area_rejected() {
        let input = CreateProject {
            area: Some(0.0),
            ..valid_create()
        };
        let err = validation::check(&input).unwrap_err();
        assert!(err.to_string().contains("Project area must be greater than 0"));
    }

    #[test]
    fn location_without_coordinates_rejected() {
        let input = CreateProject {
            location: Some(Location {
                address: "Somewhere".to_string(),
                country: "India".to_string(),
                ..Default::default()
            }),
            ..valid_create()
        };
        let messages = validation::messages(&input.validate().unwrap_err(), CreateProject::FIELDS);
        assert_eq!(messages, vec!["Valid coordinates are required"]);
    }

    #[test]
    fn location_messages_follow_field_order() {
        let input = CreateProject {
            name: Some(" ".to_string()),
            location: Some(Location {
                address: "Kakinada".to_string(),
                country: "India".to_string(),
                ..Default::default()
            }),
            area: Some(-1.0),
            ..valid_create()
        };
        let err = validation::check(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Project name is required; Valid coordinates are required; \
             Project area must be greater than 0"
        );
    }

    #[test]
    fn update_messages_follow_field_order() {
        let update = UpdateProject {
            name: Some(String::new()),
            area: Some(0.0),
            ..Default::default()
        };
        let err = validation::check(&update).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Project name cannot be empty; Project area must be greater than 0"
        );
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let update = UpdateProject {
            status: Some(ProjectStatus::Monitoring),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "monitoring" }));
    }

    #[test]
    fn update_rejects_negative_area() {
        let update = UpdateProject {
            area: Some(-3.0),
            ..Default::default()
        };
        assert!(validation::check(&update).is_err());
    }

    #[test]
    fn project_decodes_with_defaults() {
        let json = serde_json::json!({
            "id": "p1",
            "name": "Kelp Forest",
            "location": { "latitude": 10.0, "longitude": 20.0, "address": "Bay", "country": "US" },
            "ecosystemType": "kelp",
            "area": 40.0,
            "status": "planning",
            "organizationId": "org-1",
            "createdAt": "2024-05-01T00:00:00Z",
            "updatedAt": "2024-05-01T00:00:00Z"
        });
        let project: Project = serde_json::from_value(json).unwrap();
        assert_eq!(project.carbon_stock, 0.0);
        assert!(project.team_members.is_empty());
    }
}
