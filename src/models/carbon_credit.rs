//! Carbon credits issued against verified sequestration.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::timestamp::IsoTimestamp;
use super::validation::{not_blank, FieldOrder};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CreditStatus {
    Available,
    Reserved,
    Sold,
    Retired,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStandard {
    Vcs,
    Cdm,
    Gs,
    Acr,
    Car,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonCredit {
    pub id: String,
    pub project_id: String,
    pub organization_id: String,
    /// Tonnes of CO2 equivalent.
    pub amount: f64,
    pub price: f64,
    pub currency: String,
    pub status: CreditStatus,
    pub vintage: String,
    #[serde(default)]
    pub methodology: String,
    pub verification_standard: VerificationStandard,
    pub serial_number: String,
    pub issuance_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    pub created_at: IsoTimestamp,
    pub updated_at: IsoTimestamp,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarbonCredit {
    #[validate(
        required(message = "Project ID is required"),
        custom(function = "not_blank", message = "Project ID is required")
    )]
    pub project_id: Option<String>,
    #[validate(
        required(message = "Organization ID is required"),
        custom(function = "not_blank", message = "Organization ID is required")
    )]
    pub organization_id: Option<String>,
    #[validate(
        required(message = "Credit amount must be greater than 0"),
        range(exclusive_min = 0.0, message = "Credit amount must be greater than 0")
    )]
    pub amount: Option<f64>,
    #[validate(
        required(message = "Price is required"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    pub price: Option<f64>,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    #[validate(
        required(message = "Vintage year is required"),
        custom(function = "not_blank", message = "Vintage year is required")
    )]
    pub vintage: Option<String>,
    pub methodology: Option<String>,
    #[validate(required(message = "Verification standard is required"))]
    pub verification_standard: Option<VerificationStandard>,
    pub issuance_date: Option<String>,
    pub expiry_date: Option<String>,
}

impl FieldOrder for CreateCarbonCredit {
    const FIELDS: &'static [&'static str] = &[
        "project_id",
        "organization_id",
        "amount",
        "price",
        "currency",
        "vintage",
        "verification_standard",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation;

    #[test]
    fn verification_standard_is_uppercase_on_wire() {
        assert_eq!(
            serde_json::to_string(&VerificationStandard::Vcs).unwrap(),
            "\"VCS\""
        );
        let gs: VerificationStandard = serde_json::from_str("\"GS\"").unwrap();
        assert_eq!(gs, VerificationStandard::Gs);
    }

    #[test]
    fn zero_amount_rejected() {
        let input = CreateCarbonCredit {
            project_id: Some("p1".to_string()),
            organization_id: Some("org-1".to_string()),
            amount: Some(0.0),
            price: Some(12.0),
            vintage: Some("2024".to_string()),
            verification_standard: Some(VerificationStandard::Vcs),
            ..Default::default()
        };
        let err = validation::check(&input).unwrap_err();
        assert!(err.to_string().contains("Credit amount must be greater than 0"));
    }
}
