//! Carbon credit service: list and issue credits.

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::db::documents::{self, Direction, DocumentQuery, CARBON_CREDITS};
use crate::errors::AppError;
use crate::models::carbon_credit::{CarbonCredit, CreateCarbonCredit, CreditStatus};
use crate::models::timestamp::IsoTimestamp;
use crate::models::validation;

const SERIAL_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SERIAL_SUFFIX_LEN: usize = 9;

/// Filters for listing credits.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreditFilters {
    pub project_id: Option<String>,
    pub status: Option<CreditStatus>,
    pub organization_id: Option<String>,
}

/// List credits, newest first.
pub async fn list(pool: &PgPool, filters: &CreditFilters) -> Result<Vec<CarbonCredit>, AppError> {
    let status = filters.status.map(|s| match s {
        CreditStatus::Available => "available",
        CreditStatus::Reserved => "reserved",
        CreditStatus::Sold => "sold",
        CreditStatus::Retired => "retired",
    });
    let query = DocumentQuery::new()
        .eq_opt("projectId", filters.project_id.as_deref())
        .eq_opt("status", status)
        .eq_opt("organizationId", filters.organization_id.as_deref())
        .order_by("createdAt", Direction::Desc);

    let docs = documents::find(pool, CARBON_CREDITS, &query).await?;
    documents::decode_all(docs, CARBON_CREDITS)
}

/// `BC-<epoch millis>-<9 random base-36 characters>`.
pub fn serial_number<R: Rng + ?Sized>(epoch_millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..SERIAL_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..SERIAL_ALPHABET.len());
            char::from(SERIAL_ALPHABET[idx])
        })
        .collect();
    format!("BC-{epoch_millis}-{suffix}")
}

/// Issue a new credit. New credits start out `available`.
pub async fn create(pool: &PgPool, input: &CreateCarbonCredit) -> Result<CarbonCredit, AppError> {
    validation::check(input)?;

    let (Some(project_id), Some(organization_id), Some(amount), Some(price), Some(vintage), Some(standard)) = (
        input.project_id.clone(),
        input.organization_id.clone(),
        input.amount,
        input.price,
        input.vintage.clone(),
        input.verification_standard,
    ) else {
        return Err(AppError::Validation("Incomplete carbon credit".to_string()));
    };

    let now = Utc::now();
    let serial = serial_number(now.timestamp_millis(), &mut rand::rng());
    let stamp = IsoTimestamp::from(now);

    let credit = CarbonCredit {
        id: documents::new_id(),
        project_id,
        organization_id,
        amount,
        price,
        currency: input
            .currency
            .clone()
            .unwrap_or_else(|| "USD".to_string())
            .to_uppercase(),
        status: CreditStatus::Available,
        vintage,
        methodology: input.methodology.clone().unwrap_or_default(),
        verification_standard: standard,
        serial_number: serial,
        issuance_date: input
            .issuance_date
            .clone()
            .unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
        expiry_date: input.expiry_date.clone(),
        created_at: stamp.clone(),
        updated_at: stamp,
    };

    let mut body = serde_json::to_value(&credit).map_err(|e| AppError::Internal(e.to_string()))?;
    if let Value::Object(ref mut map) = body {
        map.remove("id");
    }
    documents::insert(pool, CARBON_CREDITS, &credit.id, &body).await?;

    tracing::info!(credit_id = %credit.id, serial = %credit.serial_number, "Carbon credit issued");
    Ok(credit)
}
