//! Business logic services.

pub mod alert;
pub mod analytics;
pub mod carbon_credit;
pub mod dashboard;
pub mod flows;
pub mod genai;
pub mod monitoring;
pub mod project;
pub mod seed;
pub mod upload;
pub mod weather;
