//! Document models and DTOs for all domain entities.

pub mod alert;
pub mod carbon_credit;
pub mod dashboard;
pub mod monitoring;
pub mod project;
pub mod timestamp;
pub mod validation;
