pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::flows::{self, City};
use crate::services::genai::GeminiClient;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub generator: GeminiClient,
    pub cities: Arc<Vec<City>>,
}

impl AppState {
    /// Wire up the generative client and load the city list.
    pub fn new(db: PgPool, config: config::AppConfig) -> Result<Self, reqwest::Error> {
        let generator = GeminiClient::new(&config.genai)?;
        let cities = Arc::new(flows::load_cities(&config.cities_path));
        Ok(Self {
            db,
            config,
            generator,
            cities,
        })
    }
}
