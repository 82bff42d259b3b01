//! Structured prompt flows: data visualization narratives, in-app search and
//! location suggestions.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::errors::AppError;
use crate::models::validation::not_blank;
use crate::services::genai::Generator;

const MAX_SUGGESTIONS: usize = 5;

/// Pages and reports the search flow may point at.
const SECTIONS: &[(&str, &str, &str)] = &[
    ("Page", "Dashboard", "/dashboard"),
    ("Page", "Data Visualization", "/dashboard/data-visualization"),
    ("Page", "Threat Alerts", "/dashboard/threat-alerts"),
    ("Page", "Interactive Map", "/dashboard/map"),
    ("Page", "Awareness", "/awareness"),
    ("Report", "Weekly Threat Summary", "/dashboard/reports/REP-001"),
    ("Report", "Hurricane Zeta Impact Analysis", "/dashboard/reports/impact-analysis"),
    ("Report", "Q3 Water Quality Report", "/dashboard/reports/water-quality"),
    ("Report", "Monthly Alert Log", "/dashboard/reports/monthly-log"),
];

// ---------------------------------------------------------------------------
// Visualize
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VisualizeInput {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub data_type: String,
    /// JSON-encoded values, passed through to the prompt as text.
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub data_values: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub visualization_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualizeOutput {
    pub visualization: String,
}

fn visualize_prompt(input: &VisualizeInput) -> String {
    format!(
        "You are an expert in data visualization.\n\n\
         You will take environmental data and create a textual summary of the data, \
         describing how it is visualized, and the key insights from the data.\n\n\
         Data Type: {}\n\
         Data Values: {}\n\
         Visualization Type: {}\n\n\
         Create a detailed description of the visualization.",
        input.data_type, input.data_values, input.visualization_type
    )
}

fn visualize_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "visualization": {
                "type": "STRING",
                "description": "A textual description of the visualized data."
            }
        },
        "required": ["visualization"]
    })
}

pub async fn visualize<G: Generator>(
    generator: &G,
    input: &VisualizeInput,
) -> Result<VisualizeOutput, AppError> {
    input
        .validate()
        .map_err(|_| AppError::Validation("Invalid input. Please check all fields.".to_string()))?;

    let raw = generator
        .generate_json(&visualize_prompt(input), &visualize_schema())
        .await?;
    let output: VisualizeOutput = decode_output(raw)?;

    if output.visualization.trim().is_empty() {
        return Err(AppError::Generation("empty visualization".to_string())
            .context("AI failed to generate a visualization. Please try again."));
    }
    Ok(output)
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct QueryInput {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchOutput {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

fn search_prompt(query: &str) -> String {
    let mut catalogue = String::new();
    for (kind, title, url) in SECTIONS {
        catalogue.push_str(&format!("- {kind}: {title}, url: {url}\n"));
    }
    format!(
        "You are a search expert for the CoastalWatch application. Your task is to \
         provide relevant search results based on a user's query.\n\n\
         You must only return results from the following list of available pages and \
         reports in the application. Do not invent new results.\n\n\
         {catalogue}\n\
         Based on the user's search query \"{query}\", return a list of the most relevant \
         results. For each result, provide its type, title, URL, and a brief description."
    )
}

fn search_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "results": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING" },
                        "title": { "type": "STRING" },
                        "url": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["type", "title", "url", "description"]
                }
            }
        },
        "required": ["results"]
    })
}

pub async fn search<G: Generator>(generator: &G, query: &str) -> Result<SearchOutput, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchOutput::default());
    }

    let raw = generator
        .generate_json(&search_prompt(query), &search_schema())
        .await?;
    let mut output: SearchOutput = decode_output(raw)?;

    // Anything outside the catalogue is a hallucinated link.
    let before = output.results.len();
    output
        .results
        .retain(|r| SECTIONS.iter().any(|(_, _, url)| *url == r.url));
    if output.results.len() < before {
        tracing::debug!(
            dropped = before - output.results.len(),
            "Discarded search results outside the section catalogue"
        );
    }
    Ok(output)
}

// ---------------------------------------------------------------------------
// Suggest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CityFile {
    india_mangroves: Vec<City>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Suggestion {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SuggestOutput {
    pub suggestions: Vec<Suggestion>,
}

/// Load the city list. A missing or malformed file yields an empty list.
pub fn load_cities(path: &Path) -> Vec<City> {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<CityFile>(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(file) => {
            tracing::info!(path = %path.display(), cities = file.india_mangroves.len(), "City list loaded");
            file.india_mangroves
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load city list");
            Vec::new()
        }
    }
}

/// Case-insensitive substring match over city names, first occurrence per
/// name wins, capped at five.
pub fn suggest(cities: &[City], query: &str) -> SuggestOutput {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SuggestOutput::default();
    }

    let mut seen = HashSet::new();
    let suggestions = cities
        .iter()
        .filter(|c| c.city.to_lowercase().contains(&needle))
        .filter(|c| seen.insert(c.city.as_str()))
        .take(MAX_SUGGESTIONS)
        .map(|c| Suggestion {
            city: c.city.clone(),
            latitude: c.latitude,
            longitude: c.longitude,
        })
        .collect();

    SuggestOutput { suggestions }
}

fn decode_output<T: serde::de::DeserializeOwned>(raw: Value) -> Result<T, AppError> {
    serde_json::from_value(raw)
        .map_err(|e| AppError::Generation(format!("model output has the wrong shape: {e}")))
}
