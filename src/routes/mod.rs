//! Route definitions for the CoastalWatch API.

pub mod alerts;
pub mod analytics;
pub mod carbon_credits;
pub mod dashboard;
pub mod extract;
pub mod flows;
pub mod health;
pub mod monitoring;
pub mod projects;
pub mod upload;
pub mod weather;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Multipart framing overhead allowed on top of the file size limit.
const UPLOAD_SLACK_BYTES: usize = 1024 * 1024;

fn cors(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(frontend_url, "FRONTEND_URL is not a valid origin, allowing any");
            layer.allow_origin(Any)
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + UPLOAD_SLACK_BYTES;

    let project_routes = Router::new()
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        );

    let monitoring_routes = Router::new()
        .route("/monitoring", post(monitoring::create))
        .route("/monitoring/{project_id}", get(monitoring::list_for_project));

    let feed_routes = Router::new()
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/alerts", get(alerts::list).post(alerts::create))
        .route(
            "/carbon-credits",
            get(carbon_credits::list).post(carbon_credits::create),
        )
        .route("/dashboard/alerts", get(dashboard::alerts))
        .route("/dashboard/reports", get(dashboard::reports))
        .route("/weather", get(weather::current));

    let upload_routes = Router::new()
        .route("/upload", post(upload::upload_file))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit));

    let flow_routes = Router::new()
        .route("/flows/visualize", post(flows::visualize))
        .route("/flows/search", post(flows::search))
        .route("/flows/suggest", post(flows::suggest));

    let mut app = Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", project_routes)
        .nest("/api", monitoring_routes)
        .nest("/api", feed_routes)
        .nest("/api", upload_routes)
        .nest("/api", flow_routes);

    // Uploaded files are only served locally when the public base is a path.
    let files_path = state.config.upload_public_base_url.trim_end_matches('/');
    if files_path.starts_with('/') && files_path.len() > 1 {
        app = app.nest_service(files_path, ServeDir::new(&state.config.upload_dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors(&state.config.frontend_url))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;

    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::AppConfig;

    const BOUNDARY: &str = "coastalwatch-test-boundary";

    /// Router over a pool whose database is unreachable; acquiring gives up after a second.
    fn app_with(config: AppConfig) -> Router {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy(&config.database_url)
            .unwrap();
        router(AppState::new(pool, config).unwrap())
    }

    fn app() -> Router {
        app_with(AppConfig::for_tests("postgres://localhost:1/unused"))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file {
                Some((filename, content_type)) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn liveness_answers_ok() {
        let response = app()
            .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_reports_unreachable_database_as_failure() {
        let response = app()
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["status"], "degraded");
        assert_eq!(body["data"]["database"], "unreachable");
    }

    #[tokio::test]
    async fn dashboard_database_failure_uses_public_message() {
        let response = app()
            .oneshot(
                Request::get("/api/analytics/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "error": "Failed to fetch dashboard data" })
        );
    }

    #[tokio::test]
    async fn unknown_ecosystem_type_is_rejected_in_envelope() {
        let response = app()
            .oneshot(post_json(
                "/api/projects",
                json!({
                    "name": "Reef watch",
                    "location": { "latitude": 9.9, "longitude": 76.2, "address": "Kochi", "country": "India" },
                    "ecosystemType": "coral",
                    "area": 12.5,
                    "organizationId": "org-1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("ecosystemType"));
    }

    #[tokio::test]
    async fn malformed_json_body_is_rejected_in_envelope() {
        let response = app()
            .oneshot(
                Request::post("/api/alerts")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"projectId\": "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn non_numeric_limit_is_rejected_in_envelope() {
        let response = app()
            .oneshot(
                Request::get("/api/monitoring/p1?limit=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to deserialize query string"));
    }

    #[tokio::test]
    async fn weather_requires_both_coordinates() {
        let response = app()
            .oneshot(Request::get("/api/weather?lat=12.9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Latitude and longitude are required");
    }

    #[tokio::test]
    async fn weather_returns_week_forecast() {
        let response = app()
            .oneshot(
                Request::get("/api/weather?lat=12.9&lon=80.2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["location"]["latitude"], 12.9);
        assert_eq!(body["data"]["forecast"]["daily"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn suggest_uses_bundled_cities() {
        let response = app()
            .oneshot(post_json("/api/flows/suggest", json!({ "query": "koch" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let suggestions = body["data"]["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0]["city"], "Kochi");
        assert!(suggestions[0]["latitude"].is_number());
    }

    #[tokio::test]
    async fn blank_search_returns_no_results() {
        let response = app()
            .oneshot(post_json("/api/flows/search", json!({ "query": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["results"], json!([]));
    }

    #[tokio::test]
    async fn visualize_rejects_blank_input() {
        let response = app()
            .oneshot(post_json(
                "/api/flows/visualize",
                json!({ "dataType": "", "dataValues": "[]", "visualizationType": "table" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid input. Please check all fields.");
    }

    #[tokio::test]
    async fn visualize_without_model_access_hides_cause() {
        let response = app()
            .oneshot(post_json(
                "/api/flows/visualize",
                json!({
                    "dataType": "blue carbon levels",
                    "dataValues": "[120, 135, 150]",
                    "visualizationType": "bar chart"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "AI failed to generate a visualization. Please try again."
        );
    }

    #[tokio::test]
    async fn upload_without_file_is_rejected() {
        let response = app()
            .oneshot(multipart(&[("projectId", None, &b"p1"[..])]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "File and project ID are required");
    }

    #[tokio::test]
    async fn upload_rejects_wrong_type_for_kind() {
        let response = app()
            .oneshot(multipart(&[
                ("projectId", None, &b"p1"[..]),
                ("type", None, &b"image"[..]),
                ("file", Some(("notes.pdf", "application/pdf")), &b"%PDF-1.4"[..]),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid file type for image");
    }

    #[tokio::test]
    async fn uploaded_file_is_served_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::for_tests("postgres://localhost:1/unused");
        config.upload_dir = dir.path().to_path_buf();
        let app = app_with(config);

        let response = app
            .clone()
            .oneshot(multipart(&[
                ("projectId", None, &b"mangrove-1"[..]),
                ("type", None, &b"image"[..]),
                ("file", Some(("reef.png", "image/png")), &b"\x89PNG"[..]),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let url = body["data"]["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/files/projects/mangrove-1/image/"));
        assert_eq!(body["data"]["size"], 4);

        let fetched = app
            .oneshot(Request::get(url.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        let bytes = to_bytes(fetched.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], &b"\x89PNG"[..]);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = app()
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
