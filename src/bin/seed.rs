//! Seed script for development: populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{Duration, Utc};
use coastalwatch::db::{self, documents};
use coastalwatch::models::monitoring::CreateMonitoringRecord;
use coastalwatch::models::project::CreateProject;
use coastalwatch::services::seed::{self, SeedOutcome};
use coastalwatch::services::{monitoring, project};
use serde_json::json;
use sqlx::PgPool;

const ORGANIZATION_ID: &str = "org-demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = db::create_pool(&db_url, 5).await?;
    db::run_migrations(&pool).await?;

    println!("=== CoastalWatch Seed Script ===");

    match seed::seed_initial_data(&pool).await? {
        SeedOutcome::Seeded { alerts, reports } => {
            println!("[done] Dashboard feed: {alerts} alerts, {reports} reports");
        }
        SeedOutcome::AlreadyPresent => println!("[skip] Dashboard feed already present"),
    }

    seed_projects(&pool).await?;

    println!("\n=== Seed complete! ===");
    println!("Dashboard: GET /api/analytics/dashboard?organizationId={ORGANIZATION_ID}");

    Ok(())
}

async fn seed_projects(pool: &PgPool) -> anyhow::Result<()> {
    if !documents::is_empty(pool, documents::PROJECTS).await? {
        println!("[skip] Projects already exist");
        return Ok(());
    }

    let sites = [
        ("Sundarbans Restoration", "mangrove", "active", 21.95, 89.18, "West Bengal, India", 1250.0, 480.0),
        ("Pichavaram Mangrove Belt", "mangrove", "monitoring", 11.43, 79.78, "Tamil Nadu, India", 310.0, 95.0),
        ("Gulf of Mannar Seagrass", "seagrass", "planning", 9.12, 79.45, "Tamil Nadu, India", 540.0, 60.0),
        ("Chilika Saltmarsh Pilot", "saltmarsh", "active", 19.72, 85.32, "Odisha, India", 85.0, 22.0),
    ];

    let mut created = Vec::new();
    for (name, ecosystem, status, lat, lon, address, area, carbon) in sites {
        let input: CreateProject = serde_json::from_value(json!({
            "name": name,
            "description": format!("Blue carbon site: {name}"),
            "location": {
                "latitude": lat,
                "longitude": lon,
                "address": address,
                "country": "India"
            },
            "ecosystemType": ecosystem,
            "area": area,
            "carbonStock": carbon,
            "sequestrationRate": carbon / 40.0,
            "status": status,
            "startDate": "2024-01-15",
            "organizationId": ORGANIZATION_ID,
            "managerId": "manager-demo"
        }))?;
        created.push(project::create(pool, &input).await?);
    }
    println!("[done] Created {} sample projects", created.len());

    let now = Utc::now();
    let mut records = 0;
    for site in &created {
        for weeks_ago in 0..6i64 {
            let taken = now - Duration::weeks(weeks_ago * 3);
            let input: CreateMonitoringRecord = serde_json::from_value(json!({
                "projectId": site.id,
                "timestamp": taken.to_rfc3339(),
                "collectedBy": "field-team",
                "coordinates": {
                    "latitude": site.location.latitude,
                    "longitude": site.location.longitude
                },
                "measurements": {
                    "carbonStock": site.carbon_stock / site.area * (1.0 + weeks_ago as f64 / 20.0),
                    "waterQuality": {
                        "ph": 7.6,
                        "salinity": 28.0,
                        "temperature": 27.5,
                        "dissolvedOxygen": 6.2
                    }
                },
                "notes": "Routine transect survey"
            }))?;
            monitoring::create(pool, &input).await?;
            records += 1;
        }
    }
    println!("[done] Created {records} monitoring records");

    Ok(())
}
