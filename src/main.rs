use std::net::SocketAddr;

use anyhow::Context;
use coastalwatch::config::AppConfig;
use coastalwatch::services::seed::{self, SeedOutcome};
use coastalwatch::{db, routes, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coastalwatch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to the database")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    match seed::seed_initial_data(&pool).await {
        Ok(SeedOutcome::Seeded { alerts, reports }) => {
            tracing::info!(alerts, reports, "Initial dashboard data seeded");
        }
        Ok(SeedOutcome::AlreadyPresent) => {}
        Err(e) => tracing::warn!(error = %e, "Seeding dashboard data failed, continuing"),
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid BACKEND_HOST/BACKEND_PORT")?;
    let tls = config
        .tls_paths()
        .map(|(cert, key)| (cert.clone(), key.clone()));

    let state = AppState::new(pool, config).context("Failed to build the generative client")?;
    let app = routes::router(state);

    match tls {
        Some((cert, key)) => {
            let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert, &key)
                .await
                .context("Failed to load TLS certificate or key")?;
            tracing::info!(host = %addr, "Starting CoastalWatch API server (TLS)");
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!(host = %addr, "Starting CoastalWatch API server");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
