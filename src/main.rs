//! Visa Readiness Service — Binary Entrypoint
//! Boots the Axum HTTP server: loads the static reference data, builds the
//! engine, wires routes and metrics.
//!
//! See `README.md` for quickstart and `config/` for the reference data.

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use visa_readiness_engine::api::{self, AppState};
use visa_readiness_engine::catalog::VisaCatalog;
use visa_readiness_engine::eligibility::Engine;
use visa_readiness_engine::metrics::Metrics;
use visa_readiness_engine::professions::ProfessionMatcher;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments. This enables
    // VISA_CATALOG_PATH / PROFESSIONS_CONFIG_PATH / PORT from .env.
    let _ = dotenvy::dotenv();

    init_tracing();

    // Reference data must be fully constructed before the first evaluation.
    let catalog = VisaCatalog::load()?;
    let matcher = ProfessionMatcher::load();
    info!(visas = catalog.len(), "visa catalog loaded");

    let metrics = Metrics::init(catalog.len());

    let state = AppState::new(Engine::new(catalog, matcher));
    let app = api::router(state).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "visa readiness service listening");

    axum::serve(listener, app).await?;
    Ok(())
}
