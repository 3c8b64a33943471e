//! Rodas de Conversa API
//!
//! `serve` (the default) runs the HTTP API. `recompute-coordinates` re-geocodes
//! every active roda once and exits.

use axum_helpers::server::{create_production_app, health_router};
use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[derive(Parser)]
#[command(name = "rodas_api")]
#[command(about = "Rodas de Conversa HTTP API and maintenance commands")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve,

    /// Re-geocode every active roda and store the coordinates found
    RecomputeCoordinates {
        /// Pause between geocoding requests, in milliseconds
        #[arg(long, default_value_t = 200)]
        pause_ms: u64,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;

    let state = AppState::new(config, db)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(state).await,
        Commands::RecomputeCoordinates { pause_ms } => {
            recompute_coordinates(state, Duration::from_millis(pause_ms)).await
        }
    }
}

async fn serve(state: AppState) -> eyre::Result<()> {
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check with a database round-trip
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting rodas API with graceful shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Rodas API shutdown complete");
    Ok(())
}

async fn recompute_coordinates(state: AppState, pause: Duration) -> eyre::Result<()> {
    info!(pause_ms = pause.as_millis() as u64, "Recomputing coordinates of active rodas");

    let report = state
        .roda_service()
        .recompute_coordinates(pause)
        .await
        .map_err(|e| eyre::eyre!("Coordinate recomputation failed: {}", e))?;

    println!("Coordenadas atualizadas: {}", report.updated);
    println!("Sem resultado: {}", report.not_found);

    state.db.close().await?;
    Ok(())
}
