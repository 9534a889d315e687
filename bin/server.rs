// Fleet Registry - Web Server
// REST API with Axum over the SQLite ship store

use anyhow::{Context, Result};
use fleet_registry::config::{self, Config};
use fleet_registry::{create_router, open_database, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    config::init_tracing(&config.log_filter);

    tracing::info!("Starting fleet registry server...");
    tracing::info!("  FLEET_DB: {}", config.db_path.display());
    tracing::info!("  ADDR:     {}", config.addr);

    let conn = open_database(&config.db_path)?;
    tracing::info!("Database opened: {}", config.db_path.display());

    let app = create_router(AppState::new(conn));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;
    tracing::info!("Server listening on http://{}/rest/ships", config.addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
