//! Bookstore - Catalog Service
//!
//! Serves the book, author, user and review catalog as read-only JSON over HTTP.

use catalog::{AppState, Config, Database};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    info!(
        database = config.database_url.as_str(),
        bind_address = config.bind_address.as_str(),
        "Starting bookstore catalog"
    );

    let db = Database::new(&config.database_url).await?;
    let app = catalog::routes().with_state(AppState::new(db.clone()));

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install CTRL+C handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, terminating...");
}
