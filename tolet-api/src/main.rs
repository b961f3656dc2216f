//! # To-Let API Server
//!
//! HTTP API for the rental marketplace: listing search, accounts, listing
//! creation with images, inquiries and site statistics.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Open the SQLite pool and apply migrations
//! 3. Seed sample listings into an empty store, if enabled
//! 4. Serve until Ctrl+C
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p tolet-api
//! ```

use std::sync::Arc;
use tolet_api::{
    app::{build_router, AppState},
    config::Config,
    uploads::DiskImageStore,
};
use tolet_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
    seed::seed_sample_listings,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tolet_api=debug,tolet_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("To-Let API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    if config.seed_sample_data {
        let inserted = seed_sample_listings(&pool).await?;
        if inserted > 0 {
            tracing::info!(inserted, "Seeded sample listings");
        }
    }

    let images = DiskImageStore::new(config.uploads.dir.clone());
    images.ensure_dir().await?;
    tracing::info!(dir = %images.dir().display(), "Serving uploads");

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config, Arc::new(images));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
