use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bus_server::config::ServerConfig;
use bus_server::store::MongoStore;
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bus_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Fail fast if the database is unreachable
    info!(database = %config.database, "connecting to MongoDB");
    let store = MongoStore::connect(&config.mongodb_uri, &config.database).await?;
    store.ping().await?;
    store.ensure_indexes().await?;

    let state = AppState::new(store, &config.cache, config.journey, config.nearby);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Bus Go Home listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
