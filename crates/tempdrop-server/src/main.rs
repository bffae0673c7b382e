//! Tempdrop - short-lived file and text sharing
//!
//! Serves the upload/retrieve API and purges expired files on a timer.

use std::sync::Arc;
use tempdrop_server::error::Result;
use tempdrop_server::store::{FileStore, MemoryFileStore, PgFileStore};
use tempdrop_server::{create_app, shutdown_signal, start_server, sweep, AppState, Config};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("tempdrop_server=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting tempdrop server...");

    let config = Config::from_env();
    info!("Port: {}", config.port);

    let store: Arc<dyn FileStore> = match &config.database_url {
        Some(url) => {
            let store =
                PgFileStore::connect(url, config.db_max_connections, config.request_timeout)
                    .await?;
            store.migrate().await?;
            Arc::new(store)
        }
        None => {
            warn!("DATABASE_URL not set, files are kept in memory only");
            Arc::new(MemoryFileStore::new())
        }
    };

    let sweeper = sweep::spawn(store.clone(), config.sweep_interval);

    let state = AppState::new(store.clone(), &config);
    let app = create_app(state, &config);
    let served = start_server(app, config.port, shutdown_signal()).await;

    sweeper.shutdown().await;
    store.close().await;
    info!("Shutdown complete");

    served?;
    Ok(())
}
