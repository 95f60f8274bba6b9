use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watchlist_core::{
    load_config, validate_config, CatalogBackend, CollectionService, Config, ExternalCatalog,
    JsonFileStore, MovieStore, OmdbClient,
};
use watchlist_server::api::create_router;
use watchlist_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("WATCHLIST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        "watchlist {} starting (config {})",
        VERSION,
        &config_hash[..16]
    );
    info!("Collection file: {:?}", config.store.path);

    let store: Arc<dyn MovieStore> = Arc::new(JsonFileStore::new(&config.store.path));

    // Fail early on an unreadable or corrupt collection instead of on first request
    let existing = store
        .load()
        .with_context(|| format!("Failed to open collection {:?}", config.store.path))?;
    info!("Collection holds {} movies", existing.len());

    let mut service = CollectionService::new(store);
    match create_catalog(&config)? {
        Some(catalog) => service = service.with_catalog(catalog),
        None => warn!("No movie catalog configured, search and add are disabled"),
    }

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), Arc::new(service)));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Build the configured catalog client, if any.
fn create_catalog(config: &Config) -> Result<Option<Arc<dyn ExternalCatalog>>> {
    let Some(catalog_config) = &config.catalog else {
        return Ok(None);
    };

    match catalog_config.backend {
        CatalogBackend::Omdb => {
            let omdb_config = catalog_config
                .omdb
                .as_ref()
                .context("omdb backend selected but no [catalog.omdb] section provided")?;
            let client = OmdbClient::new(omdb_config).context("Failed to create OMDb client")?;
            info!(
                "Initializing OMDb catalog (timeout {}s, {} results per search)",
                omdb_config.timeout_secs, omdb_config.search_limit
            );
            Ok(Some(Arc::new(client)))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
