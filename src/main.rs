// Main entry point for Content Vault

use content_vault::api::{create_router, AppState};
use content_vault::config::{Config, StoreBackend};
use content_vault::core::password::CredentialHasher;
use content_vault::store::memory::MemoryStore;
use content_vault::store::postgres::PgStore;
use content_vault::store::{ContentRepository, UserRepository};

use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber with config values
    init_tracing(&config)?;

    info!("Starting Content Vault");
    info!(
        bind_address = %config.bind_address,
        port = config.port,
        "Configuration loaded"
    );

    // 3. Initialize the store selected by DATABASE_URL
    let (users, content): (Arc<dyn UserRepository>, Arc<dyn ContentRepository>) =
        match config.store_backend()? {
            StoreBackend::Postgres => {
                let store = Arc::new(
                    PgStore::connect(&config.database_url, config.database_max_connections)
                        .await
                        .context("Failed to connect to database")?,
                );
                store
                    .ensure_schema()
                    .await
                    .context("Failed to prepare database schema")?;
                info!("PostgreSQL store initialized");
                let users: Arc<dyn UserRepository> = store.clone();
                let content: Arc<dyn ContentRepository> = store;
                (users, content)
            }
            StoreBackend::Memory => {
                warn!("Using in-memory store; data is lost on shutdown");
                let store = Arc::new(MemoryStore::new());
                let users: Arc<dyn UserRepository> = store.clone();
                let content: Arc<dyn ContentRepository> = store;
                (users, content)
            }
        };

    // 4. Build application state (token service, hasher, metrics)
    let addr = format!("{}:{}", config.bind_address, config.port);
    let app_state = AppState::new(config, users, content, CredentialHasher::new())
        .context("Failed to build application state")?;

    // 5. Create router
    let router = create_router(app_state);
    info!("Router created");

    // 6. Start HTTP server
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "Failed to bind to address");
        e
    })?;

    info!(addr = %addr, "Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "Server error");
            e
        })?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber based on configuration
///
/// `RUST_LOG` takes precedence over `LOG_LEVEL` when set.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_env_filter(filter);

    let result = if config.log_format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}
