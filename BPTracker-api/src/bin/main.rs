use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use bp_tracker_api::api::handlers::{health, readings};
use bp_tracker_api::api::create_router;
use bp_tracker_api::config::ApiConfig;
use bp_tracker_domain::database;

/// Entry point for the BPTracker API server
///
/// Loads `.env`, installs logging, opens storage, restores the backup file
/// into an empty store and serves until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv().is_ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    if !dotenv_loaded {
        info!(".env file not found, using process environment");
    }

    info!("Starting BPTracker API server");

    let config = ApiConfig::from_env().context("invalid server configuration")?;

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create data directory {}", config.data_dir.display()))?;

    if std::env::var("DB_SQLITE_PATH").is_err() {
        std::env::set_var("DB_SQLITE_PATH", config.sqlite_path());
    }

    match database::initialize_database_pool() {
        Ok(()) => match database::get_connection_info() {
            Some(info) => info!("Storage: {}", info),
            None => info!("Storage: in-memory"),
        },
        Err(e) => {
            // Keep serving from memory rather than refusing to start
            error!("Failed to initialize database pool: {}", e);
            warn!("Falling back to in-memory storage; readings will not survive a restart");
        }
    }

    let service = readings::create_service(config.backup_path.clone());
    match service.restore_backup().await {
        Ok(0) => {}
        Ok(count) => info!("Restored {} readings from backup", count),
        Err(e) => error!("Failed to restore backup: {}", e),
    }

    health::initialize_server_start_time();

    let app = create_router(service, health::create_health_service(), config.enable_cors);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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

    info!("Shutting down server...");
}
