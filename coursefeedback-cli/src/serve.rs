use std::process;

use tracing::{error, info, warn};

use crate::server::app;
use crate::server::config::{FeedbackConfig, StorageBackend};
use crate::server::state::AppState;

/// Command-line overrides for `feedback serve`.
#[derive(Debug, Default)]
pub struct ServeArgs {
    pub port: Option<u16>,
    pub hostname: Option<String>,
    pub data_file: Option<String>,
    pub storage: Option<StorageBackend>,
    pub validation: Option<coursefeedback_lib::Validation>,
    pub config_path: String,
}

/// Resolve configuration: CLI args override env vars, which override the
/// config file, which overrides defaults.
pub fn resolve_config(args: ServeArgs) -> FeedbackConfig {
    let mut config = FeedbackConfig::load(&args.config_path);
    config.apply_env_overrides();

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(hostname) = args.hostname {
        config.server.hostname = hostname;
    }
    if let Some(data_file) = args.data_file {
        config.storage.data_file = data_file;
    }
    if let Some(storage) = args.storage {
        config.storage.backend = storage;
    }
    if let Some(validation) = args.validation {
        config.validation.mode = validation;
    }
    config
}

pub async fn run_serve(args: ServeArgs) {
    let config = resolve_config(args);
    let addr = format!("{}:{}", config.server.hostname, config.server.port);
    let state = AppState::from_config(config);

    // a failure here is not fatal: the first write recreates the file
    if let Err(e) = state.repository.store().ensure_store().await {
        warn!("could not prepare feedback store: {}", e);
    }

    match state.config.storage.backend {
        StorageBackend::File => info!(
            path = %state.config.storage.data_file,
            validation = ?state.repository.validation(),
            "using JSON file storage"
        ),
        StorageBackend::Memory => info!(
            validation = ?state.repository.validation(),
            "using in-memory storage, feedback will not survive a restart"
        ),
    }

    let router = app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!("failed to bind to {}: {}", addr, e);
            process::exit(1);
        });
    info!("serving feedback API on http://{}", addr);
    info!("health check at http://{}/api/health", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            error!("server error: {}", e);
            process::exit(1);
        });

    info!("server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("failed to install SIGTERM handler");

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = sigterm.recv() => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await.ok();

    info!("shutdown signal received, finishing in-flight requests...");
}
