//! HTTP server initialization and runtime setup.
//!
//! Handles settings storage selection, service wiring and the Axum server lifecycle.

use crate::application::services::{AuthService, RedirectService, SettingsService};
use crate::config::Config;
use crate::domain::engine::RedirectEngine;
use crate::domain::repositories::SettingsRepository;
use crate::infrastructure::persistence::{InMemorySettingsRepository, JsonFileSettingsRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Settings repository (JSON file or in-memory)
/// - Settings and redirect services
/// - Admin token authentication, when configured
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - The settings file exists but cannot be read
/// - Configuration values cannot be turned into runtime options
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = settings_repository(&config).await?;
    tracing::info!("Settings store: {}", repository.describe());

    let settings_service = Arc::new(SettingsService::new(repository));
    let engine = RedirectEngine::new(config.parsed_site_url()?);
    let redirect_service = Arc::new(RedirectService::new(settings_service.clone(), engine));

    let state = AppState::new(settings_service, redirect_service, config.site_options()?);

    let auth = config.admin_token.as_deref().map(|token| {
        tracing::info!("Admin API enabled at /api");
        Arc::new(AuthService::new(token))
    });
    if auth.is_none() {
        tracing::warn!("ADMIN_TOKEN not set, admin API disabled");
    }

    let app = app_router(state, &config.site_root, auth);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn settings_repository(config: &Config) -> Result<Arc<dyn SettingsRepository>> {
    match config.settings_path {
        Some(ref path) => {
            let repository = JsonFileSettingsRepository::open(path)
                .await
                .with_context(|| format!("Failed to open settings file {}", path.display()))?;
            Ok(Arc::new(repository))
        }
        None => {
            tracing::warn!("SETTINGS_PATH not set, settings are kept in memory only");
            Ok(Arc::new(InMemorySettingsRepository::default()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
