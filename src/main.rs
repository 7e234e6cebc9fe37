// src/main.rs
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod app;
mod auth;
mod chat;
mod common;
mod logging_middleware;
mod pages;
mod services;
mod todos;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::session::SessionService;
use common::config::AppConfig;
use common::dev_mode::{apply_cli_override, log_dev_mode_status, DevModeConfig};
use common::seed::{ensure_dev_user, seed_mock_data, seed_requested};
use common::AppState;
use services::monitoring::{init_error_tracking, MonitoringConfig};
use services::{AssistantService, FirebaseIdentityProvider};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let dev_mode = apply_cli_override(DevModeConfig::from_env());
    log_dev_mode_status(&dev_mode);

    let _sentry = init_error_tracking(&MonitoringConfig::from_env());

    let config = AppConfig::from_env(dev_mode.is_enabled())?;
    info!(
        database = %config.database_url,
        assistant = %config.assistant_url,
        firebase_project = %config.firebase_project_id,
        "Configuration loaded"
    );

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    if seed_requested(std::env::args().skip(1)) {
        let inserted = seed_mock_data(&pool, &dev_mode).await?;
        info!(inserted, user = %dev_mode.user_email, "Seeding finished");
        return Ok(());
    }

    if dev_mode.is_enabled() {
        ensure_dev_user(&pool, &dev_mode).await?;
    }

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let identity = Arc::new(FirebaseIdentityProvider::new(
        config.firebase_project_id.clone(),
        http_client.clone(),
    ));
    info!("FirebaseIdentityProvider initialized");

    let sessions = SessionService::new(pool.clone(), config.session_secret.clone());
    sessions
        .clone()
        .start_cleanup_task(config.session_sweep_interval);
    info!(
        every_secs = config.session_sweep_interval.as_secs(),
        "Session cleanup task started"
    );

    let assistant = AssistantService::new(config.assistant_url.clone(), http_client);
    info!("AssistantService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        cookie_secure: config.cookie_secure,
        dev_mode,
        identity,
        sessions,
        assistant,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = app::build_router(shared, &config.cors_origins);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
