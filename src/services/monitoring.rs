// src/services/monitoring.rs
//! Optional Sentry error reporting, enabled by `SENTRY_DSN`

use std::env;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct MonitoringConfig {
    pub sentry_dsn: Option<String>,
    pub environment: String,
}

impl MonitoringConfig {
    pub fn from_env() -> Self {
        Self {
            sentry_dsn: env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.trim().is_empty()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }
}

/// Initializes Sentry when a DSN is configured. The returned guard must be
/// held for the life of the process so queued events are flushed on exit.
pub fn init_error_tracking(config: &MonitoringConfig) -> Option<sentry::ClientInitGuard> {
    let Some(dsn) = &config.sentry_dsn else {
        info!("Sentry DSN not configured, error tracking disabled");
        return None;
    };

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.clone().into()),
            ..Default::default()
        },
    ));

    info!(environment = %config.environment, "Sentry initialized");
    Some(guard)
}
