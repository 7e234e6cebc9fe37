// src/common/dev_mode.rs
//! Development mode configuration
//! Lets requests without a session cookie act as a fixed local user

use std::env;
use tracing::warn;

use crate::auth::models::CurrentUser;

/// Shared with the seed data so a seeded database lights up in dev mode
pub const DEV_USER_ID: &str = "dev-student-0001";

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub user_name: String,
}

impl Default for DevModeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            user_email: "student@hackgenix.dev".to_string(),
            user_name: "Test Student".to_string(),
        }
    }
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let enabled = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        let user_email = env::var("DEV_USER_EMAIL").unwrap_or(defaults.user_email);
        let user_name = env::var("DEV_USER_NAME").unwrap_or(defaults.user_name);

        Self {
            enabled,
            user_email,
            user_name,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dev_user(&self) -> CurrentUser {
        CurrentUser {
            id: DEV_USER_ID.to_string(),
            email: Some(self.user_email.clone()),
        }
    }
}

pub fn log_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        warn!(
            dev_user = %config.user_email,
            "DEV MODE ENABLED - requests without a session act as the dev user. Do not use in production"
        );
    }
}

/// `--dev`/`--dev-mode` force dev mode on, `--prod`/`--production` force it off
pub fn parse_dev_mode_args<I>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = String>,
{
    let mut decision = None;
    for arg in args {
        match arg.as_str() {
            "--dev" | "--dev-mode" => decision = Some(true),
            "--no-dev" | "--prod" | "--production" => decision = Some(false),
            _ => {}
        }
    }
    decision
}

pub fn apply_cli_override(mut config: DevModeConfig) -> DevModeConfig {
    if let Some(cli_dev_mode) = parse_dev_mode_args(env::args().skip(1)) {
        config.enabled = cli_dev_mode;
    }
    config
}
