// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::session::SessionService;
use crate::common::dev_mode::DevModeConfig;
use crate::services::{AssistantService, IdentityProvider};

/// Process-wide handles, built once in `main` and injected into every request
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub cookie_secure: bool,
    pub dev_mode: DevModeConfig,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: SessionService,
    pub assistant: AssistantService,
}

pub type SharedState = Arc<RwLock<AppState>>;
