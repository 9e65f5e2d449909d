use chrono::Duration;
use sqlx::SqlitePool;

use crate::config::AppConfig;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &AppConfig) -> Self {
        Self {
            db,
            session_ttl: Duration::hours(config.session_ttl_hours),
            cookie_secure: config.cookie_secure,
        }
    }
}
