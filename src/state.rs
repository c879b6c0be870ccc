use crate::config::AppConfig;
use crate::db::Database;

pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            db: Database::new(config.database_url.clone()),
            config,
        }
    }
}
