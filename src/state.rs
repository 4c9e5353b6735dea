use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Shared by every handler: configuration, database pools and one outbound HTTP client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseManager,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db = DatabaseManager::connect_lazy(&config.database)?;
        Self::with_database(config, db)
    }

    pub fn with_database(config: AppConfig, db: DatabaseManager) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            db,
            http,
        })
    }
}
