use super::RequestsLoggingLevel;
use crate::config::AppConfig;
use crate::releases::PaginationSettings;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Served under `/static` when set.
    pub static_dir: Option<PathBuf>,
    pub pagination: PaginationSettings,
    pub query_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: crate::config::DEFAULT_PORT,
            static_dir: None,
            pagination: PaginationSettings::default(),
            query_timeout: Duration::from_millis(crate::config::DEFAULT_QUERY_TIMEOUT_MS),
        }
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
            static_dir: config.static_dir.clone(),
            pagination: config.pagination_settings(),
            query_timeout: config.query_timeout(),
        }
    }
}
