mod file_config;

pub use file_config::FileConfig;

use crate::releases::{PaginationSettings, DEFAULT_PAGE_SIZE};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "data.db";
pub const DEFAULT_PORT: u16 = 8086;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub static_dir: Option<PathBuf>,
    pub default_page_size: i64,
    pub query_timeout_ms: u64,
    pub read_pool_size: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            db_path: None,
            port: DEFAULT_PORT,
            logging_level: RequestsLoggingLevel::default(),
            static_dir: None,
            default_page_size: DEFAULT_PAGE_SIZE,
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            read_pool_size: DEFAULT_READ_POOL_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub static_dir: Option<PathBuf>,

    // Listing settings
    pub default_page_size: i64,
    pub query_timeout_ms: u64,
    pub read_pool_size: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
        if db_path.is_dir() {
            bail!("db_path points to a directory: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {:?}", s),
            },
            None => cli.logging_level.clone(),
        };

        let static_dir = file
            .static_dir
            .map(PathBuf::from)
            .or_else(|| cli.static_dir.clone());
        if let Some(dir) = &static_dir {
            if !dir.is_dir() {
                bail!("static_dir is not a directory: {:?}", dir);
            }
        }

        let default_page_size = file.default_page_size.unwrap_or(cli.default_page_size);
        if default_page_size <= 0 {
            bail!(
                "default_page_size must be positive, got {}",
                default_page_size
            );
        }

        let query_timeout_ms = file.query_timeout_ms.unwrap_or(cli.query_timeout_ms);
        if query_timeout_ms == 0 {
            bail!("query_timeout_ms must be positive");
        }

        let read_pool_size = file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be positive");
        }

        Ok(Self {
            db_path,
            port,
            logging_level,
            static_dir,
            default_page_size,
            query_timeout_ms,
            read_pool_size,
        })
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn pagination_settings(&self) -> PaginationSettings {
        PaginationSettings {
            default_page_size: self.default_page_size,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
