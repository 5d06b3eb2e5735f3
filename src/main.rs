use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_browser::catalog_store::{CatalogStore, SqliteCatalogStore};
use catalog_browser::config::{self, AppConfig, CliConfig, FileConfig};
use catalog_browser::server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite catalog database file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory served under /static.
    #[clap(long, value_parser = parse_path)]
    pub static_dir: Option<PathBuf>,

    /// Rows per page when the request does not ask for a page size.
    #[clap(long, default_value_t = catalog_browser::releases::DEFAULT_PAGE_SIZE)]
    pub default_page_size: i64,

    /// Deadline for a single catalog query, in milliseconds.
    #[clap(long, default_value_t = config::DEFAULT_QUERY_TIMEOUT_MS)]
    pub query_timeout_ms: u64,

    /// Number of read-only database connections.
    #[clap(long, default_value_t = config::DEFAULT_READ_POOL_SIZE)]
    pub read_pool_size: usize,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            static_dir: self.static_dir.clone(),
            default_page_size: self.default_page_size,
            query_timeout_ms: self.query_timeout_ms,
            read_pool_size: self.read_pool_size,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening SQLite catalog database at {:?}...", app_config.db_path);
    let catalog_store = Arc::new(SqliteCatalogStore::new(
        &app_config.db_path,
        app_config.read_pool_size,
    )?);

    let counts = catalog_store.get_counts()?;
    info!(
        "Catalog has {} releases, {} artists, {} indexed rows",
        counts.releases, counts.artists, counts.indexed_releases
    );
    if counts.indexed_releases == 0 && counts.releases > 0 {
        tracing::warn!("Search index is empty, run `cli-catalog populate-fts` to build it");
    }

    info!("Ready to serve at port {}!", app_config.port);
    run_server(ServerConfig::from(&app_config), catalog_store).await
}
