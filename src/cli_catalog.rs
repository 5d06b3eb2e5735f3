use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use catalog_browser::catalog_store::{CatalogStore, SeedData, SqliteCatalogStore};
use catalog_browser::config::DEFAULT_DB_PATH;
use cli_style::{
    get_styles, print_error, print_key_value, print_section_footer, print_section_header,
    print_success, print_warning,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version, about = "Maintenance commands for the catalog database")]
struct CliArgs {
    /// Path to the SQLite catalog database file.
    #[clap(long, global = true, default_value = DEFAULT_DB_PATH, value_parser = parse_path)]
    pub db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Creates the database if missing and migrates it to the latest schema.
    Migrate,

    /// Inserts the demo releases and artists, then rebuilds the search index.
    Seed,

    /// Rebuilds the search index from the releases, artists and their links.
    PopulateFts,

    /// Deletes the database file and recreates an empty one.
    Reset {
        /// Seed the recreated database with demo data.
        #[clap(long)]
        seed: bool,
    },

    /// Prints row counts for the catalog tables and the search index.
    Stats,
}

fn open_store(db_path: &Path) -> Result<SqliteCatalogStore> {
    SqliteCatalogStore::new(db_path, 1)
        .with_context(|| format!("Failed to open catalog database at {:?}", db_path))
}

fn seed_and_index(store: &SqliteCatalogStore) -> Result<()> {
    store.seed(&SeedData::demo())?;
    let indexed = store.rebuild_search_index()?;
    print_success(&format!("Seeded demo data and indexed {} rows", indexed));
    Ok(())
}

fn remove_database_files(db_path: &Path) -> Result<()> {
    let mut removed = false;
    for suffix in ["", "-wal", "-shm"] {
        let mut file_name = db_path.as_os_str().to_owned();
        file_name.push(suffix);
        let path = PathBuf::from(file_name);
        if path.exists() {
            std::fs::remove_file(&path).with_context(|| format!("Failed to delete {:?}", path))?;
            info!("Deleted {:?}", path);
            removed = true;
        }
    }
    if !removed {
        print_warning(&format!("Nothing to delete at {:?}", db_path));
    }
    Ok(())
}

fn print_stats(store: &SqliteCatalogStore) -> Result<()> {
    let counts = store.get_counts()?;
    print_section_header("Catalog");
    print_key_value("Database", &store.db_path().display().to_string());
    print_key_value("Releases", &counts.releases.to_string());
    print_key_value("Artists", &counts.artists.to_string());
    print_key_value("Indexed rows", &counts.indexed_releases.to_string());
    print_section_footer();
    if counts.indexed_releases == 0 && counts.releases > 0 {
        print_warning("Search index is empty, run `cli-catalog populate-fts`");
    }
    Ok(())
}

fn run(cli_args: CliArgs) -> Result<()> {
    let db_path = cli_args.db_path;
    match cli_args.command {
        Command::Migrate => {
            open_store(&db_path)?;
            print_success(&format!("Catalog database at {:?} is up to date", db_path));
        }
        Command::Seed => seed_and_index(&open_store(&db_path)?)?,
        Command::PopulateFts => {
            let indexed = open_store(&db_path)?.rebuild_search_index()?;
            print_success(&format!("Indexed {} rows", indexed));
        }
        Command::Reset { seed } => {
            remove_database_files(&db_path)?;
            let store = open_store(&db_path)?;
            print_success(&format!("Recreated empty catalog database at {:?}", db_path));
            if seed {
                seed_and_index(&store)?;
            }
        }
        Command::Stats => print_stats(&open_store(&db_path)?)?,
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .init();

    if let Err(err) = run(CliArgs::parse()) {
        print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
