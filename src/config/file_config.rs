use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings read from the optional TOML file. Every field overrides the
/// matching CLI flag when present.
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub static_dir: Option<String>,

    // Listing settings
    pub default_page_size: Option<i64>,
    pub query_timeout_ms: Option<u64>,
    pub read_pool_size: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9000\ndefault_page_size = 25\nlogging_level = \"none\"").unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.default_page_size, Some(25));
        assert_eq!(config.logging_level.as_deref(), Some("none"));
        assert!(config.db_path.is_none());
        assert!(config.query_timeout_ms.is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "metrics_port = 9091").unwrap();

        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = FileConfig::load(Path::new("/nonexistent/catalog-browser.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
