use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::core::Result;

/// Runtime options.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Serve and store select results through the result cache.
    #[serde(default = "default_true")]
    pub cache_results: bool,
    /// Collapse single-value and `LIMIT 1` results.
    #[serde(default = "default_true")]
    pub magic: bool,
    /// Storage engine for `CREATE TABLE` when the definition names none.
    #[serde(default = "default_engine")]
    pub default_engine: String,
}

const fn default_true() -> bool { true }
fn default_engine() -> String { "InnoDB".to_string() }

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_results: default_true(),
            magic: default_true(),
            default_engine: default_engine(),
        }
    }
}

impl Settings {
    /// Load settings with priority: ENV > config file > defaults
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        // 1. First config file found wins
        if let Some(path) = Self::config_paths().into_iter().find(|p| p.exists()) {
            tracing::debug!(path = %path.display(), "loading settings");
            builder = builder.add_source(File::from(path));
        }

        // 2. Override with environment variables (TINYDB_*)
        builder = builder.add_source(Environment::with_prefix("TINYDB").try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Load settings from one specific file, defaults filling the gaps.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/tinydb/tinydb.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("tinydb").join("tinydb.toml"));
        }
        paths.push(PathBuf::from("./tinydb.toml"));
        paths
    }
}
