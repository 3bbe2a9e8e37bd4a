//! Global calgrid configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CATEGORY, DEFAULT_COLOR, DEFAULT_CONFLICT_MINUTES, DEFAULT_MAX_OCCURRENCES,
    DEFAULT_UPCOMING_COUNT,
};
use crate::error::{CalGridError, CalGridResult};
use crate::store::JsonFileStore;

static DEFAULT_STORE_PATH: &str = "~/calendar/events.json";

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_max_occurrences() -> usize {
    DEFAULT_MAX_OCCURRENCES
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_conflict_minutes() -> i64 {
    DEFAULT_CONFLICT_MINUTES
}

fn default_upcoming_count() -> usize {
    DEFAULT_UPCOMING_COUNT
}

/// Global configuration at ~/.config/calgrid/config.toml
///
/// Every key may also be set through a `CALGRID_<KEY>` environment variable,
/// which takes precedence over the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalgridConfig {
    /// Where the event store lives. `~` is expanded.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Cap on occurrences generated per event per query.
    #[serde(default = "default_max_occurrences")]
    pub max_occurrences: usize,

    #[serde(default = "default_category")]
    pub default_category: String,

    #[serde(default = "default_color")]
    pub default_color: String,

    #[serde(default = "default_conflict_minutes")]
    pub conflict_minutes: i64,

    #[serde(default = "default_upcoming_count")]
    pub upcoming_count: usize,
}

impl Default for CalgridConfig {
    fn default() -> Self {
        CalgridConfig {
            store_path: default_store_path(),
            max_occurrences: default_max_occurrences(),
            default_category: default_category(),
            default_color: default_color(),
            conflict_minutes: default_conflict_minutes(),
            upcoming_count: default_upcoming_count(),
        }
    }
}

impl CalgridConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first run.
    pub fn load() -> CalGridResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::build(&config_path, true)
    }

    /// Load from a specific file, ignoring the environment.
    pub fn load_from(path: &Path) -> CalGridResult<Self> {
        Self::build(path, false)
    }

    fn build(path: &Path, with_env: bool) -> CalGridResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from(path.to_path_buf()).required(false));

        if with_env {
            builder = builder.add_source(Environment::with_prefix("CALGRID").try_parsing(true));
        }

        builder
            .build()
            .map_err(|e| CalGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalGridError::Config(e.to_string()))
    }

    /// Store path with `~` expanded.
    pub fn store_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.store_path.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::new(self.store_path())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalGridResult<()> {
        let contents = format!(
            "\
# calgrid configuration

# Where events are stored:
# store_path = \"{}\"

# Maximum occurrences generated per recurring event per query:
# max_occurrences = {}

# Defaults for new events:
# default_category = \"{}\"
# default_color = \"{}\"

# Events starting closer together than this (minutes) on the same day conflict:
# conflict_minutes = {}

# How many events `calgrid upcoming` shows:
# upcoming_count = {}
",
            DEFAULT_STORE_PATH,
            DEFAULT_MAX_OCCURRENCES,
            DEFAULT_CATEGORY,
            DEFAULT_COLOR,
            DEFAULT_CONFLICT_MINUTES,
            DEFAULT_UPCOMING_COUNT,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
