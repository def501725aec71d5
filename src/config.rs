/// Engine configuration
///
/// Settings come from an optional `minesafe.toml` file, then from the
/// environment (a `.env` file is honored). Every section of the file is
/// optional:
///
/// ```toml
/// [data]
/// path = "data/accidents.json"
///
/// [logging]
/// level = "info"
/// file = "minesafe.log"
/// timestamps = true
///
/// [search]
/// endpoint = "http://localhost:8000/search"
/// k = 5
/// min_score = 0.5
/// ```
///
/// Environment overrides: `MINESAFE_DATA`, `MINESAFE_LOG_LEVEL`,
/// `MINESAFE_SEARCH_URL`.

use std::path::Path;

use serde::Deserialize;

use crate::logging::LogLevel;
use crate::model::EngineError;

pub const DEFAULT_CONFIG_FILE: &str = "minesafe.toml";
pub const DEFAULT_DATA_PATH: &str = "data/accidents.json";

pub const ENV_DATA: &str = "MINESAFE_DATA";
pub const ENV_LOG_LEVEL: &str = "MINESAFE_LOG_LEVEL";
pub const ENV_SEARCH_URL: &str = "MINESAFE_SEARCH_URL";

// ---------------------------------------------------------------------------
// Config Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON file holding the bucket→records collection.
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            path: DEFAULT_DATA_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LoggingConfig {
    pub fn log_level(&self) -> Result<LogLevel, EngineError> {
        self.level.parse().map_err(EngineError::Config)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub k: usize,
    pub min_score: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            endpoint: String::new(),
            k: 5,
            min_score: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
    /// Absent when no search service is configured.
    pub search: Option<SearchConfig>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl EngineConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml(text: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a variable lookup (normally the process
    /// environment). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup(ENV_DATA) {
            self.data.path = path;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(endpoint) = lookup(ENV_SEARCH_URL) {
            self.search.get_or_insert_with(SearchConfig::default).endpoint = endpoint;
        }

        self.validate()
    }

    fn validate(&self) -> Result<(), EngineError> {
        self.logging.log_level()?;

        if let Some(search) = &self.search {
            if search.endpoint.trim().is_empty() {
                return Err(EngineError::Config("search.endpoint must not be empty".into()));
            }
            if search.k == 0 {
                return Err(EngineError::Config("search.k must be at least 1".into()));
            }
        }

        Ok(())
    }
}

/// Reads a config file. A missing file is an error; use `load_config` for
/// the optional default location.
pub fn read_config_file(path: impl AsRef<Path>) -> Result<EngineConfig, EngineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Io(format!("{}: {}", path.display(), e)))?;
    EngineConfig::from_toml(&text)
}

/// Builds the effective configuration.
///
/// With an explicit `path` the file must exist. Without one,
/// `minesafe.toml` in the working directory is used when present and
/// defaults otherwise. Environment overrides are applied last.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, EngineError> {
    dotenv::dotenv().ok();

    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => read_config_file(DEFAULT_CONFIG_FILE)?,
        None => EngineConfig::default(),
    };

    config.apply_overrides(|name| std::env::var(name).ok())?;
    Ok(config)
}
