use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_STATE_PATH: &str = "~/.local/share/tabgrid/state.json";
const DEFAULT_EXPORT_PATH: &str = "~/.local/share/tabgrid/tab.txt";
const DEFAULT_COLUMN_SPACING: i64 = 2;
const DEFAULT_LINE_WIDTH: i64 = 72;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the editor session is persisted between runs
    pub state_path: PathBuf,
    /// Where the "copy" command writes the formatted tab
    pub export_path: PathBuf,
    /// Column spacing for a fresh session
    pub column_spacing: i64,
    /// Line width for a fresh session
    pub line_width: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: Self::expand_path(Path::new(DEFAULT_STATE_PATH))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH)),
            export_path: Self::expand_path(Path::new(DEFAULT_EXPORT_PATH))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH)),
            column_spacing: DEFAULT_COLUMN_SPACING,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded paths
        config.state_path = Self::expand_path(&config.state_path).unwrap_or(config.state_path);
        config.export_path = Self::expand_path(&config.export_path).unwrap_or(config.export_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the config file, or defaults when there is none
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/tabgrid");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
