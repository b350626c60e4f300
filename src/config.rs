use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.toml";
pub const DIR_ENV: &str = "CARDLIST_DIR";
const DEFAULT_DIR_NAME: &str = ".cardlist";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Contents of `<data-dir>/config.toml`. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub log: LogConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key the collection is stored under.
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: "cards".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Longest gap between two presses that still counts as a double click.
    pub double_click_ms: u64,
    pub mouse: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 400,
            mouse: true,
        }
    }
}

/// Load `<data_dir>/config.toml`. A missing file yields the defaults.
pub fn load_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    toml::from_str(&content).map_err(|source| ConfigError::Toml { path, source })
}

/// Resolve the data directory: explicit flag, then `$CARDLIST_DIR`, then
/// `~/.cardlist`, then `./.cardlist`.
pub fn resolve_data_dir(flag: Option<&Path>) -> PathBuf {
    data_dir_from(flag, std::env::var_os(DIR_ENV), dirs::home_dir())
}

fn data_dir_from(flag: Option<&Path>, env: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    home.map(|h| h.join(DEFAULT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_NAME))
}
