//! Application paths and the persisted JSON configuration.
//!
//! # Responsibility
//! - Resolve every on-disk location from one explicit base directory.
//! - Read and write the dictionary API credential in `config.json`.
//!
//! # Invariants
//! - A missing or unparseable config file is reported as `needs_init()`,
//!   distinct from a readable file without an API key (`KeyNotSet`).
//! - Saving a key preserves the other fields already present in the file.
//! - Saving a key over an unparseable file replaces that file.

use directories::BaseDirs;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const BASE_DIR_NAME: &str = ".lexico";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "vocabulary.db";
const LOG_DIR_NAME: &str = "logs";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    HomeDirUnavailable,
    Missing { path: PathBuf },
    Malformed { path: PathBuf, message: String },
    KeyNotSet,
    EmptyKey,
    Io { path: PathBuf, source: io::Error },
}

impl ConfigError {
    /// Returns whether the user has to run `lexico init` to recover.
    pub fn needs_init(&self) -> bool {
        matches!(
            self,
            Self::Missing { .. } | Self::Malformed { .. } | Self::KeyNotSet
        )
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HomeDirUnavailable => write!(f, "cannot resolve the user home directory"),
            Self::Missing { path } => {
                write!(f, "configuration file `{}` does not exist", path.display())
            }
            Self::Malformed { path, message } => write!(
                f,
                "configuration file `{}` is malformed: {message}",
                path.display()
            ),
            Self::KeyNotSet => write!(f, "no API key has been saved"),
            Self::EmptyKey => write!(f, "API key cannot be empty"),
            Self::Io { path, source } => write!(f, "cannot access `{}`: {source}", path.display()),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Every filesystem location used by lexico, derived from one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    base_dir: PathBuf,
}

impl AppPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolves the default `~/.lexico` layout.
    pub fn from_home() -> ConfigResult<Self> {
        let dirs = BaseDirs::new().ok_or(ConfigError::HomeDirUnavailable)?;
        Ok(Self::new(dirs.home_dir().join(BASE_DIR_NAME)))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    pub fn db_file(&self) -> PathBuf {
        self.base_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join(LOG_DIR_NAME)
    }
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Overrides the dictionary service endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl AppConfig {
    /// Returns the saved API key or `KeyNotSet`.
    pub fn require_api_key(&self) -> ConfigResult<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::KeyNotSet),
        }
    }
}

/// Reads and writes `config.json` at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(paths: &AppPaths) -> Self {
        Self {
            path: paths.config_file(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Creates an empty config file when none exists.
    ///
    /// Returns `true` when the file was created by this call.
    pub fn ensure_exists(&self) -> ConfigResult<bool> {
        if self.exists() {
            return Ok(false);
        }
        self.write(&AppConfig::default())?;
        info!(
            "event=config_create module=config status=ok path={}",
            self.path.display()
        );
        Ok(true)
    }

    /// Loads the whole configuration.
    ///
    /// An empty file is treated as an empty configuration.
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        serde_json::from_str(&raw).map_err(|err| ConfigError::Malformed {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.load_api_key().is_ok()
    }

    /// Returns the saved API key.
    ///
    /// # Errors
    /// - `Missing` / `Malformed` when the file is absent or unreadable as JSON.
    /// - `KeyNotSet` when the file is valid but holds no key.
    pub fn load_api_key(&self) -> ConfigResult<String> {
        let config = self.load()?;
        config.require_api_key().map(str::to_owned)
    }

    /// Persists `key`, keeping other configuration fields intact.
    ///
    /// A malformed file is replaced by a fresh configuration holding only `key`.
    pub fn save_api_key(&self, key: &str) -> ConfigResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }

        let mut config = match self.load() {
            Ok(config) => config,
            Err(ConfigError::Missing { .. }) => AppConfig::default(),
            Err(ConfigError::Malformed { message, .. }) => {
                warn!(
                    "event=config_reset module=config status=ok path={} error={message}",
                    self.path.display()
                );
                AppConfig::default()
            }
            Err(err) => return Err(err),
        };
        config.api_key = Some(key.to_string());

        match self.write(&config) {
            Ok(()) => {
                info!("event=api_key_save module=config status=ok");
                Ok(())
            }
            Err(err) => {
                error!("event=api_key_save module=config status=error error={err}");
                Err(err)
            }
        }
    }

    fn write(&self, config: &AppConfig) -> ConfigResult<()> {
        let body = serde_json::to_string_pretty(config).map_err(|err| ConfigError::Malformed {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        fs::write(&self.path, body).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
