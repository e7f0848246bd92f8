//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$METACACHE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/metacache/config.toml`
//! 3. `~/.metacache/config.toml`
//!
//! Missing files are not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use metacache::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Cache capacity: {}", config.cache_capacity());
//! for class in config.classes() {
//!     println!("Known class: {}", class);
//! }
//! ```

pub mod schema;

pub use schema::{CacheConfig, ClassLoadingConfig, ConfigFile};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Initial reader cache capacity when none is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "METACACHE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: ConfigFile,
    /// Path the configuration was read from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        let located = locate(|key| std::env::var(key).ok(), dirs::home_dir());
        match located {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap already-parsed contents. No validation is performed.
    pub fn from_file(file: ConfigFile) -> Self {
        Self { file, path: None }
    }

    /// Path the configuration was read from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Initial reader cache capacity (default: 100).
    pub fn cache_capacity(&self) -> usize {
        self.file
            .cache
            .as_ref()
            .and_then(|c| c.initial_capacity)
            .unwrap_or(DEFAULT_CACHE_CAPACITY)
    }

    /// Classes known to the class loader service.
    pub fn classes(&self) -> &[String] {
        self.file
            .class_loading
            .as_ref()
            .map(|c| c.classes.as_slice())
            .unwrap_or(&[])
    }

    /// Classes known to the temporary loader, if one is configured.
    pub fn temp_classes(&self) -> Option<&[String]> {
        self.file
            .class_loading
            .as_ref()
            .and_then(|c| c.temp_classes.as_deref())
    }
}

/// Find the first existing config file.
///
/// `env` resolves environment variables and `home` is the user's home
/// directory; both are parameters so lookup can be exercised without
/// touching the process environment.
fn locate(env: impl Fn(&str) -> Option<String>, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = env(CONFIG_ENV_VAR).map(PathBuf::from) {
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_home).join("metacache/config.toml");
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(home) = home {
        let path = home.join(".metacache/config.toml");
        if path.exists() {
            return Some(path);
        }
    }

    None
}
