//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! initial_capacity = 100
//!
//! [class_loading]
//! classes = ["com.acme.Order", "com.acme.Customer"]
//! temp_classes = ["com.acme.Order"]
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: class names must be well formed and
//! the cache capacity must be positive.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::ClassName;

/// Upper bound for the configured initial cache capacity.
pub const MAX_CACHE_CAPACITY: usize = 1 << 16;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Reader cache settings
    pub cache: Option<CacheConfig>,

    /// Class loading settings
    pub class_loading: Option<ClassLoadingConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cache) = &self.cache {
            cache.validate()?;
        }
        if let Some(class_loading) = &self.class_loading {
            class_loading.validate()?;
        }
        Ok(())
    }
}

/// Reader cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Initial number of reader slots to reserve
    pub initial_capacity: Option<usize>,
}

impl CacheConfig {
    /// Validate the cache settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(capacity) = self.initial_capacity {
            if capacity == 0 || capacity > MAX_CACHE_CAPACITY {
                return Err(ConfigError::InvalidValue(format!(
                    "cache.initial_capacity must be between 1 and {}, got {}",
                    MAX_CACHE_CAPACITY, capacity
                )));
            }
        }
        Ok(())
    }
}

/// Class loading settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassLoadingConfig {
    /// Classes known to the class loader service
    pub classes: Vec<String>,

    /// Classes known to the temporary loader; no temp loader when unset
    pub temp_classes: Option<Vec<String>>,
}

impl ClassLoadingConfig {
    /// Validate every configured class name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temp = self.temp_classes.iter().flatten();
        for name in self.classes.iter().chain(temp) {
            ClassName::new(name.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("class_loading: {}", e))
            })?;
        }
        Ok(())
    }
}
