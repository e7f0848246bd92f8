//! classloading::options
//!
//! Build options and bootstrap context.
//!
//! # Design
//!
//! A metadata-build session starts from one of two inputs:
//!
//! - [`BootstrapContext`]: carries an already-resolved [`ClassLoaderAccess`]
//! - [`MetadataBuildingOptions`]: the older, coarser input; the class loader
//!   access has to be derived from its service registry
//!
//! [`StandardBuildingOptions`] is the options implementation built from
//! configuration.

use std::fmt;
use std::sync::Arc;

use super::access::StandardClassLoaderAccess;
use super::registry::ServiceRegistry;
use super::static_loader::StaticClassLoader;
use super::traits::{ClassLoader, ClassLoaderAccess, ClassLoaderService, ClassLoadingError};
use crate::core::config::schema::MAX_CACHE_CAPACITY;
use crate::core::config::{Config, ConfigError, DEFAULT_CACHE_CAPACITY};

/// Coarse build options a session may be started from.
pub trait MetadataBuildingOptions: Send + Sync {
    /// Temporary class loader for application classes, if any.
    fn temp_class_loader(&self) -> Option<Arc<dyn ClassLoader>>;

    /// Registry holding the build services.
    fn service_registry(&self) -> &ServiceRegistry;
}

/// Build options backed by a service registry and an optional temp loader.
pub struct StandardBuildingOptions {
    temp_class_loader: Option<Arc<dyn ClassLoader>>,
    service_registry: ServiceRegistry,
}

impl StandardBuildingOptions {
    /// Create options over the given registry, with no temporary loader.
    pub fn new(service_registry: ServiceRegistry) -> Self {
        Self {
            temp_class_loader: None,
            service_registry,
        }
    }

    /// Set the temporary class loader.
    pub fn with_temp_class_loader(mut self, loader: Arc<dyn ClassLoader>) -> Self {
        self.temp_class_loader = Some(loader);
        self
    }

    /// Build options from configuration.
    ///
    /// Registers a [`StaticClassLoader`] over `class_loading.classes` as the
    /// class loader service and, when `class_loading.temp_classes` is set,
    /// installs a second one as the temporary loader.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for malformed class names.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let service = StaticClassLoader::from_names("service", config.classes())
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        let service: Arc<dyn ClassLoaderService> = Arc::new(service);
        let mut options = Self::new(ServiceRegistry::new().with_service(service));

        if let Some(temp_classes) = config.temp_classes() {
            let temp = StaticClassLoader::from_names("temp", temp_classes)
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
            options = options.with_temp_class_loader(Arc::new(temp));
        }

        Ok(options)
    }
}

impl MetadataBuildingOptions for StandardBuildingOptions {
    fn temp_class_loader(&self) -> Option<Arc<dyn ClassLoader>> {
        self.temp_class_loader.clone()
    }

    fn service_registry(&self) -> &ServiceRegistry {
        &self.service_registry
    }
}

impl fmt::Debug for StandardBuildingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardBuildingOptions")
            .field("has_temp_class_loader", &self.temp_class_loader.is_some())
            .field("service_registry", &self.service_registry)
            .finish()
    }
}

/// Session inputs with class loading already resolved.
#[derive(Clone)]
pub struct BootstrapContext {
    class_loader_access: Arc<dyn ClassLoaderAccess>,
    cache_capacity: usize,
}

impl BootstrapContext {
    /// Create a context over an existing class loader access.
    pub fn new(class_loader_access: Arc<dyn ClassLoaderAccess>) -> Self {
        Self {
            class_loader_access,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Override the initial reader cache capacity.
    ///
    /// Values above `MAX_CACHE_CAPACITY` are clamped to it.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity.min(MAX_CACHE_CAPACITY);
        self
    }

    /// Resolve class loading from build options eagerly.
    ///
    /// # Errors
    ///
    /// Returns `ClassLoadingError::ServiceNotFound` if the options provide
    /// no class loader service.
    pub fn from_options(options: &dyn MetadataBuildingOptions) -> Result<Self, ClassLoadingError> {
        let access = StandardClassLoaderAccess::from_options(options)?;
        Ok(Self::new(Arc::new(access)))
    }

    /// Build a context from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for malformed class names.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let options = StandardBuildingOptions::from_config(config)?;
        let context = Self::from_options(&options)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        Ok(context.with_cache_capacity(config.cache_capacity()))
    }

    /// The resolved class loader access.
    pub fn class_loader_access(&self) -> Arc<dyn ClassLoaderAccess> {
        Arc::clone(&self.class_loader_access)
    }

    /// Initial reader cache capacity for providers built from this context.
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }
}

impl fmt::Debug for BootstrapContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapContext")
            .field("cache_capacity", &self.cache_capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::schema::{CacheConfig, ClassLoadingConfig, ConfigFile};

    fn config(classes: &[&str], temp: Option<&[&str]>, capacity: Option<usize>) -> Config {
        Config::from_file(ConfigFile {
            cache: capacity.map(|c| CacheConfig {
                initial_capacity: Some(c),
            }),
            class_loading: Some(ClassLoadingConfig {
                classes: classes.iter().map(|s| s.to_string()).collect(),
                temp_classes: temp.map(|t| t.iter().map(|s| s.to_string()).collect()),
            }),
        })
    }

    mod standard_options_tests {
        use super::*;

        #[test]
        fn from_config_registers_service() {
            let options =
                StandardBuildingOptions::from_config(&config(&["com.acme.Order"], None, None))
                    .unwrap();
            assert!(options.temp_class_loader().is_none());

            let service = options
                .service_registry()
                .service::<dyn ClassLoaderService>()
                .unwrap();
            assert!(service.class_for_name("com.acme.Order").is_ok());
        }

        #[test]
        fn from_config_installs_temp_loader() {
            let options = StandardBuildingOptions::from_config(&config(
                &["com.acme.Order"],
                Some(&["com.acme.Draft"]),
                None,
            ))
            .unwrap();

            let temp = options.temp_class_loader().unwrap();
            assert_eq!(temp.load_class("com.acme.Draft").unwrap().loader(), "temp");
        }

        #[test]
        fn from_config_rejects_bad_names() {
            let result = StandardBuildingOptions::from_config(&config(&["bad name"], None, None));
            assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
        }
    }

    mod bootstrap_context_tests {
        use super::*;

        #[test]
        fn default_capacity() {
            let service: Arc<dyn ClassLoaderService> = Arc::new(StaticClassLoader::new("app"));
            let access = StandardClassLoaderAccess::from_service(service);
            let context = BootstrapContext::new(Arc::new(access));
            assert_eq!(context.cache_capacity(), DEFAULT_CACHE_CAPACITY);
        }

        #[test]
        fn from_config_resolves_eagerly() {
            let context =
                BootstrapContext::from_config(&config(&["com.acme.Order"], None, Some(16)))
                    .unwrap();
            assert_eq!(context.cache_capacity(), 16);
            assert!(context
                .class_loader_access()
                .class_for_name("com.acme.Order")
                .is_ok());
        }

        #[test]
        fn oversized_capacity_clamped() {
            let service: Arc<dyn ClassLoaderService> = Arc::new(StaticClassLoader::new("app"));
            let access = StandardClassLoaderAccess::from_service(service);
            let context = BootstrapContext::new(Arc::new(access)).with_cache_capacity(usize::MAX);
            assert_eq!(context.cache_capacity(), MAX_CACHE_CAPACITY);
        }

        #[test]
        fn from_options_without_service() {
            let options = StandardBuildingOptions::new(ServiceRegistry::new());
            assert!(matches!(
                BootstrapContext::from_options(&options),
                Err(ClassLoadingError::ServiceNotFound(_))
            ));
        }
    }
}
