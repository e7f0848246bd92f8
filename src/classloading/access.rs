//! classloading::access
//!
//! Standard [`ClassLoaderAccess`] combining an optional temporary loader
//! with the build-wide service.
//!
//! # Routing
//!
//! Without a temporary loader every request goes to the service. With one,
//! platform classes (`std.`, `core.`, `alloc.`, `java.`, `javax.`) still go to
//! the service and everything else goes to the temporary loader, with no
//! fallback between the two.

use std::fmt;
use std::sync::Arc;

use super::options::MetadataBuildingOptions;
use super::traits::{
    ClassLoader, ClassLoaderAccess, ClassLoaderService, ClassLoadingError, LoadedClass,
};

/// Name prefixes always served by the class loader service.
const PLATFORM_PREFIXES: &[&str] = &["std.", "core.", "alloc.", "java.", "javax."];

fn is_platform_class(name: &str) -> bool {
    PLATFORM_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Class loader access over a service and an optional temporary loader.
pub struct StandardClassLoaderAccess {
    temp_loader: Option<Arc<dyn ClassLoader>>,
    service: Arc<dyn ClassLoaderService>,
}

impl StandardClassLoaderAccess {
    /// Create an access that routes per the module rules.
    pub fn new(
        temp_loader: Option<Arc<dyn ClassLoader>>,
        service: Arc<dyn ClassLoaderService>,
    ) -> Self {
        Self {
            temp_loader,
            service,
        }
    }

    /// Create an access backed only by the service.
    pub fn from_service(service: Arc<dyn ClassLoaderService>) -> Self {
        Self::new(None, service)
    }

    /// Build the access the given options describe.
    ///
    /// Looks up the `ClassLoaderService` in the options' service registry
    /// and pairs it with the options' temporary loader.
    ///
    /// # Errors
    ///
    /// Returns `ClassLoadingError::ServiceNotFound` if the registry has no
    /// class loader service.
    pub fn from_options(options: &dyn MetadataBuildingOptions) -> Result<Self, ClassLoadingError> {
        let service = options
            .service_registry()
            .require_service::<dyn ClassLoaderService>()?;
        Ok(Self::new(options.temp_class_loader(), service))
    }

    /// Whether a temporary loader is configured.
    pub fn has_temp_loader(&self) -> bool {
        self.temp_loader.is_some()
    }
}

impl ClassLoaderAccess for StandardClassLoaderAccess {
    fn class_for_name(&self, name: &str) -> Result<LoadedClass, ClassLoadingError> {
        match &self.temp_loader {
            Some(temp) if !is_platform_class(name) => temp.load_class(name),
            _ => self.service.class_for_name(name),
        }
    }
}

impl fmt::Debug for StandardClassLoaderAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardClassLoaderAccess")
            .field("has_temp_loader", &self.has_temp_loader())
            .finish_non_exhaustive()
    }
}
