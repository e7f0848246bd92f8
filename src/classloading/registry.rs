//! classloading::registry
//!
//! Type-keyed service registry.
//!
//! Services are registered and looked up by their (usually unsized) service
//! type, e.g. `dyn ClassLoaderService`. Each type holds at most one service.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::traits::ClassLoadingError;

/// Registry of build services keyed by service type.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use metacache::classloading::{ClassLoaderService, ServiceRegistry, StaticClassLoader};
///
/// let service: Arc<dyn ClassLoaderService> = Arc::new(StaticClassLoader::new("app"));
/// let registry = ServiceRegistry::new().with_service(service);
///
/// assert!(registry.service::<dyn ClassLoaderService>().is_some());
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service, replacing any previous one of the same type.
    pub fn register<S>(&mut self, service: Arc<S>)
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.services.insert(TypeId::of::<S>(), Box::new(service));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_service<S>(mut self, service: Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.register(service);
        self
    }

    /// Look up the service registered for type `S`.
    pub fn service<S>(&self) -> Option<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.services
            .get(&TypeId::of::<S>())
            .and_then(|boxed| boxed.downcast_ref::<Arc<S>>())
            .cloned()
    }

    /// Look up the service registered for type `S`, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns `ClassLoadingError::ServiceNotFound` naming the service type.
    pub fn require_service<S>(&self) -> Result<Arc<S>, ClassLoadingError>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.service::<S>()
            .ok_or(ClassLoadingError::ServiceNotFound(type_name::<S>()))
    }

    /// Whether a service of type `S` is registered.
    pub fn contains<S>(&self) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.services.contains_key(&TypeId::of::<S>())
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no services are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.services.len())
            .finish()
    }
}
