//! classloading::lazy
//!
//! Class loader access resolved on first use.
//!
//! # Design
//!
//! Sessions started from [`MetadataBuildingOptions`] only have the coarse
//! options at construction time. [`LazyClassLoaderAccess`] keeps the options
//! and derives the [`StandardClassLoaderAccess`] the first time a class is
//! requested, then reuses it for the rest of its life.
//!
//! # Invariants
//!
//! - States are Unresolved and Resolved; there is no way back to Unresolved
//! - A failed resolution leaves the adapter Unresolved
//! - Every caller observes the same resolved access, even when concurrent
//!   first calls both performed the resolution

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::access::StandardClassLoaderAccess;
use super::options::MetadataBuildingOptions;
use super::traits::{ClassLoaderAccess, ClassLoadingError, LoadedClass};

/// Class loader access derived from build options on first use.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use metacache::classloading::{
///     ClassLoaderAccess, ClassLoaderService, LazyClassLoaderAccess, ServiceRegistry,
///     StandardBuildingOptions, StaticClassLoader,
/// };
///
/// let service: Arc<dyn ClassLoaderService> =
///     Arc::new(StaticClassLoader::from_names("app", ["com.acme.Order"]).unwrap());
/// let options = StandardBuildingOptions::new(ServiceRegistry::new().with_service(service));
///
/// let lazy = LazyClassLoaderAccess::new(Arc::new(options));
/// assert!(!lazy.is_resolved());
///
/// lazy.class_for_name("com.acme.Order").unwrap();
/// assert!(lazy.is_resolved());
/// ```
pub struct LazyClassLoaderAccess {
    options: Arc<dyn MetadataBuildingOptions>,
    resolved: OnceLock<Arc<dyn ClassLoaderAccess>>,
}

impl LazyClassLoaderAccess {
    /// Wrap build options; nothing is resolved yet.
    pub fn new(options: Arc<dyn MetadataBuildingOptions>) -> Self {
        Self {
            options,
            resolved: OnceLock::new(),
        }
    }

    /// Whether the access has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Get the resolved access, resolving it on the first call.
    ///
    /// # Errors
    ///
    /// Returns `ClassLoadingError::ServiceNotFound` if the options provide
    /// no class loader service. The next call tries again.
    pub fn resolve(&self) -> Result<Arc<dyn ClassLoaderAccess>, ClassLoadingError> {
        if let Some(access) = self.resolved.get() {
            return Ok(Arc::clone(access));
        }

        let access: Arc<dyn ClassLoaderAccess> =
            Arc::new(StandardClassLoaderAccess::from_options(self.options.as_ref())?);
        tracing::debug!("Resolved class loader access from build options");

        // A concurrent caller may have stored first; its value wins.
        Ok(Arc::clone(self.resolved.get_or_init(|| access)))
    }
}

impl ClassLoaderAccess for LazyClassLoaderAccess {
    fn class_for_name(&self, name: &str) -> Result<LoadedClass, ClassLoadingError> {
        self.resolve()?.class_for_name(name)
    }
}

impl fmt::Debug for LazyClassLoaderAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyClassLoaderAccess")
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classloading::{
        ClassLoader, ClassLoaderService, ServiceRegistry, StandardBuildingOptions,
        StaticClassLoader,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Options that count how often the registry is consulted.
    struct CountingOptions {
        inner: StandardBuildingOptions,
        lookups: AtomicUsize,
    }

    impl CountingOptions {
        fn new(inner: StandardBuildingOptions) -> Self {
            Self {
                inner,
                lookups: AtomicUsize::new(0),
            }
        }

        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    impl MetadataBuildingOptions for CountingOptions {
        fn temp_class_loader(&self) -> Option<Arc<dyn ClassLoader>> {
            self.inner.temp_class_loader()
        }

        fn service_registry(&self) -> &ServiceRegistry {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.service_registry()
        }
    }

    fn options_with_service() -> StandardBuildingOptions {
        let service: Arc<dyn ClassLoaderService> =
            Arc::new(StaticClassLoader::from_names("app", ["com.acme.Order"]).unwrap());
        StandardBuildingOptions::new(ServiceRegistry::new().with_service(service))
    }

    #[test]
    fn construction_does_not_resolve() {
        let options = Arc::new(CountingOptions::new(options_with_service()));
        let lazy = LazyClassLoaderAccess::new(options.clone());

        assert!(!lazy.is_resolved());
        assert_eq!(options.lookups(), 0);
    }

    #[test]
    fn resolves_once_and_reuses() {
        let options = Arc::new(CountingOptions::new(options_with_service()));
        let lazy = LazyClassLoaderAccess::new(options.clone());

        let first = lazy.resolve().unwrap();
        let second = lazy.resolve().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(options.lookups(), 1);
    }

    #[test]
    fn class_for_name_triggers_resolution() {
        let options = Arc::new(CountingOptions::new(options_with_service()));
        let lazy = LazyClassLoaderAccess::new(options.clone());

        let class = lazy.class_for_name("com.acme.Order").unwrap();
        assert_eq!(class.loader(), "app");
        lazy.class_for_name("com.acme.Order").unwrap();

        assert!(lazy.is_resolved());
        assert_eq!(options.lookups(), 1);
    }

    #[test]
    fn failed_resolution_stays_unresolved() {
        let options = Arc::new(CountingOptions::new(StandardBuildingOptions::new(
            ServiceRegistry::new(),
        )));
        let lazy = LazyClassLoaderAccess::new(options.clone());

        assert!(matches!(
            lazy.class_for_name("com.acme.Order"),
            Err(ClassLoadingError::ServiceNotFound(_))
        ));
        assert!(!lazy.is_resolved());

        assert!(lazy.resolve().is_err());
        assert_eq!(options.lookups(), 2);
    }

    #[test]
    fn concurrent_first_access_agrees() {
        let lazy = Arc::new(LazyClassLoaderAccess::new(Arc::new(options_with_service())));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                std::thread::spawn(move || lazy.resolve().unwrap())
            })
            .collect();
        let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let stored = lazy.resolve().unwrap();
        for access in &resolved {
            assert!(Arc::ptr_eq(access, &stored));
        }
    }
}
