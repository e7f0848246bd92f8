//! provider
//!
//! Per-session annotation reader cache with an override gate.
//!
//! # Architecture
//!
//! [`CachingMetadataProvider`] sits in front of a delegate
//! [`MetadataProvider`]. For each element it:
//!
//! 1. returns the cached reader if there is one
//! 2. otherwise fails if the [`OverrideContext`] has overrides
//! 3. otherwise asks the delegate, stores the reader, and returns it
//!
//! # Invariants
//!
//! - Each element maps to at most one reader, and the delegate is asked at
//!   most once per element
//! - A stored reader is never replaced
//! - While overrides are present no new reader is produced; the request
//!   fails with `MetadataError::UnsupportedFeature` and nothing is cached
//!
//! Readers cached before the first override document was registered remain
//! available.
//!
//! # Concurrency
//!
//! The check, gate, delegate call, and insert all run under one lock, so
//! concurrent requests for the same element still reach the delegate once.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use metacache::classloading::{ClassLoaderService, StandardClassLoaderAccess, StaticClassLoader};
//! use metacache::core::types::{AnnotatedElement, ClassName};
//! use metacache::provider::CachingMetadataProvider;
//! use metacache::reflection::{
//!     Annotation, AnnotationRegistry, MetadataProvider, NativeMetadataProvider,
//! };
//!
//! let order = AnnotatedElement::class("com.acme.Order").unwrap();
//! let registry = AnnotationRegistry::new().with(
//!     order.clone(),
//!     Annotation::new(ClassName::new("javax.persistence.Entity").unwrap()),
//! );
//!
//! let service: Arc<dyn ClassLoaderService> = Arc::new(StaticClassLoader::new("app"));
//! let provider = CachingMetadataProvider::new(
//!     Arc::new(StandardClassLoaderAccess::from_service(service)),
//!     Arc::new(NativeMetadataProvider::new(registry)),
//! );
//!
//! let first = provider.annotation_reader(&order).unwrap();
//! let second = provider.annotation_reader(&order).unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! assert!(first.is_annotation_present("javax.persistence.Entity"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::classloading::{
    BootstrapContext, ClassLoaderAccess, LazyClassLoaderAccess, MetadataBuildingOptions,
};
use crate::core::config::schema::MAX_CACHE_CAPACITY;
use crate::core::config::DEFAULT_CACHE_CAPACITY;
use crate::core::types::AnnotatedElement;
use crate::overrides::OverrideContext;
use crate::reflection::{
    empty_defaults, AnnotationReader, Defaults, MetadataError, MetadataProvider,
    OVERRIDE_MAPPING_FEATURE,
};

type ReaderCache = HashMap<AnnotatedElement, Arc<dyn AnnotationReader>>;

/// Override-aware, memoizing metadata provider for one build session.
pub struct CachingMetadataProvider {
    delegate: Arc<dyn MetadataProvider>,
    class_loader_access: Arc<dyn ClassLoaderAccess>,
    override_context: OverrideContext,
    cache: Mutex<ReaderCache>,
}

impl CachingMetadataProvider {
    /// Create a provider bound directly to a class loader access.
    pub fn new(
        class_loader_access: Arc<dyn ClassLoaderAccess>,
        delegate: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self::with_capacity(class_loader_access, delegate, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a provider from a bootstrap context.
    pub fn from_bootstrap(
        context: &BootstrapContext,
        delegate: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self::with_capacity(
            context.class_loader_access(),
            delegate,
            context.cache_capacity(),
        )
    }

    /// Create a provider from coarse build options.
    ///
    /// Class loading is resolved from the options on first use rather than
    /// here. The options are not otherwise retained.
    #[deprecated(note = "use `CachingMetadataProvider::from_bootstrap` instead")]
    pub fn from_building_options(
        options: Arc<dyn MetadataBuildingOptions>,
        delegate: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self::new(Arc::new(LazyClassLoaderAccess::new(options)), delegate)
    }

    /// Create a provider with an explicit initial cache capacity.
    ///
    /// Capacities above `MAX_CACHE_CAPACITY` are clamped to it; the cache
    /// still grows past that on demand.
    pub fn with_capacity(
        class_loader_access: Arc<dyn ClassLoaderAccess>,
        delegate: Arc<dyn MetadataProvider>,
        capacity: usize,
    ) -> Self {
        let override_context = OverrideContext::new(Arc::clone(&class_loader_access));
        Self::assemble(class_loader_access, delegate, override_context, capacity)
    }

    /// Rebuild a provider from a persisted override context.
    ///
    /// The context is re-bound to `class_loader_access`; the cache starts
    /// empty.
    pub fn restore(
        mut override_context: OverrideContext,
        class_loader_access: Arc<dyn ClassLoaderAccess>,
        delegate: Arc<dyn MetadataProvider>,
    ) -> Self {
        override_context.bind(Arc::clone(&class_loader_access));
        Self::assemble(
            class_loader_access,
            delegate,
            override_context,
            DEFAULT_CACHE_CAPACITY,
        )
    }

    fn assemble(
        class_loader_access: Arc<dyn ClassLoaderAccess>,
        delegate: Arc<dyn MetadataProvider>,
        override_context: OverrideContext,
        capacity: usize,
    ) -> Self {
        Self {
            delegate,
            class_loader_access,
            override_context,
            cache: Mutex::new(HashMap::with_capacity(capacity.min(MAX_CACHE_CAPACITY))),
        }
    }

    /// The bound override context.
    pub fn override_context(&self) -> &OverrideContext {
        &self.override_context
    }

    /// Mutable access to the override context, for registering documents.
    pub fn override_context_mut(&mut self) -> &mut OverrideContext {
        &mut self.override_context
    }

    /// End the session, keeping only the persistable state.
    pub fn into_override_context(self) -> OverrideContext {
        self.override_context
    }

    /// The class loader access this provider was built with.
    pub fn class_loader_access(&self) -> Arc<dyn ClassLoaderAccess> {
        Arc::clone(&self.class_loader_access)
    }

    /// Number of cached readers.
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    /// Whether a reader for the element is cached.
    pub fn is_cached(&self, element: &AnnotatedElement) -> bool {
        self.lock_cache().contains_key(element)
    }

    // A panic in the delegate leaves the map untouched, so a poisoned lock
    // still guards a consistent cache.
    fn lock_cache(&self) -> MutexGuard<'_, ReaderCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MetadataProvider for CachingMetadataProvider {
    fn annotation_reader(
        &self,
        element: &AnnotatedElement,
    ) -> Result<Arc<dyn AnnotationReader>, MetadataError> {
        let mut cache = self.lock_cache();

        if let Some(reader) = cache.get(element) {
            tracing::trace!(element = %element, "Annotation reader cache hit");
            return Ok(Arc::clone(reader));
        }

        if self.override_context.has_overrides() {
            tracing::warn!(
                element = %element,
                documents = self.override_context.documents().len(),
                "Rejected annotation reader request: overrides present"
            );
            return Err(MetadataError::UnsupportedFeature {
                feature: OVERRIDE_MAPPING_FEATURE,
            });
        }

        let reader = self.delegate.annotation_reader(element)?;
        cache.insert(element.clone(), Arc::clone(&reader));
        tracing::debug!(
            element = %element,
            kind = element.kind(),
            cached = cache.len(),
            "Cached annotation reader"
        );

        Ok(reader)
    }

    fn defaults(&self) -> &Defaults {
        empty_defaults()
    }
}

impl fmt::Debug for CachingMetadataProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingMetadataProvider")
            .field("override_context", &self.override_context)
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}
