//! reflection::mock
//!
//! Counting metadata provider for deterministic testing.
//!
//! # Design
//!
//! [`CountingMetadataProvider`] wraps a [`NativeMetadataProvider`] and records
//! every reader request. Clones share their state, so a test can keep one
//! handle and give the other to the provider under test.
//!
//! # Example
//!
//! ```
//! use metacache::core::types::AnnotatedElement;
//! use metacache::reflection::MetadataProvider;
//! use metacache::reflection::mock::CountingMetadataProvider;
//!
//! let delegate = CountingMetadataProvider::new();
//! let order = AnnotatedElement::class("com.acme.Order").unwrap();
//!
//! delegate.annotation_reader(&order).unwrap();
//! delegate.annotation_reader(&order).unwrap();
//!
//! assert_eq!(delegate.calls_for(&order), 2);
//! assert_eq!(delegate.total_calls(), 2);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::annotation::{AnnotationReader, Defaults};
use super::native::{AnnotationRegistry, NativeMetadataProvider};
use super::traits::{MetadataError, MetadataProvider};
use crate::core::types::AnnotatedElement;

/// Metadata provider that counts requests per element.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct CountingMetadataProvider {
    inner: NativeMetadataProvider,
    calls: Arc<Mutex<HashMap<AnnotatedElement, usize>>>,
}

impl CountingMetadataProvider {
    /// Create a counting provider with no declared annotations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counting provider over a registry.
    pub fn with_registry(registry: AnnotationRegistry) -> Self {
        Self {
            inner: NativeMetadataProvider::new(registry),
            calls: Arc::default(),
        }
    }

    /// Number of requests made for an element.
    pub fn calls_for(&self, element: &AnnotatedElement) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(element)
            .copied()
            .unwrap_or(0)
    }

    /// Number of requests across all elements.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }
}

impl MetadataProvider for CountingMetadataProvider {
    fn annotation_reader(
        &self,
        element: &AnnotatedElement,
    ) -> Result<Arc<dyn AnnotationReader>, MetadataError> {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(element.clone())
            .or_insert(0) += 1;
        self.inner.annotation_reader(element)
    }

    fn defaults(&self) -> &Defaults {
        self.inner.defaults()
    }
}
