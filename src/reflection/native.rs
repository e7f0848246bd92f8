//! reflection::native
//!
//! Readers built purely from natively declared annotations.
//!
//! # Design
//!
//! Annotations are declared per element in an [`AnnotationRegistry`], which
//! plays the role runtime reflection plays elsewhere. The
//! [`NativeMetadataProvider`] builds a fresh [`NativeAnnotationReader`] per
//! request and never fails: an element nobody declared anything on simply has
//! no annotations. It does no caching of its own.

use std::collections::HashMap;
use std::sync::Arc;

use super::annotation::{empty_defaults, Annotation, AnnotationReader, Defaults};
use super::traits::{MetadataError, MetadataProvider};
use crate::core::types::AnnotatedElement;

/// Declared annotations, keyed by element.
///
/// # Example
///
/// ```
/// use metacache::core::types::{AnnotatedElement, ClassName};
/// use metacache::reflection::{Annotation, AnnotationRegistry};
///
/// let order = AnnotatedElement::class("com.acme.Order").unwrap();
/// let registry = AnnotationRegistry::new().with(
///     order.clone(),
///     Annotation::new(ClassName::new("javax.persistence.Entity").unwrap()),
/// );
///
/// assert!(registry.contains(&order));
/// assert_eq!(registry.annotations_of(&order).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnnotationRegistry {
    elements: HashMap<AnnotatedElement, Vec<Annotation>>,
}

impl AnnotationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an annotation on an element.
    ///
    /// Annotations keep their declaration order. Declaring a second
    /// annotation of the same type replaces the first.
    pub fn declare(&mut self, element: AnnotatedElement, annotation: Annotation) -> &mut Self {
        let declared = self.elements.entry(element).or_default();
        match declared
            .iter_mut()
            .find(|existing| existing.type_name() == annotation.type_name())
        {
            Some(existing) => *existing = annotation,
            None => declared.push(annotation),
        }
        self
    }

    /// Builder form of [`declare`](Self::declare).
    pub fn with(mut self, element: AnnotatedElement, annotation: Annotation) -> Self {
        self.declare(element, annotation);
        self
    }

    /// Whether anything was declared on the element.
    pub fn contains(&self, element: &AnnotatedElement) -> bool {
        self.elements.contains_key(element)
    }

    /// Annotations declared on the element, possibly none.
    pub fn annotations_of(&self, element: &AnnotatedElement) -> &[Annotation] {
        self.elements
            .get(element)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of elements with declarations.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Reader over a snapshot of one element's declared annotations.
#[derive(Debug, Clone)]
pub struct NativeAnnotationReader {
    element: AnnotatedElement,
    annotations: Vec<Annotation>,
}

impl NativeAnnotationReader {
    /// Bind a reader to an element and its annotations.
    pub fn new(element: AnnotatedElement, annotations: Vec<Annotation>) -> Self {
        Self {
            element,
            annotations,
        }
    }
}

impl AnnotationReader for NativeAnnotationReader {
    fn element(&self) -> &AnnotatedElement {
        &self.element
    }

    fn annotation(&self, type_name: &str) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| a.type_name().as_str() == type_name)
    }

    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Provider building readers from an [`AnnotationRegistry`].
#[derive(Debug, Clone, Default)]
pub struct NativeMetadataProvider {
    registry: Arc<AnnotationRegistry>,
}

impl NativeMetadataProvider {
    /// Create a provider over a registry.
    pub fn new(registry: AnnotationRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// The registry readers are built from.
    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }
}

impl MetadataProvider for NativeMetadataProvider {
    fn annotation_reader(
        &self,
        element: &AnnotatedElement,
    ) -> Result<Arc<dyn AnnotationReader>, MetadataError> {
        let annotations = self.registry.annotations_of(element).to_vec();
        Ok(Arc::new(NativeAnnotationReader::new(
            element.clone(),
            annotations,
        )))
    }

    fn defaults(&self) -> &Defaults {
        empty_defaults()
    }
}
