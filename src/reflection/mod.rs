//! reflection
//!
//! Annotation model, reader capability, and reader providers.
//!
//! # Architecture
//!
//! - [`Annotation`] / [`AnnotationValue`]: declared annotation data
//! - [`AnnotationReader`]: per-element query capability
//! - [`MetadataProvider`]: source of readers; the seam the cache depends on
//! - [`NativeMetadataProvider`]: builds readers from an [`AnnotationRegistry`]
//! - [`mock`]: counting provider for tests

mod annotation;
pub mod mock;
mod native;
mod traits;

pub use annotation::{empty_defaults, Annotation, AnnotationReader, AnnotationValue, Defaults};
pub use native::{AnnotationRegistry, NativeAnnotationReader, NativeMetadataProvider};
pub use traits::{MetadataError, MetadataProvider, OVERRIDE_MAPPING_FEATURE};
