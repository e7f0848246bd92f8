//! reflection::traits
//!
//! Metadata provider trait and its error type.
//!
//! # Design
//!
//! [`MetadataProvider`] is the single seam between the reader cache and
//! whatever builds readers. The native provider implements it over declared
//! annotations; the caching provider implements it on top of another
//! provider. Callers depend only on the trait.

use std::sync::Arc;
use thiserror::Error;

use super::annotation::{AnnotationReader, Defaults};
use crate::classloading::ClassLoadingError;
use crate::core::types::AnnotatedElement;

/// Feature name reported when override documents are present.
pub const OVERRIDE_MAPPING_FEATURE: &str = "override-based mapping";

/// Errors from metadata resolution.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The requested resolution path is not implemented by this provider.
    #[error("{feature} is not supported by this metadata provider")]
    UnsupportedFeature { feature: &'static str },

    /// Class loading failed.
    #[error(transparent)]
    ClassLoading(#[from] ClassLoadingError),

    /// The override context has no class loader access bound.
    #[error("override context is not bound to a class loader access")]
    ContextUnbound,

    /// Override context could not be serialized or deserialized.
    #[error("override context serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MetadataError {
    /// Whether this is the unsupported-override condition.
    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self, MetadataError::UnsupportedFeature { .. })
    }
}

/// Source of annotation readers.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait MetadataProvider: Send + Sync {
    /// Get the reader for an element.
    ///
    /// # Errors
    ///
    /// Implementation-specific; the caching provider fails with
    /// `MetadataError::UnsupportedFeature` when overrides are present.
    fn annotation_reader(
        &self,
        element: &AnnotatedElement,
    ) -> Result<Arc<dyn AnnotationReader>, MetadataError>;

    /// Default member values known to this provider.
    fn defaults(&self) -> &Defaults;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = MetadataError::UnsupportedFeature {
            feature: OVERRIDE_MAPPING_FEATURE,
        };
        assert_eq!(
            err.to_string(),
            "override-based mapping is not supported by this metadata provider"
        );
        assert!(err.is_unsupported_feature());

        let err = MetadataError::from(ClassLoadingError::NotFound("a.B".into()));
        assert!(err.to_string().contains("a.B"));
        assert!(!err.is_unsupported_feature());

        let err = MetadataError::ContextUnbound;
        assert!(err.to_string().contains("not bound"));
    }
}
