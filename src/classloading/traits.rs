//! classloading::traits
//!
//! Class loading trait definitions.
//!
//! # Design
//!
//! Three seams, from narrowest to broadest:
//!
//! - [`ClassLoader`]: a single loader, such as the temporary loader a build
//!   may be given
//! - [`ClassLoaderService`]: the build-wide service, looked up by type from a
//!   [`ServiceRegistry`](super::ServiceRegistry)
//! - [`ClassLoaderAccess`]: what the override context and metadata provider
//!   consume; decides which loader serves a given name
//!
//! All implementations must be thread-safe (Send + Sync).

use crate::core::types::{ClassName, TypeError};
use thiserror::Error;

/// Errors from class loading.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassLoadingError {
    /// No loader knows the requested class.
    #[error("unable to load class '{0}'")]
    NotFound(String),

    /// The requested name is not a well-formed class name.
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    /// The build options do not provide the required service.
    #[error("service not registered: {0}")]
    ServiceNotFound(&'static str),
}

/// A class resolved by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadedClass {
    name: ClassName,
    loader: String,
}

impl LoadedClass {
    /// Record that `loader` resolved `name`.
    pub fn new(name: ClassName, loader: impl Into<String>) -> Self {
        Self {
            name,
            loader: loader.into(),
        }
    }

    /// The resolved class name.
    pub fn name(&self) -> &ClassName {
        &self.name
    }

    /// Label of the loader that resolved the class.
    pub fn loader(&self) -> &str {
        &self.loader
    }
}

/// A single class loader.
pub trait ClassLoader: Send + Sync {
    /// Load a class by its qualified name.
    ///
    /// # Errors
    ///
    /// Returns `ClassLoadingError::NotFound` if this loader does not know
    /// the class.
    fn load_class(&self, name: &str) -> Result<LoadedClass, ClassLoadingError>;
}

/// Build-wide class loading service.
pub trait ClassLoaderService: Send + Sync {
    /// Resolve a class by its qualified name.
    fn class_for_name(&self, name: &str) -> Result<LoadedClass, ClassLoadingError>;
}

/// Class loading capability handed to the override context and provider.
pub trait ClassLoaderAccess: Send + Sync {
    /// Resolve a class by its qualified name.
    ///
    /// # Errors
    ///
    /// Propagates failures from the underlying loader, and from resolving
    /// the loader itself for lazily bound implementations.
    fn class_for_name(&self, name: &str) -> Result<LoadedClass, ClassLoadingError>;
}
