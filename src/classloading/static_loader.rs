//! classloading::static_loader
//!
//! In-memory class loader over a fixed set of class names.
//!
//! Serves both as a temporary [`ClassLoader`] and as the build-wide
//! [`ClassLoaderService`]. Configuration builds one of each from its
//! `class_loading.classes` and `class_loading.temp_classes` lists.

use std::collections::BTreeSet;

use super::traits::{ClassLoader, ClassLoaderService, ClassLoadingError, LoadedClass};
use crate::core::types::{ClassName, TypeError};

/// Class loader that knows a fixed set of classes.
///
/// # Example
///
/// ```
/// use metacache::classloading::{ClassLoader, StaticClassLoader};
///
/// let loader = StaticClassLoader::from_names("app", ["com.acme.Order"]).unwrap();
/// let class = loader.load_class("com.acme.Order").unwrap();
/// assert_eq!(class.loader(), "app");
/// assert!(loader.load_class("com.acme.Missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticClassLoader {
    label: String,
    classes: BTreeSet<ClassName>,
}

impl StaticClassLoader {
    /// Create an empty loader with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            classes: BTreeSet::new(),
        }
    }

    /// Create a loader from a list of class names.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidClassName` for the first malformed name.
    pub fn from_names<I, S>(label: impl Into<String>, names: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut loader = Self::new(label);
        for name in names {
            loader.register(ClassName::new(name.as_ref())?);
        }
        Ok(loader)
    }

    /// Make a class known to this loader.
    pub fn register(&mut self, name: ClassName) -> &mut Self {
        self.classes.insert(name);
        self
    }

    /// Label reported on every [`LoadedClass`] from this loader.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of known classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no classes are known.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn lookup(&self, name: &str) -> Result<LoadedClass, ClassLoadingError> {
        let name = ClassName::new(name)?;
        if self.classes.contains(&name) {
            Ok(LoadedClass::new(name, self.label.clone()))
        } else {
            Err(ClassLoadingError::NotFound(name.into()))
        }
    }
}

impl ClassLoader for StaticClassLoader {
    fn load_class(&self, name: &str) -> Result<LoadedClass, ClassLoadingError> {
        self.lookup(name)
    }
}

impl ClassLoaderService for StaticClassLoader {
    fn class_for_name(&self, name: &str) -> Result<LoadedClass, ClassLoadingError> {
        self.lookup(name)
    }
}
