//! overrides::document
//!
//! Already-parsed override document payload.
//!
//! Parsing the document format is someone else's job; this type is what the
//! parser hands over. Class names may be unqualified, in which case they are
//! resolved against the document's default package.

use serde::{Deserialize, Serialize};

/// Parsed contents of one override document.
///
/// # Example
///
/// ```
/// use metacache::overrides::OverrideDocument;
///
/// let doc = OverrideDocument::new("META-INF/orm.xml")
///     .with_package("com.acme")
///     .with_entity("Order")
///     .with_entity_listener("com.acme.audit.AuditListener");
///
/// assert_eq!(doc.qualify("Order"), "com.acme.Order");
/// assert_eq!(doc.qualify("com.other.Invoice"), "com.other.Invoice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideDocument {
    /// Where the document came from (file path, resource name)
    pub origin: String,

    /// Default package for unqualified class names
    #[serde(default)]
    pub package: Option<String>,

    /// Entity classes the document maps
    #[serde(default)]
    pub entities: Vec<String>,

    /// Default entity listener classes
    #[serde(default)]
    pub entity_listeners: Vec<String>,
}

impl OverrideDocument {
    /// Create an empty document from the given origin.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            package: None,
            entities: Vec::new(),
            entity_listeners: Vec::new(),
        }
    }

    /// Set the default package.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Add a mapped entity class.
    pub fn with_entity(mut self, class: impl Into<String>) -> Self {
        self.entities.push(class.into());
        self
    }

    /// Add a default entity listener class.
    pub fn with_entity_listener(mut self, class: impl Into<String>) -> Self {
        self.entity_listeners.push(class.into());
        self
    }

    /// Qualify a class name with the default package.
    ///
    /// Names that already contain a `.`, and all names when no package is
    /// set, are returned unchanged.
    pub fn qualify(&self, class: &str) -> String {
        match self.package.as_deref() {
            Some(package) if !package.is_empty() && !class.contains('.') => {
                format!("{}.{}", package, class)
            }
            _ => class.to_string(),
        }
    }
}
