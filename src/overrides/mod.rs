//! overrides
//!
//! Override context: the optional external metadata override source.
//!
//! # Design
//!
//! The surrounding pipeline parses override documents and registers the
//! results here. The metadata provider only ever asks one question of the
//! context: [`OverrideContext::has_overrides`]. Nothing here merges override
//! data into native annotations.
//!
//! # Persistence
//!
//! The context is the only piece of session state that is serialized. Only
//! the registered documents are written; the overridden classes and entity
//! listeners are rebuilt from them on deserialization. The class loader
//! access is not persisted, so a deserialized context must be re-bound with
//! [`OverrideContext::bind`] before more documents can be added.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use metacache::classloading::{ClassLoaderService, StandardClassLoaderAccess, StaticClassLoader};
//! use metacache::overrides::{OverrideContext, OverrideDocument};
//!
//! let service: Arc<dyn ClassLoaderService> = Arc::new(StaticClassLoader::new("app"));
//! let access = StandardClassLoaderAccess::from_service(service);
//! let mut context = OverrideContext::new(Arc::new(access));
//! assert!(!context.has_overrides());
//!
//! let document = OverrideDocument::new("orm.xml")
//!     .with_package("com.acme")
//!     .with_entity("Order");
//! context.add_document(document).unwrap();
//! assert!(context.has_overrides());
//! assert_eq!(context.overridden_classes()[0].as_str(), "com.acme.Order");
//! ```

mod document;

pub use document::OverrideDocument;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classloading::{ClassLoaderAccess, ClassLoadingError};
use crate::core::types::{ClassName, TypeError};
use crate::reflection::MetadataError;

/// Registered override documents for one metadata-build session.
#[derive(Default, Serialize, Deserialize)]
#[serde(try_from = "PersistedContext")]
pub struct OverrideContext {
    #[serde(skip)]
    class_loader_access: Option<Arc<dyn ClassLoaderAccess>>,

    documents: Vec<OverrideDocument>,

    #[serde(skip)]
    overridden_classes: Vec<ClassName>,

    #[serde(skip)]
    entity_listeners: Vec<ClassName>,
}

/// Serialized form: the documents alone.
#[derive(Deserialize)]
struct PersistedContext {
    #[serde(default)]
    documents: Vec<OverrideDocument>,
}

impl TryFrom<PersistedContext> for OverrideContext {
    type Error = TypeError;

    fn try_from(persisted: PersistedContext) -> Result<Self, Self::Error> {
        let mut context = Self::default();
        for document in persisted.documents {
            let entities = qualified_names(&document, &document.entities)?;
            let listeners = qualified_names(&document, &document.entity_listeners)?;
            context.record(document, &entities, listeners);
        }
        Ok(context)
    }
}

fn qualified_names(
    document: &OverrideDocument,
    names: &[String],
) -> Result<Vec<ClassName>, TypeError> {
    names
        .iter()
        .map(|name| ClassName::new(document.qualify(name)))
        .collect()
}

impl OverrideContext {
    /// Create an empty context bound to a class loader access.
    pub fn new(class_loader_access: Arc<dyn ClassLoaderAccess>) -> Self {
        Self {
            class_loader_access: Some(class_loader_access),
            ..Self::default()
        }
    }

    /// Whether any override document has been registered.
    pub fn has_overrides(&self) -> bool {
        !self.documents.is_empty()
    }

    /// Bind (or re-bind) the class loader access.
    pub fn bind(&mut self, class_loader_access: Arc<dyn ClassLoaderAccess>) {
        self.class_loader_access = Some(class_loader_access);
    }

    /// Whether a class loader access is bound.
    pub fn is_bound(&self) -> bool {
        self.class_loader_access.is_some()
    }

    /// The bound class loader access, if any.
    pub fn class_loader_access(&self) -> Option<Arc<dyn ClassLoaderAccess>> {
        self.class_loader_access.clone()
    }

    /// Register a parsed override document.
    ///
    /// Entity and listener names are qualified with the document's package.
    /// Listener classes are loaded through the bound class loader access.
    /// Nothing is recorded unless every name is valid and every listener
    /// loads.
    ///
    /// Returns the qualified entity class names the document maps.
    ///
    /// # Errors
    ///
    /// - `MetadataError::ContextUnbound` if no class loader access is bound
    /// - `MetadataError::ClassLoading` for malformed names or listeners that
    ///   cannot be loaded
    pub fn add_document(
        &mut self,
        document: OverrideDocument,
    ) -> Result<Vec<ClassName>, MetadataError> {
        let access = self
            .class_loader_access
            .as_ref()
            .ok_or(MetadataError::ContextUnbound)?;

        let entities = qualified_names(&document, &document.entities)
            .map_err(ClassLoadingError::from)?;

        let mut listeners = Vec::with_capacity(document.entity_listeners.len());
        for name in &document.entity_listeners {
            let loaded = access.class_for_name(&document.qualify(name))?;
            listeners.push(loaded.name().clone());
        }

        tracing::debug!(
            origin = %document.origin,
            entities = entities.len(),
            listeners = listeners.len(),
            "Registered override document"
        );

        self.record(document, &entities, listeners);
        Ok(entities)
    }

    fn record(
        &mut self,
        document: OverrideDocument,
        entities: &[ClassName],
        listeners: Vec<ClassName>,
    ) {
        for entity in entities {
            if !self.overridden_classes.contains(entity) {
                self.overridden_classes.push(entity.clone());
            }
        }
        for listener in listeners {
            if !self.entity_listeners.contains(&listener) {
                self.entity_listeners.push(listener);
            }
        }
        self.documents.push(document);
    }

    /// Registered documents, in registration order.
    pub fn documents(&self) -> &[OverrideDocument] {
        &self.documents
    }

    /// Qualified entity classes mapped by any registered document.
    pub fn overridden_classes(&self) -> &[ClassName] {
        &self.overridden_classes
    }

    /// Whether any registered document maps the class.
    pub fn is_overridden(&self, class: &ClassName) -> bool {
        self.overridden_classes.contains(class)
    }

    /// Default entity listeners declared by registered documents.
    pub fn entity_listeners(&self) -> &[ClassName] {
        &self.entity_listeners
    }

    /// Serialize to JSON. The class loader access is not included.
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON. The result is unbound.
    ///
    /// Overridden classes and entity listeners are rebuilt from the
    /// documents; any other fields in the payload are ignored.
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Debug for OverrideContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideContext")
            .field("bound", &self.is_bound())
            .field("documents", &self.documents)
            .field("overridden_classes", &self.overridden_classes)
            .field("entity_listeners", &self.entity_listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classloading::{ClassLoaderService, StandardClassLoaderAccess, StaticClassLoader};

    fn access() -> Arc<dyn ClassLoaderAccess> {
        let service: Arc<dyn ClassLoaderService> = Arc::new(
            StaticClassLoader::from_names("app", ["com.acme.audit.AuditListener"]).unwrap(),
        );
        Arc::new(StandardClassLoaderAccess::from_service(service))
    }

    fn document() -> OverrideDocument {
        OverrideDocument::new("orm.xml")
            .with_package("com.acme")
            .with_entity("Order")
            .with_entity("com.acme.billing.Invoice")
            .with_entity_listener("audit.AuditListener")
    }

    mod registration_tests {
        use super::*;

        #[test]
        fn empty_context_has_no_overrides() {
            let context = OverrideContext::new(access());
            assert!(!context.has_overrides());
            assert!(context.is_bound());
            assert!(context.documents().is_empty());
        }

        #[test]
        fn add_document_qualifies_and_records() {
            let mut context = OverrideContext::new(access());
            let entities = context
                .add_document(
                    OverrideDocument::new("orm.xml")
                        .with_package("com.acme")
                        .with_entity("Order")
                        .with_entity("com.acme.billing.Invoice")
                        .with_entity_listener("com.acme.audit.AuditListener"),
                )
                .unwrap();

            let names: Vec<_> = entities.iter().map(ClassName::as_str).collect();
            assert_eq!(names, vec!["com.acme.Order", "com.acme.billing.Invoice"]);
            assert!(context.has_overrides());
            assert!(context.is_overridden(&ClassName::new("com.acme.Order").unwrap()));
            assert_eq!(context.entity_listeners().len(), 1);
        }

        #[test]
        fn document_without_entities_still_counts() {
            let mut context = OverrideContext::new(access());
            context.add_document(OverrideDocument::new("empty.xml")).unwrap();
            assert!(context.has_overrides());
            assert!(context.overridden_classes().is_empty());
        }

        #[test]
        fn duplicate_entities_recorded_once() {
            let mut context = OverrideContext::new(access());
            let doc = OverrideDocument::new("a.xml").with_entity("com.acme.Order");
            context.add_document(doc.clone()).unwrap();
            context.add_document(doc).unwrap();

            assert_eq!(context.documents().len(), 2);
            assert_eq!(context.overridden_classes().len(), 1);
        }

        #[test]
        fn unloadable_listener_rejects_document() {
            let mut context = OverrideContext::new(access());
            // "audit.AuditListener" already contains a dot, so it is not
            // qualified with the package and fails to load.
            let result = context.add_document(document());

            assert!(matches!(
                result,
                Err(MetadataError::ClassLoading(ClassLoadingError::NotFound(_)))
            ));
            assert!(!context.has_overrides());
            assert!(context.overridden_classes().is_empty());
        }

        #[test]
        fn invalid_entity_name_rejects_document() {
            let mut context = OverrideContext::new(access());
            let result =
                context.add_document(OverrideDocument::new("bad.xml").with_entity("Or der"));

            assert!(matches!(
                result,
                Err(MetadataError::ClassLoading(ClassLoadingError::InvalidName(_)))
            ));
            assert!(!context.has_overrides());
        }

        #[test]
        fn unbound_context_rejects_document() {
            let mut context = OverrideContext::default();
            assert!(matches!(
                context.add_document(OverrideDocument::new("orm.xml")),
                Err(MetadataError::ContextUnbound)
            ));
        }
    }

    mod persistence_tests {
        use super::*;

        #[test]
        fn json_roundtrip_drops_access() {
            let mut context = OverrideContext::new(access());
            context
                .add_document(OverrideDocument::new("orm.xml").with_entity("com.acme.Order"))
                .unwrap();

            let json = context.to_json().unwrap();
            let mut restored = OverrideContext::from_json(&json).unwrap();

            assert!(!restored.is_bound());
            assert!(restored.has_overrides());
            assert_eq!(restored.documents(), context.documents());
            assert_eq!(restored.overridden_classes(), context.overridden_classes());

            restored.bind(access());
            assert!(restored.is_bound());
            restored
                .add_document(OverrideDocument::new("more.xml"))
                .unwrap();
            assert_eq!(restored.documents().len(), 2);
        }

        #[test]
        fn derived_lists_rebuilt_from_documents() {
            let json = r#"{
                "documents": [],
                "overridden_classes": ["com.acme.Order"],
                "entity_listeners": ["com.acme.audit.AuditListener"]
            }"#;
            let restored = OverrideContext::from_json(json).unwrap();

            assert!(!restored.has_overrides());
            assert!(restored.overridden_classes().is_empty());
            assert!(restored.entity_listeners().is_empty());
        }

        #[test]
        fn restored_lists_match_documents() {
            let mut context = OverrideContext::new(access());
            context
                .add_document(
                    OverrideDocument::new("orm.xml")
                        .with_package("com.acme")
                        .with_entity("Order")
                        .with_entity_listener("com.acme.audit.AuditListener"),
                )
                .unwrap();

            let json = context.to_json().unwrap();
            assert!(!json.contains("overridden_classes"));

            let restored = OverrideContext::from_json(&json).unwrap();
            assert_eq!(restored.overridden_classes(), context.overridden_classes());
            assert_eq!(restored.entity_listeners(), context.entity_listeners());
        }

        #[test]
        fn invalid_persisted_name_rejected() {
            let json = r#"{"documents": [{"origin": "orm.xml", "entities": ["Or der"]}]}"#;
            assert!(matches!(
                OverrideContext::from_json(json),
                Err(MetadataError::Serialization(_))
            ));
        }

        #[test]
        fn malformed_json() {
            assert!(matches!(
                OverrideContext::from_json("{not json"),
                Err(MetadataError::Serialization(_))
            ));
        }
    }
}
