//! Property-based tests for the reader cache.
//!
//! These tests use proptest to verify the memoization and override-gate
//! invariants across randomly generated element handles and request orders.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use metacache::classloading::{
    ClassLoaderAccess, ClassLoaderService, StandardClassLoaderAccess, StaticClassLoader,
};
use metacache::core::types::{AnnotatedElement, ClassName};
use metacache::overrides::OverrideDocument;
use metacache::reflection::mock::CountingMetadataProvider;
use metacache::reflection::MetadataProvider;
use metacache::CachingMetadataProvider;

/// Strategy for generating identifiers.
fn identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,8}"
}

/// Strategy for generating dotted class names.
fn class_name() -> impl Strategy<Value = String> {
    prop::collection::vec(identifier(), 1..4).prop_map(|segments| segments.join("."))
}

/// Strategy for generating element handles of every kind.
fn element() -> impl Strategy<Value = AnnotatedElement> {
    prop_oneof![
        class_name().prop_map(|c| AnnotatedElement::class(&c).unwrap()),
        (class_name(), identifier()).prop_map(|(c, f)| AnnotatedElement::field(&c, &f).unwrap()),
        (class_name(), identifier(), prop::collection::vec(class_name(), 0..3)).prop_map(
            |(c, m, params)| {
                let params: Vec<&str> = params.iter().map(String::as_str).collect();
                AnnotatedElement::method(&c, &m, &params).unwrap()
            }
        ),
    ]
}

fn access() -> Arc<dyn ClassLoaderAccess> {
    let service: Arc<dyn ClassLoaderService> = Arc::new(StaticClassLoader::new("app"));
    Arc::new(StandardClassLoaderAccess::from_service(service))
}

proptest! {
    /// Generated class names always pass validation.
    #[test]
    fn generated_class_names_valid(name in class_name()) {
        prop_assert!(ClassName::new(name).is_ok());
    }

    /// Any request sequence hits the delegate exactly once per distinct element,
    /// and every repeat returns the identical reader.
    #[test]
    fn delegate_called_once_per_element(
        requests in prop::collection::vec(element(), 1..40)
    ) {
        let delegate = CountingMetadataProvider::new();
        let provider = CachingMetadataProvider::new(access(), Arc::new(delegate.clone()));

        let distinct: HashSet<_> = requests.iter().cloned().collect();
        for element in &requests {
            let first = provider.annotation_reader(element).unwrap();
            let again = provider.annotation_reader(element).unwrap();
            prop_assert!(Arc::ptr_eq(&first, &again));
            prop_assert_eq!(first.element(), element);
        }

        prop_assert_eq!(provider.cached_len(), distinct.len());
        prop_assert_eq!(delegate.total_calls(), distinct.len());
        for element in &distinct {
            prop_assert_eq!(delegate.calls_for(element), 1);
        }
    }

    /// With overrides present, no element resolves and the cache stays empty.
    #[test]
    fn overrides_block_every_element(
        requests in prop::collection::vec(element(), 1..20)
    ) {
        let delegate = CountingMetadataProvider::new();
        let mut provider = CachingMetadataProvider::new(access(), Arc::new(delegate.clone()));
        provider
            .override_context_mut()
            .add_document(OverrideDocument::new("orm.xml"))
            .unwrap();

        for element in &requests {
            let result = provider.annotation_reader(element);
            prop_assert!(matches!(result, Err(ref e) if e.is_unsupported_feature()));
        }

        prop_assert_eq!(provider.cached_len(), 0);
        prop_assert_eq!(delegate.total_calls(), 0);
        prop_assert!(provider.defaults().is_empty());
    }
}
