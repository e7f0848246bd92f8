//! reflection::annotation
//!
//! Annotation values and the reader capability.
//!
//! # Design
//!
//! An [`Annotation`] is a type name plus named member values. An
//! [`AnnotationReader`] answers queries for the annotations of one bound
//! element. Readers are immutable once built and are handed out as
//! `Arc<dyn AnnotationReader>`.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::types::{AnnotatedElement, ClassName};

/// Value of an annotation member.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    String(String),
    Int(i64),
    Bool(bool),
    Float(f64),
    /// Class literal
    Class(ClassName),
    /// Enum constant, e.g. `javax.persistence.FetchType.LAZY`
    Enum { type_name: ClassName, constant: String },
    Array(Vec<AnnotationValue>),
    /// Nested annotation
    Annotation(Box<Annotation>),
}

impl AnnotationValue {
    /// The string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnnotationValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::String(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::String(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Int(value)
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}

impl From<Annotation> for AnnotationValue {
    fn from(value: Annotation) -> Self {
        AnnotationValue::Annotation(Box::new(value))
    }
}

/// One annotation occurrence: its type and member values.
///
/// # Example
///
/// ```
/// use metacache::core::types::ClassName;
/// use metacache::reflection::Annotation;
///
/// let table = Annotation::new(ClassName::new("javax.persistence.Table").unwrap())
///     .with_value("name", "orders")
///     .with_value("schema", "sales");
///
/// assert_eq!(table.type_name().as_str(), "javax.persistence.Table");
/// assert_eq!(table.value("name").and_then(|v| v.as_str()), Some("orders"));
/// assert!(table.value("catalog").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    type_name: ClassName,
    values: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    /// Create an annotation with no member values.
    pub fn new(type_name: ClassName) -> Self {
        Self {
            type_name,
            values: BTreeMap::new(),
        }
    }

    /// Set a member value.
    pub fn with_value(
        mut self,
        member: impl Into<String>,
        value: impl Into<AnnotationValue>,
    ) -> Self {
        self.values.insert(member.into(), value.into());
        self
    }

    /// The annotation type.
    pub fn type_name(&self) -> &ClassName {
        &self.type_name
    }

    /// Value of one member, if set.
    pub fn value(&self, member: &str) -> Option<&AnnotationValue> {
        self.values.get(member)
    }

    /// All member values, ordered by member name.
    pub fn values(&self) -> &BTreeMap<String, AnnotationValue> {
        &self.values
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name)
    }
}

/// Capability answering annotation queries for one element.
///
/// `type_name` arguments are qualified annotation type names. Lookups by a
/// malformed name simply find nothing.
pub trait AnnotationReader: Send + Sync + fmt::Debug {
    /// The element this reader is bound to.
    fn element(&self) -> &AnnotatedElement;

    /// The annotation of the given type, if present.
    fn annotation(&self, type_name: &str) -> Option<&Annotation>;

    /// All annotations on the element, in declaration order.
    fn annotations(&self) -> &[Annotation];

    /// Whether an annotation of the given type is present.
    fn is_annotation_present(&self, type_name: &str) -> bool {
        self.annotation(type_name).is_some()
    }
}

/// Default member values shared across providers. Always empty here.
pub type Defaults = BTreeMap<String, AnnotationValue>;

static EMPTY_DEFAULTS: Defaults = BTreeMap::new();

/// The shared empty defaults map.
pub fn empty_defaults() -> &'static Defaults {
    &EMPTY_DEFAULTS
}
