//! core::types
//!
//! Strong types for program element handles.
//!
//! # Types
//!
//! - [`ClassName`] - Validated, dotted class name (`com.acme.Order`)
//! - [`MemberName`] - Validated field or method identifier
//! - [`AnnotatedElement`] - Handle to a class, field, or method
//!
//! # Validation
//!
//! Names are checked at construction time, so an `AnnotatedElement` used as
//! a cache key always refers to a well-formed element.
//!
//! # Examples
//!
//! ```
//! use metacache::core::types::{AnnotatedElement, ClassName};
//!
//! let order = ClassName::new("com.acme.Order").unwrap();
//! assert_eq!(order.simple_name(), "Order");
//! assert_eq!(order.package(), Some("com.acme"));
//!
//! let field = AnnotatedElement::field("com.acme.Order", "id").unwrap();
//! assert_eq!(field.to_string(), "com.acme.Order#id");
//!
//! assert!(ClassName::new("com..acme").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid class name: {0}")]
    InvalidClassName(String),

    #[error("invalid member name: {0}")]
    InvalidMemberName(String),
}

/// Check a single identifier segment.
///
/// Segments start with a letter, `_` or `$` and continue with letters,
/// digits, `_` or `$`.
fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// A validated, fully or partially qualified class name.
///
/// Class names are dot-separated identifier segments. Nested classes use `$`
/// inside the last segment (`com.acme.Order$Line`).
///
/// # Example
///
/// ```
/// use metacache::core::types::ClassName;
///
/// let name = ClassName::new("com.acme.Order$Line").unwrap();
/// assert_eq!(name.simple_name(), "Order$Line");
/// assert!(name.is_qualified());
///
/// assert!(ClassName::new("").is_err());
/// assert!(ClassName::new(".Order").is_err());
/// assert!(ClassName::new("com.1acme.Order").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    /// Create a new validated class name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidClassName` if any segment is empty or not
    /// an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidClassName(
                "class name cannot be empty".into(),
            ));
        }

        for segment in name.split('.') {
            if segment.is_empty() {
                return Err(TypeError::InvalidClassName(format!(
                    "'{}' contains an empty segment",
                    name
                )));
            }
            if !is_identifier(segment) {
                return Err(TypeError::InvalidClassName(format!(
                    "'{}' is not a valid identifier in '{}'",
                    segment, name
                )));
            }
        }

        Ok(())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment of the name.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last segment, if the name is qualified.
    pub fn package(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(package, _)| package)
    }

    /// Whether the name carries a package prefix.
    pub fn is_qualified(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClassName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClassName> for String {
    fn from(name: ClassName) -> Self {
        name.0
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated field or method name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberName(String);

impl MemberName {
    /// Create a new validated member name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidMemberName` unless the name is a single
    /// identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(TypeError::InvalidMemberName(format!(
                "'{}' is not a valid identifier",
                name
            )));
        }
        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MemberName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MemberName> for String {
    fn from(name: MemberName) -> Self {
        name.0
    }
}

/// Handle to a program element that may carry annotations.
///
/// Equality and hashing are structural: two handles naming the same class,
/// field, or method overload are the same cache key.
///
/// # Example
///
/// ```
/// use metacache::core::types::AnnotatedElement;
///
/// let a = AnnotatedElement::method("com.acme.Order", "total", &["int"]).unwrap();
/// let b = AnnotatedElement::method("com.acme.Order", "total", &["int"]).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "com.acme.Order#total(int)");
/// assert_eq!(a.owner().as_str(), "com.acme.Order");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotatedElement {
    /// A class (or interface, enum, record).
    Class(ClassName),

    /// A field declared on `owner`.
    Field { owner: ClassName, name: MemberName },

    /// A method declared on `owner`, identified by its parameter types.
    Method {
        owner: ClassName,
        name: MemberName,
        parameters: Vec<ClassName>,
    },
}

impl AnnotatedElement {
    /// Handle for a class.
    pub fn class(name: &str) -> Result<Self, TypeError> {
        Ok(Self::Class(ClassName::new(name)?))
    }

    /// Handle for a field.
    pub fn field(owner: &str, name: &str) -> Result<Self, TypeError> {
        Ok(Self::Field {
            owner: ClassName::new(owner)?,
            name: MemberName::new(name)?,
        })
    }

    /// Handle for a method overload.
    pub fn method(owner: &str, name: &str, parameters: &[&str]) -> Result<Self, TypeError> {
        let parameters = parameters
            .iter()
            .map(|p| ClassName::new(*p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Method {
            owner: ClassName::new(owner)?,
            name: MemberName::new(name)?,
            parameters,
        })
    }

    /// The class this element is, or is declared on.
    pub fn owner(&self) -> &ClassName {
        match self {
            AnnotatedElement::Class(name) => name,
            AnnotatedElement::Field { owner, .. } | AnnotatedElement::Method { owner, .. } => owner,
        }
    }

    /// Short label for the element kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AnnotatedElement::Class(_) => "class",
            AnnotatedElement::Field { .. } => "field",
            AnnotatedElement::Method { .. } => "method",
        }
    }
}

impl fmt::Display for AnnotatedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotatedElement::Class(name) => write!(f, "{}", name),
            AnnotatedElement::Field { owner, name } => write!(f, "{}#{}", owner, name),
            AnnotatedElement::Method {
                owner,
                name,
                parameters,
            } => {
                let params = parameters
                    .iter()
                    .map(ClassName::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}#{}({})", owner, name, params)
            }
        }
    }
}
