//! metacache - per-session annotation metadata resolution cache
//!
//! Given a program element handle (class, field, or method), metacache hands
//! out an [`AnnotationReader`](reflection::AnnotationReader) answering "does
//! this element carry annotation X, and with what values", memoizing one
//! reader per element for the lifetime of a metadata-build session. When an
//! external override document has been registered for the session, reader
//! resolution is refused instead of silently ignoring the overrides.
//!
//! # Architecture
//!
//! - [`provider`] - The reader cache and override gate
//! - [`overrides`] - Override context (presence of override documents)
//! - [`reflection`] - Annotation model, reader capability, native provider
//! - [`classloading`] - Class loading capability, eager and lazy
//! - [`core`] - Element handle types and configuration
//!
//! # Correctness Invariants
//!
//! 1. Each element maps to at most one reader, computed at most once
//! 2. A cached reader is never replaced or mutated
//! 3. While overrides are present, no new reader is ever produced
//!
//! # Logging
//!
//! Events are emitted through `tracing`. The library never installs a
//! subscriber.

pub mod classloading;
pub mod core;
pub mod overrides;
pub mod provider;
pub mod reflection;

pub use provider::CachingMetadataProvider;
pub use reflection::{MetadataError, MetadataProvider};
