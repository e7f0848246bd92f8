//! core
//!
//! Core domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ClassName, MemberName, AnnotatedElement
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod types;
