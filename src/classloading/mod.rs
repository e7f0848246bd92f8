//! classloading
//!
//! Class loading capability for a metadata-build session.
//!
//! # Architecture
//!
//! - [`ClassLoaderAccess`] is the capability the override context and the
//!   metadata provider consume
//! - [`StandardClassLoaderAccess`] routes between a temporary loader and the
//!   [`ClassLoaderService`] found in a [`ServiceRegistry`]
//! - [`LazyClassLoaderAccess`] defers building that access until first use,
//!   for sessions started from [`MetadataBuildingOptions`]
//! - [`BootstrapContext`] carries an access that is already resolved
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use metacache::classloading::{
//!     BootstrapContext, ClassLoaderAccess, ClassLoaderService, ServiceRegistry,
//!     StandardBuildingOptions, StaticClassLoader,
//! };
//!
//! let service: Arc<dyn ClassLoaderService> =
//!     Arc::new(StaticClassLoader::from_names("app", ["com.acme.Order"]).unwrap());
//! let options = StandardBuildingOptions::new(ServiceRegistry::new().with_service(service));
//!
//! let context = BootstrapContext::from_options(&options).unwrap();
//! assert!(context.class_loader_access().class_for_name("com.acme.Order").is_ok());
//! ```

mod access;
mod lazy;
mod options;
mod registry;
mod static_loader;
mod traits;

pub use access::StandardClassLoaderAccess;
pub use lazy::LazyClassLoaderAccess;
pub use options::{BootstrapContext, MetadataBuildingOptions, StandardBuildingOptions};
pub use registry::ServiceRegistry;
pub use static_loader::StaticClassLoader;
pub use traits::{
    ClassLoader, ClassLoaderAccess, ClassLoaderService, ClassLoadingError, LoadedClass,
};
