#![forbid(unsafe_code)]

//! Runtime: the namespace registry, proxy objects, migration, and both
//! trigger strategies.
//!
//! The flow is one-directional: declarations accumulate in a namespace's
//! [`VarTable`](nsprop_core::VarTable) → the migrator relocates qualifying
//! entries onto the namespace's [`ProxyType`](crate::proxy::ProxyType) → the
//! registry substitutes the [`Proxy`](crate::proxy::Proxy) for the plain
//! namespace → a trigger strategy decides when the middle steps fire.

pub mod auto;
pub mod error;
pub mod loader;
pub mod migrate;
pub mod namespace;
pub mod proxy;
pub mod registry;

pub use auto::{LoadEvent, LoadObserver};
pub use error::{InitError, LoadError};
pub use loader::{Loader, NamespaceScope, Strategy};
pub use migrate::migrate;
pub use namespace::Namespace;
pub use proxy::{Proxy, ProxyType};
pub use registry::{LiveEntry, Registry, global};
