#![forbid(unsafe_code)]

//! nsprop public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users: declare
//! getter/setter-backed attributes at a namespace's top level and read or
//! write them like ordinary bindings once the namespace is live.
//!
//! # Example
//!
//! ```
//! use nsprop::{Loader, Property, Registry, Value};
//!
//! let registry = Registry::new();
//! let sensors = Loader::new(&registry)
//!     .load("sensors", |scope| {
//!         scope.define("value", Value::Null);
//!         scope.define(
//!             "label",
//!             Value::Property(
//!                 Property::with_getter(|_cx| Ok(Value::from("got read")))
//!                     .setter(|cx, v| cx.set_attr("value", v)),
//!             ),
//!         );
//!     })
//!     .unwrap();
//!
//! assert_eq!(sensors.get("label").unwrap(), Value::from("got read"));
//! sensors.set("label", Value::from("world")).unwrap();
//! assert_eq!(sensors.get("value").unwrap(), Value::from("world"));
//! ```

pub use nsprop_core::{
    Accessor, AttrContext, AttrError, Classified, DeclError, Descriptor, NativeFn, Property,
    TableId, TypeDef, Value, VarTable, classify, qualifies,
};
pub use nsprop_runtime::{
    InitError, LiveEntry, LoadError, LoadEvent, LoadObserver, Loader, Namespace, NamespaceScope,
    Proxy, ProxyType, Registry, Strategy, global,
};

pub mod prelude {
    pub use nsprop_core as core;
    pub use nsprop_runtime as runtime;
}
