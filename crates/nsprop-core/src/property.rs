#![forbid(unsafe_code)]

//! Computed-attribute declarations and the accessor protocol.
//!
//! # Design
//!
//! A [`Property`] is the declaration form callers write at a namespace's top
//! level: an immutable record of up to three functions (get, set, delete)
//! plus optional doc text. At migration time it is converted into the bound
//! [`Accessor`] form and installed on the namespace's proxy type.
//!
//! [`Descriptor`] is the read/write/delete protocol both forms speak; any
//! value implementing it qualifies as a computed attribute in its own right.
//! [`AttrContext`] is the handle accessor functions receive so they can reach
//! sibling bindings of the same namespace (the proxy implements it and passes
//! itself).
//!
//! # Invariants
//!
//! 1. A declaration always carries at least one function slot; constructing
//!    with none is a [`DeclError::EmptySlots`].
//! 2. `getter`/`setter`/`deleter` return a *new* declaration with exactly one
//!    slot replaced. The receiver is never mutated, so chained declarations
//!    can be built from a shared base without aliasing surprises.
//! 3. Writing through an [`Accessor`] with no setter fails with
//!    [`AttrError::ReadOnly`]; deleting with no deleter fails with
//!    [`AttrError::NoDeleter`]. Neither is ever swallowed.

use std::fmt;
use std::sync::Arc;

use crate::error::{AttrError, DeclError};
use crate::value::Value;

/// Attribute-protocol view of a namespace, handed to accessor functions.
///
/// Accessors receive the proxy itself through this trait, so a getter can
/// read sibling attributes and a setter can store through them.
pub trait AttrContext {
    /// Read an attribute of the owning namespace.
    fn get_attr(&self, name: &str) -> Result<Value, AttrError>;

    /// Write an attribute of the owning namespace.
    fn set_attr(&self, name: &str, value: Value) -> Result<(), AttrError>;

    /// Delete an attribute of the owning namespace.
    fn del_attr(&self, name: &str) -> Result<(), AttrError>;
}

/// Getter function slot.
pub type GetterFn = Arc<dyn Fn(&dyn AttrContext) -> Result<Value, AttrError> + Send + Sync>;
/// Setter function slot.
pub type SetterFn = Arc<dyn Fn(&dyn AttrContext, Value) -> Result<(), AttrError> + Send + Sync>;
/// Deleter function slot.
pub type DeleterFn = Arc<dyn Fn(&dyn AttrContext) -> Result<(), AttrError> + Send + Sync>;

/// The read/write/delete protocol of a computed attribute.
///
/// Values exposing this protocol are relocated onto the proxy type at
/// migration. Write and delete refuse by default, matching an attribute
/// backed only by a getter.
pub trait Descriptor: Send + Sync {
    /// Read the attribute. `attr` is the name it is bound under.
    fn read(&self, cx: &dyn AttrContext, attr: &str) -> Result<Value, AttrError>;

    /// Write the attribute.
    fn write(&self, _cx: &dyn AttrContext, attr: &str, _value: Value) -> Result<(), AttrError> {
        Err(AttrError::ReadOnly { attr: attr.into() })
    }

    /// Delete the attribute.
    fn delete(&self, _cx: &dyn AttrContext, attr: &str) -> Result<(), AttrError> {
        Err(AttrError::NoDeleter { attr: attr.into() })
    }

    /// Documentation text, if any.
    fn doc(&self) -> Option<&str> {
        None
    }
}

/// A computed-attribute declaration.
///
/// Built at a namespace's top level and converted into an [`Accessor`] on the
/// proxy type when the namespace migrates. Immutable after construction; the
/// chaining methods produce new declarations.
#[derive(Clone)]
pub struct Property {
    get: Option<GetterFn>,
    set: Option<SetterFn>,
    del: Option<DeleterFn>,
    doc: Option<Arc<str>>,
}

impl Property {
    /// Construct from explicit slots. Fails if all three functions are absent.
    pub fn from_parts(
        get: Option<GetterFn>,
        set: Option<SetterFn>,
        del: Option<DeleterFn>,
        doc: Option<Arc<str>>,
    ) -> Result<Self, DeclError> {
        if get.is_none() && set.is_none() && del.is_none() {
            return Err(DeclError::EmptySlots);
        }
        Ok(Self { get, set, del, doc })
    }

    /// Declaration with only a getter.
    #[must_use]
    pub fn with_getter(
        f: impl Fn(&dyn AttrContext) -> Result<Value, AttrError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Some(Arc::new(f)),
            set: None,
            del: None,
            doc: None,
        }
    }

    /// Declaration with only a setter.
    #[must_use]
    pub fn with_setter(
        f: impl Fn(&dyn AttrContext, Value) -> Result<(), AttrError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: None,
            set: Some(Arc::new(f)),
            del: None,
            doc: None,
        }
    }

    /// Declaration with only a deleter.
    #[must_use]
    pub fn with_deleter(
        f: impl Fn(&dyn AttrContext) -> Result<(), AttrError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: None,
            set: None,
            del: Some(Arc::new(f)),
            doc: None,
        }
    }

    /// New declaration with the getter slot replaced.
    #[must_use]
    pub fn getter(
        &self,
        f: impl Fn(&dyn AttrContext) -> Result<Value, AttrError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Some(Arc::new(f)),
            set: self.set.clone(),
            del: self.del.clone(),
            doc: self.doc.clone(),
        }
    }

    /// New declaration with the setter slot replaced.
    #[must_use]
    pub fn setter(
        &self,
        f: impl Fn(&dyn AttrContext, Value) -> Result<(), AttrError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: self.get.clone(),
            set: Some(Arc::new(f)),
            del: self.del.clone(),
            doc: self.doc.clone(),
        }
    }

    /// New declaration with the deleter slot replaced.
    #[must_use]
    pub fn deleter(
        &self,
        f: impl Fn(&dyn AttrContext) -> Result<(), AttrError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
            del: Some(Arc::new(f)),
            doc: self.doc.clone(),
        }
    }

    /// New declaration with the doc text replaced.
    #[must_use]
    pub fn with_doc(&self, doc: impl Into<Arc<str>>) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
            del: self.del.clone(),
            doc: Some(doc.into()),
        }
    }

    #[must_use]
    pub fn has_getter(&self) -> bool {
        self.get.is_some()
    }

    #[must_use]
    pub fn has_setter(&self) -> bool {
        self.set.is_some()
    }

    #[must_use]
    pub fn has_deleter(&self) -> bool {
        self.del.is_some()
    }

    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .field("del", &self.del.is_some())
            .field("doc", &self.doc)
            .finish()
    }
}

/// The bound, native form of a computed attribute.
///
/// Produced from a [`Property`] at migration time and installed on the proxy
/// type; all access from then on routes through it.
#[derive(Clone)]
pub struct Accessor {
    get: Option<GetterFn>,
    set: Option<SetterFn>,
    del: Option<DeleterFn>,
    doc: Option<Arc<str>>,
}

impl Accessor {
    /// Bind a declaration's slots into the native accessor form.
    #[must_use]
    pub fn from_property(p: &Property) -> Self {
        Self {
            get: p.get.clone(),
            set: p.set.clone(),
            del: p.del.clone(),
            doc: p.doc.clone(),
        }
    }
}

impl Descriptor for Accessor {
    fn read(&self, cx: &dyn AttrContext, attr: &str) -> Result<Value, AttrError> {
        match &self.get {
            Some(get) => get(cx),
            None => Err(AttrError::Unreadable { attr: attr.into() }),
        }
    }

    fn write(&self, cx: &dyn AttrContext, attr: &str, value: Value) -> Result<(), AttrError> {
        match &self.set {
            Some(set) => set(cx, value),
            None => Err(AttrError::ReadOnly { attr: attr.into() }),
        }
    }

    fn delete(&self, cx: &dyn AttrContext, attr: &str) -> Result<(), AttrError> {
        match &self.del {
            Some(del) => del(cx),
            None => Err(AttrError::NoDeleter { attr: attr.into() }),
        }
    }

    fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("get", &self.get.is_some())
            .field("set", &self.set.is_some())
            .field("del", &self.del.is_some())
            .field("doc", &self.doc)
            .finish()
    }
}
