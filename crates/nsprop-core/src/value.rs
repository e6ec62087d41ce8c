#![forbid(unsafe_code)]

//! Dynamic values bound in namespace variable tables.
//!
//! # Design
//!
//! [`Value`] is the unit of storage in a [`VarTable`](crate::table::VarTable):
//! plain data, native functions, computed-attribute declarations, dynamic
//! descriptors, and type objects are all first-class table entries. Payloads
//! sit behind `Arc`, so cloning a value is cheap and two clones alias the same
//! underlying function or type object.
//!
//! Equality is structural for data variants and identity-based for functions,
//! declarations, descriptors, and types: two independently constructed
//! closures are never equal, but clones of one are.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

use crate::error::AttrError;
use crate::property::{Descriptor, Property};

/// Signature of a namespace-level native function.
///
/// Statically bound: receives its arguments and nothing else, no implicit
/// receiver, even after relocation onto a proxy type.
pub type NativeFnInner = dyn Fn(&[Value]) -> Result<Value, AttrError> + Send + Sync;

/// A named native function bound in a namespace.
#[derive(Clone)]
pub struct NativeFn {
    name: Arc<str>,
    func: Arc<NativeFnInner>,
}

impl NativeFn {
    #[must_use]
    pub fn new(
        name: impl Into<Arc<str>>,
        func: impl Fn(&[Value]) -> Result<Value, AttrError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function with positional arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, AttrError> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name)
    }
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// A type object declared at a namespace's top level.
///
/// Carries a member table of its own, which may include [`Property`]
/// declarations intended for the type's *instances*. The classifier must
/// never treat the type itself as a computed attribute of the enclosing
/// namespace, accessor-shaped members notwithstanding.
#[derive(Clone, Debug)]
pub struct TypeDef {
    name: Arc<str>,
    members: AHashMap<String, Value>,
}

impl TypeDef {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            members: AHashMap::new(),
        }
    }

    /// Builder-style member addition.
    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// A dynamic value stored in a variable table.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Arc<Vec<Value>>),
    /// A native function; relocated onto the proxy type at migration.
    Fn(NativeFn),
    /// A computed-attribute declaration awaiting migration.
    Property(Property),
    /// A value exposing the read/write/delete protocol directly.
    Descriptor(Arc<dyn Descriptor>),
    /// A type object; never classified as a descriptor.
    Type(Arc<TypeDef>),
}

impl Value {
    #[must_use]
    pub fn list(items: impl Into<Vec<Value>>) -> Self {
        Self::List(Arc::new(items.into()))
    }

    #[must_use]
    pub fn descriptor(d: impl Descriptor + 'static) -> Self {
        Self::Descriptor(Arc::new(d))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => fmt::Debug::fmt(v, f),
            Self::Int(v) => fmt::Debug::fmt(v, f),
            Self::Float(v) => fmt::Debug::fmt(v, f),
            Self::Str(v) => fmt::Debug::fmt(v, f),
            Self::List(v) => fmt::Debug::fmt(v, f),
            Self::Fn(v) => fmt::Debug::fmt(v, f),
            Self::Property(v) => fmt::Debug::fmt(v, f),
            Self::Descriptor(_) => f.write_str("<descriptor>"),
            Self::Type(t) => write!(f, "<type {}>", t.name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Fn(a), Self::Fn(b)) => a == b,
            (Self::Descriptor(a), Self::Descriptor(b)) => Arc::ptr_eq(a, b),
            (Self::Type(a), Self::Type(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Arc::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_equality_is_structural() {
        assert_eq!(Value::from("abc"), Value::from("abc"));
        assert_eq!(Value::from(3), Value::from(3));
        assert_ne!(Value::from(3), Value::from(4));
        assert_ne!(Value::from("3"), Value::from(3));
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(
            Value::list([Value::from(1), Value::from(2)]),
            Value::list([Value::from(1), Value::from(2)])
        );
    }

    #[test]
    fn function_equality_is_identity() {
        let f = NativeFn::new("f", |_| Ok(Value::Null));
        let g = NativeFn::new("f", |_| Ok(Value::Null));
        assert_eq!(Value::Fn(f.clone()), Value::Fn(f.clone()));
        assert_ne!(Value::Fn(f), Value::Fn(g));
    }

    #[test]
    fn native_fn_calls_through() {
        let double = NativeFn::new("double", |args| {
            let n = args
                .first()
                .and_then(Value::as_int)
                .ok_or_else(|| AttrError::failed("double", "expected an int"))?;
            Ok(Value::from(n * 2))
        });
        assert_eq!(double.call(&[Value::from(21)]).unwrap(), Value::from(42));
        assert!(double.call(&[]).is_err());
    }

    #[test]
    fn type_members_are_reachable_but_private_to_the_type() {
        let ty = TypeDef::new("Point")
            .with_member("dims", Value::from(2))
            .with_member(
                "norm",
                Value::Property(Property::with_getter(|_| Ok(Value::from(0)))),
            );
        assert_eq!(ty.name(), "Point");
        assert_eq!(ty.member("dims"), Some(&Value::from(2)));
        assert_eq!(ty.member_count(), 2);
    }

    #[test]
    fn debug_formats() {
        let f = NativeFn::new("greet", |_| Ok(Value::Null));
        assert_eq!(format!("{f:?}"), "<fn greet>");
    }
}
