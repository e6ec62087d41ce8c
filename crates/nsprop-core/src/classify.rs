#![forbid(unsafe_code)]

//! Descriptor classifier: decides how the migrator treats each table entry.
//!
//! Pure inspection, no side effects. The one subtle rule is the type-object
//! exclusion: a [`TypeDef`](crate::value::TypeDef) may carry accessor-shaped
//! members for its instances, but the type itself is never a computed
//! attribute of the enclosing namespace. Without the explicit exclusion,
//! a class defined at a namespace's top level would be captured and vanish
//! from the table.

use std::sync::Arc;

use crate::property::{Descriptor, Property};
use crate::value::{NativeFn, Value};

/// Outcome of inspecting one bound value.
pub enum Classified<'a> {
    /// A computed-attribute declaration; converted to an accessor and
    /// relocated onto the proxy type at migration.
    Declared(&'a Property),
    /// A value already exposing the read/write/delete protocol; relocated
    /// as-is.
    Dynamic(&'a Arc<dyn Descriptor>),
    /// A native function; relocated onto the proxy type as a statically-bound
    /// callable.
    Callable(&'a NativeFn),
    /// Everything else; left in the variable table untouched.
    Ordinary,
}

impl std::fmt::Debug for Classified<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Declared(_) => "Declared",
            Self::Dynamic(_) => "Dynamic",
            Self::Callable(_) => "Callable",
            Self::Ordinary => "Ordinary",
        })
    }
}

/// Classify one bound value.
#[must_use]
pub fn classify(value: &Value) -> Classified<'_> {
    match value {
        Value::Property(p) => Classified::Declared(p),
        // Type objects are never descriptors of the namespace, even when
        // their member tables carry accessor declarations.
        Value::Type(_) => Classified::Ordinary,
        Value::Descriptor(d) => Classified::Dynamic(d),
        Value::Fn(f) => Classified::Callable(f),
        _ => Classified::Ordinary,
    }
}

/// Whether a value enrolls its namespace for migration.
///
/// Only computed attributes count; a namespace holding nothing but plain
/// values and functions is left alone entirely.
#[must_use]
pub fn qualifies(value: &Value) -> bool {
    matches!(
        classify(value),
        Classified::Declared(_) | Classified::Dynamic(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttrError;
    use crate::property::AttrContext;
    use crate::value::TypeDef;

    struct Fixed;

    impl Descriptor for Fixed {
        fn read(&self, _cx: &dyn AttrContext, _attr: &str) -> Result<Value, AttrError> {
            Ok(Value::from(7))
        }
    }

    #[test]
    fn declarations_classify_as_declared() {
        let v = Value::Property(Property::with_getter(|_| Ok(Value::Null)));
        assert!(matches!(classify(&v), Classified::Declared(_)));
        assert!(qualifies(&v));
    }

    #[test]
    fn protocol_values_classify_as_dynamic() {
        let v = Value::descriptor(Fixed);
        assert!(matches!(classify(&v), Classified::Dynamic(_)));
        assert!(qualifies(&v));
    }

    #[test]
    fn functions_classify_as_callable_but_do_not_enroll() {
        let v = Value::Fn(NativeFn::new("f", |_| Ok(Value::Null)));
        assert!(matches!(classify(&v), Classified::Callable(_)));
        assert!(!qualifies(&v));
    }

    #[test]
    fn plain_values_are_ordinary() {
        for v in [Value::Null, Value::from(1), Value::from("s"), Value::from(true)] {
            assert!(matches!(classify(&v), Classified::Ordinary));
            assert!(!qualifies(&v));
        }
    }

    #[test]
    fn type_objects_are_excluded_even_with_accessor_members() {
        let ty = TypeDef::new("Point").with_member(
            "norm",
            Value::Property(Property::with_getter(|_| Ok(Value::from(0)))),
        );
        let v = Value::Type(Arc::new(ty));
        assert!(matches!(classify(&v), Classified::Ordinary));
        assert!(!qualifies(&v));
    }
}
