//! Property-based invariant tests for the namespace migrator.
//!
//! These verify structural invariants of `migrate` that must hold for **any**
//! variable table:
//!
//! 1. Ordinary entries (plain values and type objects) survive a sweep
//!    unchanged.
//! 2. Declarations and dynamic descriptors all leave the table and resolve
//!    as accessors on the proxy type.
//! 3. Native functions all leave the table and resolve as statics.
//! 4. A second sweep changes nothing (idempotence).
//! 5. The table length after a sweep equals the count of ordinary entries.
//! 6. Access through the proxy keeps answering for every original name.

#![forbid(unsafe_code)]

use std::sync::Arc;

use proptest::prelude::*;

use nsprop_core::{NativeFn, Property, TypeDef, Value};
use nsprop_runtime::{Loader, Registry};

// ── Strategies ──────────────────────────────────────────────────────────

/// The kinds of binding a generated namespace can carry.
#[derive(Debug, Clone)]
enum Binding {
    Int(i64),
    Str(String),
    Null,
    TypeObj,
    Prop(i64),
    Func(i64),
}

impl Binding {
    fn to_value(&self, name: &str) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Str(s) => Value::from(s.clone()),
            Self::Null => Value::Null,
            Self::TypeObj => Value::Type(Arc::new(TypeDef::new(name.to_string()))),
            Self::Prop(n) => {
                let n = *n;
                Value::Property(Property::with_getter(move |_| Ok(Value::from(n))))
            }
            Self::Func(n) => {
                let n = *n;
                Value::Fn(NativeFn::new(name.to_string(), move |_| Ok(Value::from(n))))
            }
        }
    }

    fn is_ordinary(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Str(_) | Self::Null | Self::TypeObj)
    }

    /// The value reading this binding through the proxy must produce.
    fn expected(&self, name: &str) -> Option<Value> {
        match self {
            Self::Int(n) => Some(Value::from(*n)),
            Self::Str(s) => Some(Value::from(s.clone())),
            Self::Null => Some(Value::Null),
            Self::Prop(n) => Some(Value::from(*n)),
            Self::Func(_) => None, // resolves, but to a function identity
            Self::TypeObj => {
                let _ = name;
                None // resolves, but to a type identity
            }
        }
    }
}

fn binding() -> impl Strategy<Value = Binding> {
    prop_oneof![
        any::<i64>().prop_map(Binding::Int),
        "[a-z]{0,12}".prop_map(Binding::Str),
        Just(Binding::Null),
        Just(Binding::TypeObj),
        any::<i64>().prop_map(Binding::Prop),
        any::<i64>().prop_map(Binding::Func),
    ]
}

fn namespace_contents() -> impl Strategy<Value = std::collections::HashMap<String, Binding>> {
    proptest::collection::hash_map("[a-z_][a-z0-9_]{0,10}", binding(), 0..24)
}

// ═════════════════════════════════════════════════════════════════════════
// Invariants 1–6
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sweep_relocates_exactly_the_qualifying_entries(contents in namespace_contents()) {
        let registry = Registry::new();
        let entry = Loader::new(&registry)
            .load("generated", |scope| {
                for (name, binding) in &contents {
                    scope.define(name.clone(), binding.to_value(name));
                }
            })
            .unwrap();

        let has_computed = contents.values().any(|b| matches!(b, Binding::Prop(_)));
        prop_assert_eq!(entry.is_proxied(), has_computed,
            "proxied iff at least one computed attribute was declared");

        if let Some(proxy) = entry.as_proxy() {
            // 1 + 5: ordinary entries survive; nothing else stays.
            let ordinary = contents.values().filter(|b| b.is_ordinary()).count();
            prop_assert_eq!(proxy.table().len(), ordinary);

            for (name, binding) in &contents {
                match binding {
                    // 2: declarations became accessors.
                    Binding::Prop(_) => {
                        prop_assert!(proxy.ty().has_accessor(name));
                        prop_assert!(!proxy.table().contains(name));
                    }
                    // 3: functions became statics.
                    Binding::Func(_) => {
                        prop_assert!(proxy.ty().has_static(name));
                        prop_assert!(!proxy.table().contains(name));
                    }
                    _ => prop_assert!(proxy.table().contains(name)),
                }
                // 6: every original name still resolves.
                let resolved = entry.get(name);
                prop_assert!(resolved.is_ok(), "`{}` stopped resolving", name);
                if let Some(expected) = binding.expected(name) {
                    prop_assert_eq!(resolved.unwrap(), expected);
                }
            }
        } else {
            // No computed attributes: the namespace is left entirely alone.
            for name in contents.keys() {
                prop_assert!(entry.get(name).is_ok());
            }
        }
    }

    #[test]
    fn second_sweep_is_a_no_op(contents in namespace_contents()) {
        let registry = Registry::new();
        let loader = Loader::new(&registry);
        let entry = loader
            .load("generated", |scope| {
                for (name, binding) in &contents {
                    scope.define(name.clone(), binding.to_value(name));
                }
            })
            .unwrap();

        let Some(proxy) = entry.as_proxy() else {
            return Ok(());
        };
        let len_before = proxy.table().len();
        let sweeps_before = proxy.ty().migration_sweeps();

        // Explicit re-init: reuses the proxy, sweeps again, changes nothing.
        let again = registry.init(proxy.origin()).unwrap();
        prop_assert!(Arc::ptr_eq(&again, proxy));
        prop_assert_eq!(proxy.table().len(), len_before);
        prop_assert_eq!(proxy.ty().migration_sweeps(), sweeps_before + 1);

        for (name, binding) in &contents {
            if let Some(expected) = binding.expected(name) {
                prop_assert_eq!(entry.get(name).unwrap(), expected);
            }
        }
    }
}
