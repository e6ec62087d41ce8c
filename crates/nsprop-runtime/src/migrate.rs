#![forbid(unsafe_code)]

//! The namespace migrator.
//!
//! One sweep over a variable table: computed-attribute declarations are bound
//! into their native accessor form, accessors and dynamic descriptors are
//! relocated onto the proxy *type*, native functions are relocated as
//! statically-bound callables, everything else stays in the table untouched.
//! Relocated entries are removed from the table so they cannot shadow
//! themselves.
//!
//! # Invariants
//!
//! 1. Non-qualifying entries are never touched, reordered, or removed.
//! 2. A sweep over a table with no qualifying entries is a no-op.
//! 3. Sweeping an already-migrated table degenerates to a no-op; the
//!    "already migrated" fast path relies on this.

use std::sync::Arc;

use smallvec::SmallVec;

use nsprop_core::{Accessor, Classified, VarTable, classify};

use crate::proxy::ProxyType;

/// Relocate every qualifying entry of `table` onto `ty`.
pub fn migrate(ty: &ProxyType, table: &VarTable) {
    // Collect candidate names in one pass; mutate afterwards so the table
    // lock is never held across the type's own locks.
    let mut moved: SmallVec<[String; 8]> = SmallVec::new();
    table.for_each(|name, value| {
        if !matches!(classify(value), Classified::Ordinary) {
            moved.push(name.to_string());
        }
    });

    let mut accessors = 0usize;
    let mut statics = 0usize;
    for name in moved {
        let Some(value) = table.remove(&name) else {
            continue;
        };
        match classify(&value) {
            Classified::Declared(p) => {
                ty.install_accessor(name, Arc::new(Accessor::from_property(p)));
                accessors += 1;
            }
            Classified::Dynamic(d) => {
                ty.install_accessor(name, Arc::clone(d));
                accessors += 1;
            }
            Classified::Callable(f) => {
                ty.install_static(name, f.clone());
                statics += 1;
            }
            // Rebound to something ordinary since the candidate pass: put it
            // back rather than dropping a live binding.
            Classified::Ordinary => {
                table.insert(name, value);
            }
        }
    }

    if accessors + statics > 0 {
        tracing::debug!(
            namespace = ty.name(),
            accessors,
            statics,
            "relocated table entries onto proxy type"
        );
    }
}
