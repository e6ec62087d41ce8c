#![forbid(unsafe_code)]

//! Shared variable tables.
//!
//! A [`VarTable`] is the single mutable key-value store behind one namespace.
//! Cloning the handle does not copy the storage: the plain namespace and its
//! proxy hold clones of the same table, so reads and writes through either
//! path stay consistent. Identity (not content) distinguishes tables: two
//! structurally identical namespaces are still distinct, which is what the
//! pending-initialization set keys on.

use std::sync::{Arc, PoisonError, RwLock};

use ahash::AHashMap;

use crate::value::Value;

/// Identity key of a variable table, stable for the table's lifetime.
///
/// Derived from the allocation address of the shared storage; clones of one
/// handle share it, independently created tables never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

/// A shared, mutable variable table.
#[derive(Clone, Default)]
pub struct VarTable {
    slots: Arc<RwLock<AHashMap<String, Value>>>,
}

impl VarTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the shared storage.
    #[must_use]
    pub fn id(&self) -> TableId {
        TableId(Arc::as_ptr(&self.slots) as usize)
    }

    /// Bind `name` to `value`, returning the previous binding if any.
    pub fn insert(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.write().insert(name.into(), value)
    }

    /// Clone out the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.read().get(name).cloned()
    }

    /// Remove and return the binding for `name`.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.write().remove(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Visit every binding under one read lock.
    ///
    /// The callback must not touch the table itself; use the snapshot-style
    /// accessors for that.
    pub fn for_each(&self, mut f: impl FnMut(&str, &Value)) {
        for (name, value) in self.read().iter() {
            f(name, value);
        }
    }

    /// Snapshot of the bound names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AHashMap<String, Value>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AHashMap<String, Value>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for VarTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VarTable")
            .field("id", &self.id())
            .field("len", &self.len())
            .finish()
    }
}
