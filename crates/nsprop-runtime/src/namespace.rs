#![forbid(unsafe_code)]

//! Plain namespaces: a name bound to a shared variable table.

use std::fmt;
use std::sync::Arc;

use nsprop_core::{TableId, Value, VarTable};

/// A loadable unit's top-level namespace.
///
/// Cheaply cloneable handle; clones share the same table. This is the object
/// the registry holds before migration, and the object a proxy retains
/// afterwards so the original is not discarded while the proxy lives.
#[derive(Clone)]
pub struct Namespace {
    name: Arc<str>,
    table: VarTable,
}

impl Namespace {
    /// Fresh namespace over a new, empty table.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            table: VarTable::new(),
        }
    }

    /// Namespace over an existing table (a second view of the same storage).
    #[must_use]
    pub fn with_table(name: impl Into<Arc<str>>, table: VarTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn table(&self) -> &VarTable {
        &self.table
    }

    /// Identity of the backing table; what the pending set keys on.
    #[must_use]
    pub fn table_id(&self) -> TableId {
        self.table.id()
    }

    /// Bind a value directly in the table.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.table.insert(name, value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.table.get(name)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<namespace {:?}>", self.name())
    }
}
