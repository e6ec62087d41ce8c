#![forbid(unsafe_code)]

//! Strategy A: migrate when a namespace's top-level setup completes.
//!
//! The completion signal is explicit: [`Registry::complete_load`](crate::Registry::complete_load)
//! fires once per namespace, and this module keeps the bookkeeping between
//! declaration time and that signal:
//!
//! - a **pending set** of namespaces that declared at least one computed
//!   attribute and have not been migrated, keyed by table *identity* (two
//!   structurally identical namespaces stay distinct);
//! - a **completion hook** engaged lazily when the first namespace enrolls,
//!   chained through to any user-installed [`LoadObserver`], and released
//!   once the pending set drains.
//!
//! # Invariants
//!
//! 1. A table id is removed from the pending set exactly once, at migration.
//! 2. The hook is engaged while and only while the pending set is non-empty
//!    (observed under the state lock).
//! 3. User observers keep receiving completion events while the hook is
//!    engaged.

use std::sync::{Mutex, PoisonError};

use ahash::AHashMap;

use nsprop_core::TableId;

use crate::namespace::Namespace;
use crate::registry::Registry;

/// A namespace finished executing its top-level setup.
#[derive(Clone, Debug)]
pub struct LoadEvent {
    namespace: Namespace,
}

impl LoadEvent {
    pub(crate) fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.namespace.name()
    }

    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}

/// Observer of namespace load completions.
///
/// Diagnostics-oriented: observers see every completion, including those of
/// namespaces with no computed attributes at all.
pub trait LoadObserver: Send + Sync {
    fn loaded(&self, registry: &Registry, event: &LoadEvent);
}

struct PendingState {
    pending: AHashMap<TableId, Namespace>,
    engaged: bool,
}

/// Pending-set and hook bookkeeping. One per [`Registry`].
pub(crate) struct AutoInit {
    state: Mutex<PendingState>,
}

impl AutoInit {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(PendingState {
                pending: AHashMap::new(),
                engaged: false,
            }),
        }
    }

    /// Enroll a namespace; returns true when this engages the hook.
    pub(crate) fn enroll(&self, ns: &Namespace) -> bool {
        let mut state = self.lock();
        state.pending.insert(ns.table_id(), ns.clone());
        if state.engaged {
            false
        } else {
            state.engaged = true;
            true
        }
    }

    /// Claim the pending namespace for `id`, if the hook is engaged.
    pub(crate) fn take(&self, id: TableId) -> Option<Namespace> {
        let mut state = self.lock();
        if !state.engaged {
            return None;
        }
        state.pending.remove(&id)
    }

    /// Release the hook if nothing is pending; returns true on release.
    pub(crate) fn disengage_if_drained(&self) -> bool {
        let mut state = self.lock();
        if state.engaged && state.pending.is_empty() {
            state.engaged = false;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub(crate) fn is_engaged(&self) -> bool {
        self.lock().engaged
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PendingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
