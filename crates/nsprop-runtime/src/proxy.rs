#![forbid(unsafe_code)]

//! Proxy objects and their per-namespace types.
//!
//! # Design
//!
//! A [`Proxy`] is the stand-in object substituted into the registry in place
//! of a plain namespace. It aliases the namespace's variable table (ordinary
//! bindings stay shared) and owns a [`ProxyType`] unique to that namespace:
//! the type is where migrated accessors and statically-bound functions live,
//! so no namespace's computed attributes can leak into another's.
//!
//! Attribute resolution order is accessors → table → statics: a computed
//! attribute always wins, an ordinary binding shadows a relocated function.
//!
//! # First-access guard
//!
//! A freshly built type is *pending*: the one-time migration has not run yet.
//! Every access funnels through [`Proxy::ensure_ready`], a double-checked
//! guard (atomic flag + mutex). Under the on-first-use strategy, the first
//! read, write, delete, or call of any attribute performs the migration;
//! racing threads serialize on the mutex and the losers fall through to an
//! already-migrated type. Migration itself never runs accessor code, so it
//! cannot re-enter the guard.
//!
//! # Invariants
//!
//! 1. `is_migrated()` is monotonic: once true, never false again.
//! 2. At most one thread executes a migration sweep at a time.
//! 3. No lock is held while user accessor code runs.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use ahash::AHashMap;

use nsprop_core::{AttrContext, AttrError, Descriptor, NativeFn, Value, VarTable};

use crate::migrate::migrate;
use crate::namespace::Namespace;

/// The dedicated type of one namespace's proxy.
///
/// Carries the migrated attribute tables shared by every handle to the
/// proxy, plus the migration guard state.
pub struct ProxyType {
    name: Arc<str>,
    accessors: RwLock<AHashMap<String, Arc<dyn Descriptor>>>,
    statics: RwLock<AHashMap<String, NativeFn>>,
    /// Armed until the first migration sweep completes.
    pending: AtomicBool,
    /// Serializes migration sweeps.
    migration: Mutex<()>,
    /// Diagnostics: number of migration sweeps executed.
    sweeps: AtomicU32,
}

impl ProxyType {
    pub(crate) fn new(name: Arc<str>) -> Self {
        Self {
            name,
            accessors: RwLock::new(AHashMap::new()),
            statics: RwLock::new(AHashMap::new()),
            pending: AtomicBool::new(true),
            migration: Mutex::new(()),
            sweeps: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the one-time migration has completed.
    #[must_use]
    pub fn is_migrated(&self) -> bool {
        !self.pending.load(Ordering::Acquire)
    }

    /// Number of migration sweeps executed against this type.
    ///
    /// Diagnostics counter; exactly 1 after a normal lifecycle, and still 1
    /// after racing first accesses.
    #[must_use]
    pub fn migration_sweeps(&self) -> u32 {
        self.sweeps.load(Ordering::Relaxed)
    }

    /// Whether `name` resolved to a computed attribute on this type.
    #[must_use]
    pub fn has_accessor(&self, name: &str) -> bool {
        self.read_accessors().contains_key(name)
    }

    /// Whether `name` resolved to a statically-bound function on this type.
    #[must_use]
    pub fn has_static(&self, name: &str) -> bool {
        self.read_statics().contains_key(name)
    }

    /// Doc text of a migrated computed attribute.
    #[must_use]
    pub fn doc(&self, name: &str) -> Option<String> {
        self.accessor(name)?.doc().map(String::from)
    }

    pub(crate) fn install_accessor(&self, name: String, d: Arc<dyn Descriptor>) {
        self.accessors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, d);
    }

    pub(crate) fn install_static(&self, name: String, f: NativeFn) {
        self.statics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, f);
    }

    pub(crate) fn accessor(&self, name: &str) -> Option<Arc<dyn Descriptor>> {
        self.read_accessors().get(name).cloned()
    }

    pub(crate) fn static_fn(&self, name: &str) -> Option<NativeFn> {
        self.read_statics().get(name).cloned()
    }

    fn read_accessors(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, AHashMap<String, Arc<dyn Descriptor>>> {
        self.accessors.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_statics(&self) -> std::sync::RwLockReadGuard<'_, AHashMap<String, NativeFn>> {
        self.statics.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyType")
            .field("name", &self.name)
            .field("migrated", &self.is_migrated())
            .finish()
    }
}

/// The stand-in object importers see once a namespace has been substituted.
#[derive(Clone)]
pub struct Proxy {
    ty: Arc<ProxyType>,
    table: VarTable,
    /// The original namespace object, retained so it outlives substitution.
    origin: Namespace,
}

impl Proxy {
    pub(crate) fn new(ty: Arc<ProxyType>, origin: Namespace) -> Self {
        Self {
            ty,
            table: origin.table().clone(),
            origin,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.ty.name()
    }

    /// The proxy's dedicated type.
    #[must_use]
    pub fn ty(&self) -> &Arc<ProxyType> {
        &self.ty
    }

    /// The shared variable table (same storage as the original namespace).
    #[must_use]
    pub fn table(&self) -> &VarTable {
        &self.table
    }

    /// The retained original namespace.
    #[must_use]
    pub fn origin(&self) -> &Namespace {
        &self.origin
    }

    /// Run the one-time migration if it is still pending.
    ///
    /// Double-checked: the fast path is a single atomic load. A thread that
    /// loses the race finds the guard disarmed after acquiring the mutex and
    /// performs no work.
    pub fn ensure_ready(&self) {
        if self.ty.is_migrated() {
            return;
        }
        let _gate = self
            .ty
            .migration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.ty.is_migrated() {
            return;
        }
        migrate(&self.ty, &self.table);
        self.ty.sweeps.fetch_add(1, Ordering::Relaxed);
        self.ty.pending.store(false, Ordering::Release);
        tracing::debug!(namespace = self.name(), "namespace migrated");
    }

    /// Run a migration sweep unconditionally (idempotent re-entry path for
    /// an explicit `init` against an already-substituted namespace).
    pub(crate) fn remigrate(&self) {
        let _gate = self
            .ty
            .migration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        migrate(&self.ty, &self.table);
        self.ty.sweeps.fetch_add(1, Ordering::Relaxed);
        self.ty.pending.store(false, Ordering::Release);
    }

    /// Read an attribute.
    ///
    /// Routes through the computed attribute's getter when one is installed;
    /// otherwise falls back to the shared table, then to statically-bound
    /// functions.
    pub fn get(&self, name: &str) -> Result<Value, AttrError> {
        self.ensure_ready();
        if let Some(d) = self.ty.accessor(name) {
            return d.read(self, name);
        }
        if let Some(v) = self.table.get(name) {
            return Ok(v);
        }
        match self.ty.static_fn(name) {
            Some(f) => Ok(Value::Fn(f)),
            None => Err(AttrError::NotFound { attr: name.into() }),
        }
    }

    /// Write an attribute.
    ///
    /// Routes through the computed attribute's setter when one is installed;
    /// a missing setter is a [`AttrError::ReadOnly`] failure. Ordinary names
    /// write straight into the shared table.
    pub fn set(&self, name: &str, value: Value) -> Result<(), AttrError> {
        self.ensure_ready();
        if let Some(d) = self.ty.accessor(name) {
            return d.write(self, name, value);
        }
        self.table.insert(name, value);
        Ok(())
    }

    /// Delete an attribute.
    pub fn del(&self, name: &str) -> Result<(), AttrError> {
        self.ensure_ready();
        if let Some(d) = self.ty.accessor(name) {
            return d.delete(self, name);
        }
        match self.table.remove(name) {
            Some(_) => Ok(()),
            None => Err(AttrError::NotFound { attr: name.into() }),
        }
    }

    /// Resolve an attribute and invoke it with positional arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, AttrError> {
        match self.get(name)? {
            Value::Fn(f) => f.call(args),
            _ => Err(AttrError::NotCallable { attr: name.into() }),
        }
    }

    /// Doc text of a computed attribute.
    #[must_use]
    pub fn doc(&self, name: &str) -> Option<String> {
        self.ensure_ready();
        self.ty.doc(name)
    }
}

impl AttrContext for Proxy {
    fn get_attr(&self, name: &str) -> Result<Value, AttrError> {
        self.get(name)
    }

    fn set_attr(&self, name: &str, value: Value) -> Result<(), AttrError> {
        self.set(name, value)
    }

    fn del_attr(&self, name: &str) -> Result<(), AttrError> {
        self.del(name)
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Module '{}'>", self.name())
    }
}
