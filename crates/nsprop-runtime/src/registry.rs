#![forbid(unsafe_code)]

//! The namespace registry: name → live entry.
//!
//! # Design
//!
//! An explicit key-value service over the process's live namespaces. Each
//! name owns an [`ArcSwap`] slot holding the [`LiveEntry`] importers see, so
//! the one-time plain→proxy substitution is a single lock-free store and
//! lookups never contend with it. Entry *creation* and substitution are
//! serialized on a mutex; reads are not.
//!
//! The registry also owns the strategy-A machinery: the pending set of
//! namespaces awaiting migration and the lazily-engaged load-completion hook
//! (see [`crate::auto`]).
//!
//! # Invariants
//!
//! 1. A name's entry transitions Plain → Proxied at most once.
//! 2. `init` is idempotent: re-entry returns the existing proxy and reuses
//!    its type, never creating a second one.
//! 3. Resolution-state mismatches (unknown name, foreign table identity)
//!    propagate as [`InitError`]; they are never skipped.

use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use ahash::AHashMap;
use arc_swap::ArcSwap;

use nsprop_core::{AttrError, Value};

use crate::auto::{AutoInit, LoadEvent, LoadObserver};
use crate::error::InitError;
use crate::namespace::Namespace;
use crate::proxy::{Proxy, ProxyType};

/// What the registry currently maps a name to.
#[derive(Clone, Debug)]
pub enum LiveEntry {
    /// Not yet migrated: the plain namespace over its variable table.
    Plain(Namespace),
    /// Substituted: the proxy (migration may still be pending behind its
    /// first-access guard).
    Proxied(Arc<Proxy>),
}

impl LiveEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(ns) => ns.name(),
            Self::Proxied(p) => p.name(),
        }
    }

    #[must_use]
    pub fn is_proxied(&self) -> bool {
        matches!(self, Self::Proxied(_))
    }

    #[must_use]
    pub fn as_proxy(&self) -> Option<&Arc<Proxy>> {
        match self {
            Self::Plain(_) => None,
            Self::Proxied(p) => Some(p),
        }
    }

    /// Read an attribute through whichever face the namespace currently has.
    pub fn get(&self, attr: &str) -> Result<Value, AttrError> {
        match self {
            Self::Plain(ns) => ns
                .get(attr)
                .ok_or_else(|| AttrError::NotFound { attr: attr.into() }),
            Self::Proxied(p) => p.get(attr),
        }
    }

    /// Write an attribute.
    pub fn set(&self, attr: &str, value: Value) -> Result<(), AttrError> {
        match self {
            Self::Plain(ns) => {
                ns.define(attr, value);
                Ok(())
            }
            Self::Proxied(p) => p.set(attr, value),
        }
    }

    /// Delete an attribute.
    pub fn del(&self, attr: &str) -> Result<(), AttrError> {
        match self {
            Self::Plain(ns) => match ns.table().remove(attr) {
                Some(_) => Ok(()),
                None => Err(AttrError::NotFound { attr: attr.into() }),
            },
            Self::Proxied(p) => p.del(attr),
        }
    }

    /// Resolve an attribute and invoke it.
    pub fn call(&self, attr: &str, args: &[Value]) -> Result<Value, AttrError> {
        match self {
            Self::Plain(ns) => match ns.get(attr) {
                Some(Value::Fn(f)) => f.call(args),
                Some(_) => Err(AttrError::NotCallable { attr: attr.into() }),
                None => Err(AttrError::NotFound { attr: attr.into() }),
            },
            Self::Proxied(p) => p.call(attr, args),
        }
    }
}

/// Process- or test-scoped namespace registry.
pub struct Registry {
    entries: RwLock<AHashMap<String, Arc<ArcSwap<LiveEntry>>>>,
    /// Serializes entry creation and plain→proxy substitution.
    subst: Mutex<()>,
    /// Strategy-A pending set and hook state.
    auto: AutoInit,
    /// User-installed load observer, chained through by the auto-init hook.
    observer: Mutex<Option<Arc<dyn LoadObserver>>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
            subst: Mutex::new(()),
            auto: AutoInit::new(),
            observer: Mutex::new(None),
        }
    }

    /// Register a plain namespace, replacing any previous entry for the name.
    pub fn register(&self, ns: &Namespace) {
        let _gate = self.subst.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = Arc::new(ArcSwap::from_pointee(LiveEntry::Plain(ns.clone())));
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ns.name().to_string(), slot);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// The live entry for `name`, as importers see it right now.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<LiveEntry>> {
        self.slot(name).map(|slot| slot.load_full())
    }

    /// Substitute a proxy for `ns`'s plain entry and migrate its table.
    ///
    /// Idempotent: if the entry is already proxied, the existing proxy (and
    /// its type) is reused and the table is swept again, which is a no-op
    /// unless new declarations appeared since.
    pub fn init(&self, ns: &Namespace) -> Result<Arc<Proxy>, InitError> {
        let proxy = self.substitute(ns, Deferred::No)?;
        proxy.ensure_ready();
        Ok(proxy)
    }

    /// Strategy B: substitute now, leave migration to the first access.
    pub(crate) fn install_deferred(&self, ns: &Namespace) -> Result<Arc<Proxy>, InitError> {
        self.substitute(ns, Deferred::Yes)
    }

    /// Explicit completion signal: `ns` finished its top-level setup.
    ///
    /// Drives the strategy-A hook (migrate-if-pending, disengage when the
    /// pending set drains), then chains through to any installed observer.
    pub fn complete_load(&self, ns: &Namespace) -> Result<(), InitError> {
        if let Some(pending) = self.auto.take(ns.table_id()) {
            self.init(&pending)?;
            if self.auto.disengage_if_drained() {
                tracing::debug!("auto-init completion hook released");
            }
        }
        let observer = self
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(obs) = observer {
            obs.loaded(self, &LoadEvent::new(ns.clone()));
        }
        Ok(())
    }

    /// Install a load observer, returning the previous one (callers wanting
    /// a chain keep it and forward).
    pub fn set_load_observer(
        &self,
        observer: Arc<dyn LoadObserver>,
    ) -> Option<Arc<dyn LoadObserver>> {
        self.observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(observer)
    }

    /// Enroll `ns` in the strategy-A pending set.
    pub(crate) fn enroll_pending(&self, ns: &Namespace) {
        if self.auto.enroll(ns) {
            tracing::debug!(namespace = ns.name(), "auto-init completion hook engaged");
        }
    }

    #[cfg(test)]
    pub(crate) fn auto_state(&self) -> &AutoInit {
        &self.auto
    }

    fn slot(&self, name: &str) -> Option<Arc<ArcSwap<LiveEntry>>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn substitute(&self, ns: &Namespace, deferred: Deferred) -> Result<Arc<Proxy>, InitError> {
        let _gate = self.subst.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = self.slot(ns.name()).ok_or_else(|| InitError::Unregistered {
            name: ns.name().to_string(),
        })?;
        match &*slot.load_full() {
            LiveEntry::Plain(existing) => {
                if existing.table_id() != ns.table_id() {
                    return Err(InitError::ForeignEntry {
                        name: ns.name().to_string(),
                    });
                }
                // Every namespace gets a fresh type so its computed
                // attributes cannot leak into any other namespace.
                let ty = Arc::new(ProxyType::new(Arc::from(ns.name())));
                let proxy = Arc::new(Proxy::new(ty, existing.clone()));
                slot.store(Arc::new(LiveEntry::Proxied(Arc::clone(&proxy))));
                tracing::debug!(
                    namespace = ns.name(),
                    deferred = matches!(deferred, Deferred::Yes),
                    "proxy substituted for plain namespace"
                );
                Ok(proxy)
            }
            LiveEntry::Proxied(proxy) => {
                if proxy.table().id() != ns.table_id() {
                    return Err(InitError::ForeignEntry {
                        name: ns.name().to_string(),
                    });
                }
                if matches!(deferred, Deferred::No) {
                    proxy.remigrate();
                }
                Ok(Arc::clone(proxy))
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Registry").field("entries", &len).finish()
    }
}

#[derive(Clone, Copy)]
enum Deferred {
    Yes,
    No,
}

/// The process-wide default registry.
#[must_use]
pub fn global() -> &'static Registry {
    static GLOBAL: OnceLock<Registry> = OnceLock::new();
    GLOBAL.get_or_init(Registry::new)
}
