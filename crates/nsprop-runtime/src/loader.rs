#![forbid(unsafe_code)]

//! The loader: runs a namespace's top-level setup and fires its completion
//! signal.
//!
//! # Design
//!
//! `Loader::load` registers a fresh namespace, hands the body a
//! [`NamespaceScope`] to declare bindings through, then signals the registry
//! that the namespace completed. What happens to computed-attribute
//! declarations depends on the configured [`Strategy`]:
//!
//! - [`Strategy::OnLoadComplete`] (default): declarations enroll the
//!   namespace in the registry's pending set; migration runs inside the
//!   completion signal, before `load` returns, so no external caller can
//!   observe the unmigrated namespace.
//! - [`Strategy::OnFirstUse`]: the first declaration substitutes the proxy
//!   immediately with migration deferred behind its first-access guard; the
//!   namespace pays no completion-hook cost at all.
//!
//! Either way, a namespace that declares no computed attributes is left
//! completely untouched: it stays a plain registry entry.

use std::sync::Arc;

use nsprop_core::{Value, qualifies};

use crate::error::{InitError, LoadError};
use crate::namespace::Namespace;
use crate::registry::{LiveEntry, Registry};

/// When a namespace's computed attributes are migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Migrate when the namespace's top-level setup finishes.
    #[default]
    OnLoadComplete,
    /// Substitute eagerly at the first declaration; migrate at first access.
    OnFirstUse,
}

/// Executes namespace setup bodies against a registry.
pub struct Loader<'r> {
    registry: &'r Registry,
    strategy: Strategy,
}

impl<'r> Loader<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            strategy: Strategy::default(),
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Load a namespace: run `body` against a fresh scope, then signal
    /// completion. Returns the live entry as importers will see it.
    pub fn load(
        &self,
        name: &str,
        body: impl FnOnce(&mut NamespaceScope<'_>),
    ) -> Result<Arc<LiveEntry>, LoadError> {
        if self.registry.contains(name) {
            return Err(LoadError::DuplicateName { name: name.into() });
        }
        let ns = Namespace::new(name);
        self.registry.register(&ns);

        let mut scope = NamespaceScope {
            registry: self.registry,
            namespace: ns.clone(),
            strategy: self.strategy,
            failed: None,
        };
        body(&mut scope);
        if let Some(err) = scope.failed {
            return Err(err.into());
        }

        self.registry.complete_load(&ns)?;
        self.registry
            .lookup(name)
            .ok_or_else(|| LoadError::Init(InitError::Unregistered { name: name.into() }))
    }
}

/// The face a namespace body sees while it runs: its own top-level scope.
pub struct NamespaceScope<'r> {
    registry: &'r Registry,
    namespace: Namespace,
    strategy: Strategy,
    failed: Option<InitError>,
}

impl NamespaceScope<'_> {
    /// Bind a value at the namespace's top level.
    ///
    /// A qualifying value (declaration or dynamic descriptor) additionally
    /// arms the configured trigger: pending-set enrollment under
    /// [`Strategy::OnLoadComplete`], eager substitution under
    /// [`Strategy::OnFirstUse`].
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        let arm_trigger = qualifies(&value);
        self.namespace.define(name, value);
        if !arm_trigger {
            return;
        }
        match self.strategy {
            Strategy::OnLoadComplete => self.registry.enroll_pending(&self.namespace),
            Strategy::OnFirstUse => {
                if self.failed.is_none() {
                    if let Err(err) = self.registry.install_deferred(&self.namespace) {
                        self.failed = Some(err);
                    }
                }
            }
        }
    }

    /// Explicitly migrate this namespace right now, mid-body.
    ///
    /// The in-Rust form of calling `init()` with no argument from inside the
    /// namespace being loaded. Idempotent with either strategy; a failure is
    /// carried out of the body and surfaces from `load`.
    pub fn init(&mut self) {
        if let Err(err) = self.registry.init(&self.namespace) {
            if self.failed.is_none() {
                self.failed = Some(err);
            }
        }
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
