//! # Plugins
//!
//! Passive editor behavior contributed by extensions.
//!
//! A plugin can veto a commit (`filter_transaction`) and observe every
//! published snapshot (`on_update`). Plugins are keyed; the editor keeps the
//! first plugin for each key and drops the rest.

use crate::Diagnostic;
use folio_model::{Snapshot, Transaction};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

pub type TransactionFilter = Arc<dyn Fn(&Transaction, &Snapshot) -> bool + Send + Sync>;
pub type UpdateHook = Arc<dyn Fn(&Snapshot, &Snapshot) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginKey(String);

impl PluginKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[derive(Clone)]
pub struct Plugin {
    key: PluginKey,
    filter_transaction: Option<TransactionFilter>,
    on_update: Option<UpdateHook>,
}

impl Plugin {
    pub fn new(key: impl Into<PluginKey>) -> Self {
        Self {
            key: key.into(),
            filter_transaction: None,
            on_update: None,
        }
    }

    /// Veto commits: return false to reject the transaction
    pub fn filter_transaction<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Transaction, &Snapshot) -> bool + Send + Sync + 'static,
    {
        self.filter_transaction = Some(Arc::new(filter));
        self
    }

    /// Observe `(previous, next)` after every publish
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Snapshot, &Snapshot) + Send + Sync + 'static,
    {
        self.on_update = Some(Arc::new(hook));
        self
    }

    pub fn key(&self) -> &PluginKey {
        &self.key
    }

    pub fn allows(&self, tr: &Transaction, state: &Snapshot) -> bool {
        self.filter_transaction
            .as_ref()
            .map(|filter| filter(tr, state))
            .unwrap_or(true)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("key", &self.key)
            .field("filter_transaction", &self.filter_transaction.is_some())
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

/// Deduplicated plugins, in extension priority order
#[derive(Debug, Clone, Default)]
pub struct PluginSet {
    plugins: Vec<Plugin>,
}

impl PluginSet {
    /// Keep the first plugin per key
    pub fn assemble(plugins: Vec<Plugin>) -> (Self, Vec<Diagnostic>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(plugins.len());
        let mut diagnostics = Vec::new();

        for plugin in plugins {
            if seen.insert(plugin.key.clone()) {
                kept.push(plugin);
            } else {
                tracing::warn!(key = %plugin.key, "Dropping duplicate plugin");
                diagnostics.push(Diagnostic::DuplicatePlugin {
                    key: plugin.key.0,
                });
            }
        }

        (Self { plugins: kept }, diagnostics)
    }

    /// True if every plugin accepts the transaction
    pub fn filter(&self, tr: &Transaction, state: &Snapshot) -> bool {
        match self.plugins.iter().find(|plugin| !plugin.allows(tr, state)) {
            Some(plugin) => {
                tracing::debug!(key = %plugin.key, "Transaction rejected by plugin");
                false
            }
            None => true,
        }
    }

    pub fn notify(&self, previous: &Snapshot, next: &Snapshot) {
        for hook in self.plugins.iter().filter_map(|p| p.on_update.as_ref()) {
            hook(previous, next);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Plugin> {
        self.plugins.iter().find(|p| p.key.as_str() == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &PluginKey> {
        self.plugins.iter().map(Plugin::key)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
