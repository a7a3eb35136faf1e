//! # Extension Manager
//!
//! Resolves the extension list once, at editor construction.
//!
//! ```text
//! input ─▶ dedupe by name ─▶ stable sort (priority desc) ─▶ registry
//!                                                         ├▶ plugins
//!                                                         └▶ hooks
//! ```
//!
//! ## Merge Rules
//!
//! 1. **Dedupe first**: the first extension with a name wins
//! 2. **Stable sort**: higher priority first, ties keep input order
//! 3. **Registry fold**: high to low priority, later overwrites earlier, so
//!    the lowest-priority contributor of a command name owns it
//! 4. **Hooks**: `on_create` and `on_destroy` both fire in sorted order; a
//!    failing or panicking hook is recorded and the rest still run

use crate::commands::{CommandEntry, CommandRegistry};
use crate::extensions::Extension;
use crate::plugins::Plugin;
use crate::{Diagnostic, Editor, ExtensionError};
use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct ExtensionManager {
    extensions: Vec<Arc<dyn Extension>>,
    registry: Arc<CommandRegistry>,
    options: IndexMap<String, Value>,
    diagnostics: Vec<Diagnostic>,
}

impl ExtensionManager {
    /// Resolve extensions and build the merged registry
    ///
    /// `overrides` maps extension names to options shallow-merged over each
    /// extension's defaults.
    pub fn new(input: Vec<Arc<dyn Extension>>, overrides: &BTreeMap<String, Value>) -> Self {
        let mut diagnostics = Vec::new();

        let mut seen = HashSet::new();
        let mut extensions = Vec::with_capacity(input.len());
        for ext in input {
            if seen.insert(ext.name().to_string()) {
                extensions.push(ext);
            } else {
                warn!(extension = ext.name(), "Dropping duplicate extension");
                diagnostics.push(Diagnostic::DuplicateExtension {
                    name: ext.name().to_string(),
                });
            }
        }

        extensions.sort_by_key(|ext| Reverse(ext.priority()));

        let mut registry = CommandRegistry::default();
        for ext in &extensions {
            for (command, factory) in ext.add_commands().into_entries() {
                let entry = CommandEntry {
                    factory,
                    extension: ext.name().to_string(),
                };
                if let Some(replaced) = registry.insert(command.clone(), entry) {
                    debug!(
                        command = %command,
                        replaced = %replaced.extension,
                        by = ext.name(),
                        "Command overridden"
                    );
                    diagnostics.push(Diagnostic::CommandOverridden {
                        command,
                        replaced: replaced.extension,
                        by: ext.name().to_string(),
                    });
                }
            }
        }

        let mut options = IndexMap::with_capacity(extensions.len());
        for ext in &extensions {
            let merged = merge_options(ext.options(), overrides.get(ext.name()));
            options.insert(ext.name().to_string(), merged);
        }
        for name in overrides.keys().filter(|name| !options.contains_key(name.as_str())) {
            debug!(extension = %name, "Options given for unknown extension");
        }

        debug!(
            extensions = extensions.len(),
            commands = registry.len(),
            "Resolved extensions"
        );

        Self {
            extensions,
            registry: Arc::new(registry),
            options,
            diagnostics,
        }
    }

    /// Resolved extensions, highest priority first
    pub fn extensions(&self) -> &[Arc<dyn Extension>] {
        &self.extensions
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(|ext| ext.name())
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn options_for(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Diagnostics recorded while resolving
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Every extension's plugins, flattened in priority order
    pub fn plugins(&self, editor: &Editor) -> Vec<Plugin> {
        self.extensions
            .iter()
            .flat_map(|ext| ext.add_plugins(editor))
            .collect()
    }

    pub fn on_create(&self, editor: &Editor) -> Vec<Diagnostic> {
        self.run_hooks("on_create", editor, |ext, editor| ext.on_create(editor))
    }

    pub fn on_destroy(&self, editor: &Editor) -> Vec<Diagnostic> {
        self.run_hooks("on_destroy", editor, |ext, editor| ext.on_destroy(editor))
    }

    fn run_hooks<F>(&self, hook: &'static str, editor: &Editor, call: F) -> Vec<Diagnostic>
    where
        F: Fn(&dyn Extension, &Editor) -> Result<(), ExtensionError>,
    {
        let mut diagnostics = Vec::new();

        for ext in &self.extensions {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| call(ext.as_ref(), editor)))
                .unwrap_or_else(|payload| Err(ExtensionError::Panicked(panic_message(payload.as_ref()))));

            if let Err(e) = outcome {
                error!(extension = ext.name(), hook, error = %e, "Extension hook failed");
                diagnostics.push(Diagnostic::HookFailed {
                    extension: ext.name().to_string(),
                    hook,
                    message: e.to_string(),
                });
            }
        }

        diagnostics
    }
}

impl std::fmt::Debug for ExtensionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionManager")
            .field("extensions", &self.names().collect::<Vec<_>>())
            .field("commands", &self.registry.len())
            .finish()
    }
}

/// Shallow object merge; a non-object override replaces the defaults
fn merge_options(defaults: Value, overrides: Option<&Value>) -> Value {
    match (defaults, overrides) {
        (Value::Object(mut base), Some(Value::Object(over))) => {
            for (key, value) in over {
                base.insert(key.clone(), value.clone());
            }
            Value::Object(base)
        }
        (_, Some(over)) => over.clone(),
        (defaults, None) => defaults,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::ExtensionDef;
    use crate::{step, CommandOutput};
    use serde_json::json;

    fn ext(name: &str, priority: i32) -> Arc<dyn Extension> {
        ExtensionDef::new(name).with_priority(priority).into_arc()
    }

    #[test]
    fn test_sort_is_stable_by_descending_priority() {
        let manager = ExtensionManager::new(
            vec![ext("a", 50), ext("b", 200), ext("c", 100), ext("d", 100)],
            &BTreeMap::new(),
        );

        assert_eq!(manager.names().collect::<Vec<_>>(), vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_dedupe_happens_before_sort() {
        let manager = ExtensionManager::new(
            vec![ext("same", 10), ext("other", 100), ext("same", 500)],
            &BTreeMap::new(),
        );

        let priorities: Vec<i32> = manager.extensions().iter().map(|e| e.priority()).collect();
        assert_eq!(priorities, vec![100, 10]);
        assert_eq!(
            manager.diagnostics(),
            &[Diagnostic::DuplicateExtension {
                name: "same".to_string()
            }]
        );
    }

    #[test]
    fn test_lowest_priority_contributor_owns_command() {
        let contributing = |name: &str, priority: i32| {
            ExtensionDef::new(name)
                .with_priority(priority)
                .command("shared", |_args| step(|_ctx| Ok(CommandOutput::success())))
                .into_arc()
        };

        let manager = ExtensionManager::new(
            vec![contributing("high", 300), contributing("low", 10), contributing("mid", 100)],
            &BTreeMap::new(),
        );

        assert_eq!(manager.registry().owner("shared"), Some("low"));
        assert_eq!(manager.diagnostics().len(), 2);
    }

    #[test]
    fn test_options_are_shallow_merged() {
        let heading = ExtensionDef::new("heading")
            .with_options(json!({ "levels": [1, 2, 3], "class": "h" }))
            .into_arc();

        let mut overrides = BTreeMap::new();
        overrides.insert("heading".to_string(), json!({ "levels": [1] }));

        let manager = ExtensionManager::new(vec![heading], &overrides);

        assert_eq!(
            manager.options_for("heading"),
            Some(&json!({ "levels": [1], "class": "h" }))
        );
    }

    #[test]
    fn test_merge_non_object_override_replaces() {
        assert_eq!(merge_options(json!({ "a": 1 }), Some(&json!(false))), json!(false));
        assert_eq!(merge_options(json!({ "a": 1 }), None), json!({ "a": 1 }));
    }
}
