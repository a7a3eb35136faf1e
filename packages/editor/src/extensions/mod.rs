//! # Extensions
//!
//! Feature modules that contribute commands, plugins and lifecycle hooks.
//!
//! ## Contributions
//!
//! - `add_commands()`: named command factories, merged into one registry
//! - `add_plugins(editor)`: passive behavior, flattened in priority order
//! - `on_create` / `on_destroy`: hooks, fired in priority order
//!
//! Extensions are immutable once handed to the editor. Implement the trait
//! directly, or assemble one from closures with `ExtensionDef`.

pub mod builtin;
mod manager;

pub use builtin::{core_extensions, BaseCommands, Editable};
pub use manager::ExtensionManager;

use crate::commands::{BoxedStep, CommandArgs, CommandSet};
use crate::plugins::Plugin;
use crate::{Editor, ExtensionError};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Priority of an extension that does not choose one
pub const DEFAULT_PRIORITY: i32 = 100;

pub trait Extension: Send + Sync {
    /// Unique name; later extensions with the same name are dropped
    fn name(&self) -> &str;

    /// Higher runs first
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Default options, overridable per editor via `extensionOptions`
    fn options(&self) -> Value {
        Value::Object(Default::default())
    }

    fn add_commands(&self) -> CommandSet {
        CommandSet::new()
    }

    fn add_plugins(&self, _editor: &Editor) -> Vec<Plugin> {
        Vec::new()
    }

    fn on_create(&self, _editor: &Editor) -> Result<(), ExtensionError> {
        Ok(())
    }

    fn on_destroy(&self, _editor: &Editor) -> Result<(), ExtensionError> {
        Ok(())
    }
}

type PluginsFn = Arc<dyn Fn(&Editor) -> Vec<Plugin> + Send + Sync>;
type HookFn = Arc<dyn Fn(&Editor) -> Result<(), ExtensionError> + Send + Sync>;

/// Extension assembled from closures
///
/// ```rust
/// use folio_editor::{step, CommandOutput, ExtensionDef};
///
/// let ext = ExtensionDef::new("shout")
///     .with_priority(150)
///     .command("shout", |_args| {
///         step(|ctx| {
///             ctx.tr().insert_text("!")?;
///             Ok(CommandOutput::from(ctx.commit()))
///         })
///     });
/// ```
#[derive(Clone)]
pub struct ExtensionDef {
    name: String,
    priority: i32,
    options: Value,
    commands: CommandSet,
    plugins: Option<PluginsFn>,
    on_create: Option<HookFn>,
    on_destroy: Option<HookFn>,
}

impl ExtensionDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            options: Value::Object(Default::default()),
            commands: CommandSet::new(),
            plugins: None,
            on_create: None,
            on_destroy: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn command<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(CommandArgs) -> BoxedStep + Send + Sync + 'static,
    {
        self.commands = self.commands.add(name, factory);
        self
    }

    pub fn with_commands(mut self, commands: CommandSet) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_plugins<F>(mut self, plugins: F) -> Self
    where
        F: Fn(&Editor) -> Vec<Plugin> + Send + Sync + 'static,
    {
        self.plugins = Some(Arc::new(plugins));
        self
    }

    pub fn with_create_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor) -> Result<(), ExtensionError> + Send + Sync + 'static,
    {
        self.on_create = Some(Arc::new(hook));
        self
    }

    pub fn with_destroy_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Editor) -> Result<(), ExtensionError> + Send + Sync + 'static,
    {
        self.on_destroy = Some(Arc::new(hook));
        self
    }

    pub fn into_arc(self) -> Arc<dyn Extension> {
        Arc::new(self)
    }
}

impl Extension for ExtensionDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn options(&self) -> Value {
        self.options.clone()
    }

    fn add_commands(&self) -> CommandSet {
        self.commands.clone()
    }

    fn add_plugins(&self, editor: &Editor) -> Vec<Plugin> {
        self.plugins.as_ref().map(|f| f(editor)).unwrap_or_default()
    }

    fn on_create(&self, editor: &Editor) -> Result<(), ExtensionError> {
        match &self.on_create {
            Some(hook) => hook(editor),
            None => Ok(()),
        }
    }

    fn on_destroy(&self, editor: &Editor) -> Result<(), ExtensionError> {
        match &self.on_destroy {
            Some(hook) => hook(editor),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ExtensionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionDef")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}
