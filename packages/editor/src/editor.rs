//! # Editor
//!
//! Facade tying the live snapshot to the resolved extensions.
//!
//! ```text
//! EditorBuilder ─▶ ExtensionManager ─▶ registry
//!      │                            ├▶ PluginSet (deduped by key)
//!      │                            └▶ on_create hooks
//!      ▼
//!   Editor ── commands() / chain() / can() ──▶ dispatch(tr) ──▶ new Snapshot
//! ```
//!
//! `dispatch` is the only place a snapshot gets replaced.

use crate::commands::{Can, Chain, CommandRegistry, Commands};
use crate::extensions::{core_extensions, Extension, ExtensionManager};
use crate::plugins::PluginSet;
use crate::{Diagnostic, EditorConfig, EditorError};
use folio_model::{Document, Snapshot, Transaction};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct Editor {
    state: Snapshot,
    config: EditorConfig,
    extension_manager: ExtensionManager,
    plugins: PluginSet,
    diagnostics: Vec<Diagnostic>,
    destroyed: bool,
}

impl Editor {
    /// Editor with the configured content and (optionally) core extensions
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        Self::builder().config(config).build()
    }

    /// Editor configured from a JSON config file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        Self::new(EditorConfig::load(path)?)
    }

    pub fn builder() -> EditorBuilder {
        EditorBuilder::default()
    }

    /// Live snapshot
    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Run commands immediately
    pub fn commands(&mut self) -> Commands<'_> {
        Commands::new(self)
    }

    /// Queue commands into one atomic commit
    pub fn chain(&mut self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Probe commands without committing
    pub fn can(&self) -> Can<'_> {
        Can::new(self)
    }

    pub fn registry(&self) -> &CommandRegistry {
        self.extension_manager.registry()
    }

    pub fn extension_manager(&self) -> &ExtensionManager {
        &self.extension_manager
    }

    /// Merged options of an extension
    pub fn extension_options(&self, name: &str) -> Option<&Value> {
        self.extension_manager.options_for(name)
    }

    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }

    /// Everything recorded during construction (and destruction)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Publish a transaction
    ///
    /// Returns false without touching the snapshot when the transaction was
    /// opened from an older snapshot, a plugin rejects it, or the editor is
    /// destroyed.
    pub fn dispatch(&mut self, tr: Transaction) -> bool {
        if self.destroyed {
            warn!("Dispatch on destroyed editor ignored");
            return false;
        }
        if tr.base().version() != self.state.version() {
            warn!(
                base = tr.base().version(),
                current = self.state.version(),
                "Rejecting stale transaction"
            );
            return false;
        }
        if !self.plugins.filter(&tr, &self.state) {
            return false;
        }

        let next = self.state.apply(tr);
        let previous = std::mem::replace(&mut self.state, next);
        self.plugins.notify(&previous, &self.state);
        true
    }

    /// Fire `on_destroy` hooks; later calls do nothing
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        let diagnostics = self.extension_manager.on_destroy(&*self);
        self.diagnostics.extend(diagnostics);
        self.destroyed = true;
        debug!("Editor destroyed");
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("version", &self.state.version())
            .field("extensions", &self.extension_manager)
            .field("plugins", &self.plugins.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[derive(Default)]
pub struct EditorBuilder {
    config: EditorConfig,
    extensions: Vec<Arc<dyn Extension>>,
}

impl EditorBuilder {
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn content(mut self, content: Document) -> Self {
        self.config.content = Some(content);
        self
    }

    pub fn extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    pub fn extensions(mut self, extensions: impl IntoIterator<Item = Arc<dyn Extension>>) -> Self {
        self.extensions.extend(extensions);
        self
    }

    /// Resolve extensions, assemble plugins and fire `on_create`
    #[instrument(skip(self), fields(extensions = self.extensions.len()))]
    pub fn build(self) -> Result<Editor, EditorError> {
        let content = self.config.content.clone().unwrap_or_default();
        content.validate()?;

        let mut extensions = if self.config.enable_core_extensions {
            core_extensions()
        } else {
            Vec::new()
        };
        extensions.extend(self.extensions);

        let extension_manager = ExtensionManager::new(extensions, &self.config.extension_options);
        let diagnostics = extension_manager.diagnostics().to_vec();

        let mut editor = Editor {
            state: Snapshot::new(content),
            config: self.config,
            extension_manager,
            plugins: PluginSet::default(),
            diagnostics,
            destroyed: false,
        };

        let (plugins, plugin_diagnostics) = PluginSet::assemble(editor.extension_manager.plugins(&editor));
        editor.plugins = plugins;
        editor.diagnostics.extend(plugin_diagnostics);

        let hook_diagnostics = editor.extension_manager.on_create(&editor);
        editor.diagnostics.extend(hook_diagnostics);

        info!(
            commands = editor.registry().len(),
            plugins = editor.plugins.len(),
            diagnostics = editor.diagnostics.len(),
            "Editor ready"
        );

        Ok(editor)
    }
}
