//! # Folio Editor
//!
//! Command orchestration for the Folio structured-document editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ extensions: commands, plugins, hooks        │
//! └─────────────────────────────────────────────┘
//!                     ↓ ExtensionManager (once)
//! ┌─────────────────────────────────────────────┐
//! │ CommandRegistry: name → factory(args)       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ execution modes                             │
//! │  - commands(): run now, commit on request   │
//! │  - chain(): shared tr, one commit or none   │
//! │  - can(): throwaway tr, never commits       │
//! └─────────────────────────────────────────────┘
//!                     ↓ Editor::dispatch
//! ┌─────────────────────────────────────────────┐
//! │ folio_model::Snapshot (version + 1)         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are replaced, never edited**: a failed chain leaves the old one in place
//! 2. **Chained steps see pending edits**: `ctx.state()` reads through the open transaction
//! 3. **Deterministic merging**: dedupe by name, stable priority sort, fixed override rule
//! 4. **Failure is a value**: "cannot apply here" is falsy, misuse is an `Err`
//!
//! ## Usage
//!
//! ```rust
//! use folio_editor::{CoreCommands, Editor, EditorConfig};
//! use folio_model::Document;
//!
//! let config = EditorConfig::default().with_content(Document::paragraph("p", "t", ""));
//! let mut editor = Editor::new(config).unwrap();
//!
//! let ok = editor
//!     .chain()
//!     .insert_text("ab")
//!     .doc_length_at_least(2)
//!     .run()
//!     .unwrap();
//!
//! assert!(ok);
//! assert_eq!(editor.state().doc().text_content(), "ab");
//!
//! // Probing never commits
//! assert!(editor.can().insert_text("cd").unwrap().is_truthy());
//! assert_eq!(editor.state().doc().text_content(), "ab");
//! ```

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod editor;
pub mod errors;
pub mod extensions;
pub mod plugins;

pub use commands::{
    step, BoxedStep, Can, Chain, ChainedState, CommandArgs, CommandContext, CommandFactory, CommandInvoker,
    CommandOutput, CommandRegistry, CommandSet, Commands, CoreCommands, ExecutionMode, StateRead, StateView,
};
pub use config::EditorConfig;
pub use diagnostics::Diagnostic;
pub use editor::{Editor, EditorBuilder};
pub use errors::{CommandError, ConfigError, EditorError, ExtensionError};
pub use extensions::{core_extensions, Extension, ExtensionDef, ExtensionManager, DEFAULT_PRIORITY};
pub use plugins::{Plugin, PluginKey, PluginSet};

#[doc(hidden)]
pub use serde_json as __json;
