//! # Execution Modes
//!
//! The three ways to invoke a command from outside a step.
//!
//! ```text
//! editor.commands().run(..)   Direct   fresh tr, commit publishes once
//! editor.chain()...run()      Chain    one shared tr, all-or-nothing
//! editor.can().command(..)    DryRun   throwaway tr, never publishes
//! ```
//!
//! ## Chain Semantics
//!
//! 1. Queueing never executes, and an unknown name poisons the chain
//! 2. Steps run in queue order against the shared transaction
//! 3. The first falsy step stops the run; later steps never execute
//! 4. The queue is cleared whatever the outcome
//! 5. Exactly one commit when every step succeeded, none otherwise

use crate::commands::context::{ContextChain, ExecutionMode, ViewKind};
use crate::commands::{BoxedStep, CommandArgs, CommandContext, CommandOutput};
use crate::{CommandError, Editor};
use folio_model::Transaction;
use std::cell::Cell;
use tracing::{debug, instrument};

/// Direct execution surface
pub struct Commands<'e> {
    editor: &'e mut Editor,
}

impl<'e> Commands<'e> {
    pub(crate) fn new(editor: &'e mut Editor) -> Self {
        Self { editor }
    }

    /// Run a command now
    ///
    /// The step's transaction is published only if it called `ctx.commit()`
    /// and returned `Ok`.
    pub fn run(&mut self, name: &str, args: impl Into<CommandArgs>) -> Result<CommandOutput, CommandError> {
        let step = self.editor.registry().bind(name, args.into())?;

        let mut tr = self.editor.state().tr();
        let commit = Cell::new(false);
        let output = {
            let mut ctx = CommandContext::new(
                &*self.editor,
                &mut tr,
                Some(&commit),
                ExecutionMode::Direct,
                ViewKind::Plain,
            );
            step(&mut ctx)?
        };

        if commit.get() {
            debug!(command = name, "Publishing direct command");
            self.editor.dispatch(tr);
        }

        Ok(output)
    }
}

enum EditorRef<'e> {
    Mut(&'e mut Editor),
    Shared(&'e Editor),
}

impl EditorRef<'_> {
    fn get(&self) -> &Editor {
        match self {
            EditorRef::Mut(editor) => editor,
            EditorRef::Shared(editor) => editor,
        }
    }
}

/// Queued, all-or-nothing execution surface
///
/// The handle is reusable: after `run()` the queue is empty and a fresh
/// transaction is opened from the live snapshot.
pub struct Chain<'e> {
    editor: EditorRef<'e>,
    tr: Transaction,
    queue: Vec<(String, BoxedStep)>,
    mode: ExecutionMode,
    error: Option<CommandError>,
}

impl<'e> Chain<'e> {
    pub(crate) fn new(editor: &'e mut Editor) -> Self {
        let tr = editor.state().tr();
        Self {
            editor: EditorRef::Mut(editor),
            tr,
            queue: Vec::new(),
            mode: ExecutionMode::Chain,
            error: None,
        }
    }

    pub(crate) fn dry_run(editor: &'e Editor) -> Self {
        Self {
            tr: editor.state().tr(),
            editor: EditorRef::Shared(editor),
            queue: Vec::new(),
            mode: ExecutionMode::DryRun,
            error: None,
        }
    }

    /// Queue a command; nothing runs until `run()`
    pub fn command(&mut self, name: &str, args: impl Into<CommandArgs>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match self.editor.get().registry().bind(name, args.into()) {
            Ok(step) => self.queue.push((name.to_string(), step)),
            Err(e) => self.error = Some(e),
        }
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending state of the shared transaction
    pub fn pending(&self) -> &Transaction {
        &self.tr
    }

    /// Execute the queue
    ///
    /// Returns `Ok(true)` when every step was truthy and the commit went
    /// through (or would, for a dry-run chain). `Ok(false)` and `Err(_)`
    /// both leave the snapshot untouched.
    #[instrument(skip(self), fields(mode = ?self.mode, steps = self.queue.len()))]
    pub fn run(&mut self) -> Result<bool, CommandError> {
        let queue = std::mem::take(&mut self.queue);

        if let Some(err) = self.error.take() {
            self.reset();
            return Err(err);
        }
        if queue.is_empty() {
            debug!("Empty chain");
            return Ok(false);
        }

        let mut succeeded = true;
        {
            let editor = self.editor.get();
            for (name, step) in queue {
                let mut ctx = CommandContext::new(editor, &mut self.tr, None, self.mode, ViewKind::Chained);
                match step(&mut ctx) {
                    Ok(output) if output.is_truthy() => {}
                    Ok(_) => {
                        debug!(command = %name, "Chain stopped at falsy step");
                        succeeded = false;
                        break;
                    }
                    Err(e) => {
                        self.reset();
                        return Err(e);
                    }
                }
            }
        }

        if !succeeded {
            self.reset();
            return Ok(false);
        }

        let result = match &mut self.editor {
            EditorRef::Mut(editor) => {
                let tr = std::mem::replace(&mut self.tr, editor.state().tr());
                editor.dispatch(tr)
            }
            EditorRef::Shared(_) => true,
        };
        self.reset();
        Ok(result)
    }

    /// Drop pending edits and reopen from the live snapshot
    fn reset(&mut self) {
        self.tr = self.editor.get().state().tr();
    }
}

/// Dry-run execution surface
pub struct Can<'e> {
    editor: &'e Editor,
}

impl<'e> Can<'e> {
    pub(crate) fn new(editor: &'e Editor) -> Self {
        Self { editor }
    }

    /// Report what a command would return, without publishing anything
    pub fn command(&self, name: &str, args: impl Into<CommandArgs>) -> Result<CommandOutput, CommandError> {
        let step = self.editor.registry().bind(name, args.into())?;

        let mut tr = self.editor.state().tr();
        let mut ctx = CommandContext::new(self.editor, &mut tr, None, ExecutionMode::DryRun, ViewKind::Plain);
        step(&mut ctx)
    }

    /// Chain that reports whether it would succeed, and never commits
    pub fn chain(&self) -> Chain<'e> {
        Chain::dry_run(self.editor)
    }
}

/// Uniform invocation across execution surfaces
///
/// Chains return themselves so calls keep queueing; the other surfaces
/// return the command's result.
pub trait CommandInvoker {
    type Output<'s>
    where
        Self: 's;

    fn invoke(&mut self, name: &str, args: CommandArgs) -> Self::Output<'_>;
}

impl CommandInvoker for Commands<'_> {
    type Output<'s> = Result<CommandOutput, CommandError> where Self: 's;

    fn invoke(&mut self, name: &str, args: CommandArgs) -> Self::Output<'_> {
        self.run(name, args)
    }
}

impl<'e> CommandInvoker for Chain<'e> {
    type Output<'s> = &'s mut Chain<'e> where Self: 's;

    fn invoke(&mut self, name: &str, args: CommandArgs) -> Self::Output<'_> {
        self.command(name, args)
    }
}

impl CommandInvoker for Can<'_> {
    type Output<'s> = Result<CommandOutput, CommandError> where Self: 's;

    fn invoke(&mut self, name: &str, args: CommandArgs) -> Self::Output<'_> {
        self.command(name, args)
    }
}

impl<'a> CommandInvoker for ContextChain<'a> {
    type Output<'s> = &'s mut ContextChain<'a> where Self: 's;

    fn invoke(&mut self, name: &str, args: CommandArgs) -> Self::Output<'_> {
        self.command(name, args)
    }
}

impl CommandInvoker for CommandContext<'_> {
    type Output<'s> = Result<CommandOutput, CommandError> where Self: 's;

    fn invoke(&mut self, name: &str, args: CommandArgs) -> Self::Output<'_> {
        self.run(name, args)
    }
}
