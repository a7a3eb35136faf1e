//! # Command Context
//!
//! Everything a step sees while it runs.
//!
//! ```text
//! ┌──────────────────────── CommandContext ────────────────────────┐
//! │ state()   read view (plain snapshot, or snapshot + pending tr) │
//! │ tr()      the open transaction, shared by composed steps      │
//! │ commit()  request a publish; false when the mode withholds it │
//! │ run()     invoke another command on the same transaction      │
//! │ chain()   queue commands over the same transaction            │
//! │ can()     probe a command against a copy of the transaction   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A context never publishes anything itself. `commit()` only records the
//! request; the direct driver publishes once after the step returns.

use crate::commands::state_view::{ChainedState, StateView};
use crate::commands::{BoxedStep, CommandArgs, CommandOutput, CommandRegistry};
use crate::{CommandError, Editor};
use folio_model::Transaction;
use std::cell::Cell;

/// How the current step is being executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// `editor.commands()`: runs now, may commit
    Direct,
    /// `editor.chain()`: queued, committed once at the end
    Chain,
    /// `editor.can()`: probe only, never commits
    DryRun,
}

/// Which read surface `state()` hands out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewKind {
    Plain,
    Chained,
}

/// Runtime context passed to every command step
pub struct CommandContext<'a> {
    editor: &'a Editor,
    tr: &'a mut Transaction,
    commit: Option<&'a Cell<bool>>,
    mode: ExecutionMode,
    view: ViewKind,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(
        editor: &'a Editor,
        tr: &'a mut Transaction,
        commit: Option<&'a Cell<bool>>,
        mode: ExecutionMode,
        view: ViewKind,
    ) -> Self {
        Self {
            editor,
            tr,
            commit,
            mode,
            view,
        }
    }

    /// Current read view, rebuilt on every call
    pub fn state(&self) -> StateView<'_> {
        match self.view {
            ViewKind::Plain => StateView::Snapshot(self.editor.state()),
            ViewKind::Chained => StateView::Chained(ChainedState::new(self.editor.state(), &*self.tr)),
        }
    }

    /// Open transaction
    pub fn tr(&mut self) -> &mut Transaction {
        &mut *self.tr
    }

    /// Read-only access to the open transaction
    pub fn pending(&self) -> &Transaction {
        &*self.tr
    }

    pub fn editor(&self) -> &'a Editor {
        self.editor
    }

    pub fn registry(&self) -> &'a CommandRegistry {
        self.editor.registry()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// True when `commit()` would do anything
    pub fn can_commit(&self) -> bool {
        self.commit.is_some()
    }

    /// Request that the open transaction be published
    ///
    /// Returns false when the capability is withheld (mid-chain, dry-run).
    pub fn commit(&self) -> bool {
        match self.commit {
            Some(flag) => {
                flag.set(true);
                true
            }
            None => false,
        }
    }

    /// Run another command against this context
    pub fn run(&mut self, name: &str, args: impl Into<CommandArgs>) -> Result<CommandOutput, CommandError> {
        let step = self.editor.registry().bind(name, args.into())?;
        step(self)
    }

    /// Queue commands over this context's transaction
    pub fn chain(&mut self) -> ContextChain<'_> {
        let mode = self.mode;
        ContextChain::new(self.editor, TrSlot::Borrowed(&mut *self.tr), mode)
    }

    /// Probe commands against a copy of this context's transaction
    pub fn can(&self) -> ContextCan<'_> {
        ContextCan {
            editor: self.editor,
            tr: &*self.tr,
            view: self.view,
        }
    }
}

impl std::fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("mode", &self.mode)
            .field("view", &self.view)
            .field("can_commit", &self.can_commit())
            .finish_non_exhaustive()
    }
}

pub(crate) enum TrSlot<'a> {
    Borrowed(&'a mut Transaction),
    Owned(Transaction),
}

impl TrSlot<'_> {
    fn get_mut(&mut self) -> &mut Transaction {
        match self {
            TrSlot::Borrowed(tr) => tr,
            TrSlot::Owned(tr) => tr,
        }
    }
}

/// Chain started from inside a step
///
/// Steps share the parent transaction and never get the commit capability.
/// Edits made before a falsy step stay in the transaction; the parent step
/// decides whether to commit.
pub struct ContextChain<'a> {
    editor: &'a Editor,
    tr: TrSlot<'a>,
    mode: ExecutionMode,
    queue: Vec<BoxedStep>,
    error: Option<CommandError>,
}

impl<'a> ContextChain<'a> {
    fn new(editor: &'a Editor, tr: TrSlot<'a>, mode: ExecutionMode) -> Self {
        Self {
            editor,
            tr,
            mode,
            queue: Vec::new(),
            error: None,
        }
    }

    /// Queue a command; nothing runs until `run()`
    pub fn command(&mut self, name: &str, args: impl Into<CommandArgs>) -> &mut Self {
        if self.error.is_none() {
            match self.editor.registry().bind(name, args.into()) {
                Ok(step) => self.queue.push(step),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Run the queue in order, stopping at the first falsy step
    pub fn run(&mut self) -> Result<bool, CommandError> {
        let queue = std::mem::take(&mut self.queue);
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if queue.is_empty() {
            return Ok(false);
        }

        let editor = self.editor;
        let tr = self.tr.get_mut();
        for step in queue {
            let mut ctx = CommandContext::new(editor, &mut *tr, None, self.mode, ViewKind::Chained);
            if !step(&mut ctx)?.is_truthy() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Dry-run probe started from inside a step
pub struct ContextCan<'a> {
    editor: &'a Editor,
    tr: &'a Transaction,
    view: ViewKind,
}

impl<'a> ContextCan<'a> {
    /// Run one command against a throwaway copy of the transaction
    pub fn command(&self, name: &str, args: impl Into<CommandArgs>) -> Result<CommandOutput, CommandError> {
        let step = self.editor.registry().bind(name, args.into())?;
        let mut tr = self.tr.clone();
        let mut ctx = CommandContext::new(self.editor, &mut tr, None, ExecutionMode::DryRun, self.view);
        step(&mut ctx)
    }

    /// Dry-run chain over a throwaway copy of the transaction
    pub fn chain(&self) -> ContextChain<'a> {
        ContextChain::new(self.editor, TrSlot::Owned(self.tr.clone()), ExecutionMode::DryRun)
    }
}
