//! # State Views
//!
//! Read surface handed to command steps through `ctx.state()`.
//!
//! Inside a chain, every step must see the uncommitted edits of the steps
//! before it. `ChainedState` reads the document, selection and stored marks
//! from the pending transaction and everything else from the base snapshot.
//! Direct and dry-run contexts read the snapshot as it is.

use folio_model::{Document, Mark, Selection, Snapshot, Transaction};

/// Snapshot-shaped read access
pub trait StateRead {
    fn doc(&self) -> &Document;
    fn selection(&self) -> &Selection;
    fn stored_marks(&self) -> Option<&[Mark]>;
    fn version(&self) -> u64;
}

impl StateRead for Snapshot {
    fn doc(&self) -> &Document {
        Snapshot::doc(self)
    }

    fn selection(&self) -> &Selection {
        Snapshot::selection(self)
    }

    fn stored_marks(&self) -> Option<&[Mark]> {
        Snapshot::stored_marks(self)
    }

    fn version(&self) -> u64 {
        Snapshot::version(self)
    }
}

/// Snapshot overlaid with a transaction's pending state
#[derive(Debug, Clone, Copy)]
pub struct ChainedState<'a> {
    base: &'a Snapshot,
    tr: &'a Transaction,
}

impl<'a> ChainedState<'a> {
    pub fn new(base: &'a Snapshot, tr: &'a Transaction) -> Self {
        Self { base, tr }
    }

    pub fn base(&self) -> &'a Snapshot {
        self.base
    }
}

impl StateRead for ChainedState<'_> {
    fn doc(&self) -> &Document {
        self.tr.doc()
    }

    fn selection(&self) -> &Selection {
        self.tr.selection()
    }

    fn stored_marks(&self) -> Option<&[Mark]> {
        self.tr.stored_marks()
    }

    fn version(&self) -> u64 {
        self.base.version()
    }
}

/// The view a step actually receives
#[derive(Debug, Clone, Copy)]
pub enum StateView<'a> {
    Snapshot(&'a Snapshot),
    Chained(ChainedState<'a>),
}

impl<'a> StateView<'a> {
    /// Committed snapshot underneath the view
    pub fn base(&self) -> &'a Snapshot {
        match self {
            StateView::Snapshot(snapshot) => *snapshot,
            StateView::Chained(chained) => chained.base(),
        }
    }

    pub fn is_chained(&self) -> bool {
        matches!(self, StateView::Chained(_))
    }
}

impl StateRead for StateView<'_> {
    fn doc(&self) -> &Document {
        match self {
            StateView::Snapshot(snapshot) => snapshot.doc(),
            StateView::Chained(chained) => chained.doc(),
        }
    }

    fn selection(&self) -> &Selection {
        match self {
            StateView::Snapshot(snapshot) => snapshot.selection(),
            StateView::Chained(chained) => chained.selection(),
        }
    }

    fn stored_marks(&self) -> Option<&[Mark]> {
        match self {
            StateView::Snapshot(snapshot) => snapshot.stored_marks(),
            StateView::Chained(chained) => chained.stored_marks(),
        }
    }

    fn version(&self) -> u64 {
        match self {
            StateView::Snapshot(snapshot) => snapshot.version(),
            StateView::Chained(chained) => chained.version(),
        }
    }
}
