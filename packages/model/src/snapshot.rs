use crate::{Document, Mark, Selection, Transaction};
use std::sync::Arc;

/// Immutable editor state at one point in time
///
/// Cloning is cheap: the document is shared. Every commit produces a new
/// snapshot with `version + 1`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(crate) doc: Arc<Document>,
    pub(crate) selection: Selection,
    pub(crate) stored_marks: Option<Vec<Mark>>,
    pub(crate) version: u64,
}

impl Snapshot {
    /// Create initial snapshot, cursor at the start of the first text node
    pub fn new(doc: Document) -> Self {
        let selection = doc
            .text_nodes()
            .first()
            .map(|node| Selection::cursor(node.id(), 0))
            .unwrap_or_default();

        Self {
            doc: Arc::new(doc),
            selection,
            stored_marks: None,
            version: 0,
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Marks to apply to the next inserted text, if any
    pub fn stored_marks(&self) -> Option<&[Mark]> {
        self.stored_marks.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Begin a new transaction from this snapshot
    pub fn tr(&self) -> Transaction {
        Transaction::new(self.clone())
    }

    /// Publish a transaction, producing the next snapshot
    pub fn apply(&self, tr: Transaction) -> Snapshot {
        tr.commit()
    }

    /// Reference identity: same shared document and same version
    pub fn ptr_eq(a: &Snapshot, b: &Snapshot) -> bool {
        Arc::ptr_eq(&a.doc, &b.doc) && a.version == b.version
    }

    pub(crate) fn shared_doc(&self) -> Arc<Document> {
        Arc::clone(&self.doc)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_selection_at_first_text_node() {
        let snapshot = Snapshot::new(Document::paragraph("p", "t", "abc"));

        assert_eq!(snapshot.selection(), &Selection::cursor("t", 0));
        assert_eq!(snapshot.version(), 0);
        assert!(snapshot.stored_marks().is_none());
    }

    #[test]
    fn test_clone_is_reference_identical() {
        let snapshot = Snapshot::default();
        let copy = snapshot.clone();

        assert!(Snapshot::ptr_eq(&snapshot, &copy));

        let next = snapshot.apply(snapshot.tr());
        assert!(!Snapshot::ptr_eq(&snapshot, &next));
    }
}
