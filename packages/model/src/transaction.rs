//! # Transactions
//!
//! A transaction accumulates steps against a private copy of the document.
//! Nothing is visible outside the transaction until `commit()` turns it into
//! a new `Snapshot`. Readers (`doc()`, `selection()`, `stored_marks()`)
//! always reflect the steps recorded so far.

use crate::{Document, IdGenerator, Mark, Node, Selection, Snapshot, Step, StepError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Transaction {
    base: Snapshot,
    /// Pending document, copied from the base on the first step
    doc: Option<Document>,
    steps: Vec<Step>,
    selection: Selection,
    selection_set: bool,
    stored_marks: Option<Vec<Mark>>,
    stored_marks_set: bool,
    meta: BTreeMap<String, Value>,
    ids: IdGenerator,
}

impl Transaction {
    pub fn new(base: Snapshot) -> Self {
        let selection = base.selection().clone();
        let stored_marks = base.stored_marks.clone();

        Self {
            base,
            doc: None,
            steps: Vec::new(),
            selection,
            selection_set: false,
            stored_marks,
            stored_marks_set: false,
            meta: BTreeMap::new(),
            ids: IdGenerator::default(),
        }
    }

    /// Snapshot this transaction started from
    pub fn base(&self) -> &Snapshot {
        &self.base
    }

    /// Pending document
    pub fn doc(&self) -> &Document {
        self.doc.as_ref().unwrap_or_else(|| self.base.doc())
    }

    /// Pending selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Pending stored marks
    pub fn stored_marks(&self) -> Option<&[Mark]> {
        self.stored_marks.as_deref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn doc_changed(&self) -> bool {
        self.steps.iter().any(Step::changes_content)
    }

    pub fn selection_set(&self) -> bool {
        self.selection_set
    }

    /// True if committing would change nothing but the version
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && !self.selection_set && !self.stored_marks_set
    }

    /// Apply a step to the pending document
    ///
    /// On error the transaction is unchanged.
    pub fn step(&mut self, step: Step) -> Result<&mut Self, StepError> {
        let base = &self.base;
        let doc = self.doc.get_or_insert_with(|| base.doc().clone());

        step.apply(doc)?;
        self.selection = self.selection.map(&step, doc);

        tracing::trace!(step = step.name(), "Recorded step");
        self.steps.push(step);
        Ok(self)
    }

    /// Replace the current text selection with `text`
    ///
    /// Pending stored marks are added to the target node.
    pub fn insert_text(&mut self, text: &str) -> Result<&mut Self, StepError> {
        let (node_id, from, to) = self.text_range()?;

        if from != to {
            self.step(Step::DeleteText {
                node_id: node_id.clone(),
                from,
                to,
            })?;
        }

        self.step(Step::InsertText {
            node_id: node_id.clone(),
            offset: from,
            text: text.to_string(),
        })?;

        let missing: Vec<Mark> = match (self.stored_marks(), self.doc().find(&node_id)) {
            (Some(marks), Some(node)) => marks
                .iter()
                .filter(|m| !node.has_mark(&m.name))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        for mark in missing {
            self.step(Step::AddMark {
                node_id: node_id.clone(),
                mark,
            })?;
        }

        Ok(self)
    }

    pub fn delete_range(&mut self, node_id: &str, from: usize, to: usize) -> Result<&mut Self, StepError> {
        self.step(Step::DeleteText {
            node_id: node_id.to_string(),
            from,
            to,
        })
    }

    /// Delete the selected text or node
    ///
    /// Returns `Ok(false)` when the selection is empty.
    pub fn delete_selection(&mut self) -> Result<bool, StepError> {
        match self.selection.clone() {
            Selection::Text { node_id, .. } if !self.selection.is_empty() => {
                let (from, to) = (
                    self.selection.from().unwrap_or(0),
                    self.selection.to().unwrap_or(0),
                );
                self.delete_range(&node_id, from, to)?;
                Ok(true)
            }
            Selection::Node { node_id } => {
                self.step(Step::RemoveNode { node_id })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn insert_node(&mut self, parent_id: &str, index: usize, node: Node) -> Result<&mut Self, StepError> {
        self.step(Step::InsertNode {
            parent_id: parent_id.to_string(),
            index,
            node,
        })
    }

    /// Id not used anywhere in the pending document
    pub fn fresh_id(&mut self) -> String {
        let doc = self.doc.as_ref().unwrap_or_else(|| self.base.doc());
        self.ids.next_free(doc)
    }

    /// Set the pending selection (clamped to the pending document)
    ///
    /// Clears stored marks, like moving the cursor does.
    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = selection.clamp_to(self.doc());
        self.selection_set = true;
        self.stored_marks = None;
        self
    }

    pub fn set_stored_marks(&mut self, marks: Option<Vec<Mark>>) -> &mut Self {
        self.stored_marks = marks;
        self.stored_marks_set = true;
        self
    }

    /// Add a mark to the stored set, starting from the marks at the cursor
    pub fn add_stored_mark(&mut self, mark: Mark) -> &mut Self {
        let mut marks = self.current_marks();
        marks.retain(|m| m.name != mark.name);
        marks.push(mark);
        self.set_stored_marks(Some(marks))
    }

    pub fn remove_stored_mark(&mut self, name: &str) -> &mut Self {
        let mut marks = self.current_marks();
        marks.retain(|m| m.name != name);
        self.set_stored_marks(Some(marks))
    }

    /// Stored marks if set, otherwise the marks of the node under the cursor
    pub fn current_marks(&self) -> Vec<Mark> {
        if let Some(marks) = self.stored_marks() {
            return marks.to_vec();
        }
        self.selection
            .node_id()
            .and_then(|id| self.doc().find(id))
            .map(|node| node.marks().to_vec())
            .unwrap_or_default()
    }

    pub fn set_meta(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.meta.insert(key.into(), value);
        self
    }

    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    /// Consume the transaction into the next snapshot
    pub fn commit(self) -> Snapshot {
        let doc_changed = self.doc_changed();

        let stored_marks = if self.stored_marks_set {
            self.stored_marks
        } else if doc_changed {
            None
        } else {
            self.base.stored_marks.clone()
        };

        let doc = match self.doc {
            Some(doc) => Arc::new(doc),
            None => self.base.shared_doc(),
        };

        tracing::debug!(
            version = self.base.version + 1,
            steps = self.steps.len(),
            doc_changed,
            "Committed transaction"
        );

        Snapshot {
            doc,
            selection: self.selection,
            stored_marks,
            version: self.base.version + 1,
        }
    }

    fn text_range(&self) -> Result<(String, usize, usize), StepError> {
        match &self.selection {
            Selection::Text { node_id, .. } => Ok((
                node_id.clone(),
                self.selection.from().unwrap_or(0),
                self.selection.to().unwrap_or(0),
            )),
            _ => Err(StepError::NoTextSelection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::new(Document::paragraph("p", "t", "Hello"))
    }

    #[test]
    fn test_readers_reflect_pending_steps() {
        let base = snapshot();
        let mut tr = base.tr();
        tr.set_selection(Selection::cursor("t", 5));
        tr.insert_text("!").unwrap();

        assert_eq!(tr.doc().text_content(), "Hello!");
        assert_eq!(tr.selection(), &Selection::cursor("t", 6));

        // Base is untouched until commit
        assert_eq!(base.doc().text_content(), "Hello");
    }

    #[test]
    fn test_insert_text_replaces_selected_range() {
        let mut tr = snapshot().tr();
        tr.set_selection(Selection::range("t", 1, 4));
        tr.insert_text("ipp").unwrap();

        assert_eq!(tr.doc().text_content(), "Hippo");
        assert_eq!(tr.steps().len(), 2);
    }

    #[test]
    fn test_insert_text_requires_text_selection() {
        let mut tr = snapshot().tr();
        tr.set_selection(Selection::None);

        assert_eq!(tr.insert_text("x").err(), Some(StepError::NoTextSelection));
        assert!(tr.steps().is_empty());
    }

    #[test]
    fn test_failed_step_leaves_transaction_unchanged() {
        let mut tr = snapshot().tr();
        let result = tr.delete_range("t", 2, 10);

        assert!(result.is_err());
        assert!(tr.steps().is_empty());
        assert_eq!(tr.doc().text_content(), "Hello");
    }

    #[test]
    fn test_stored_marks_apply_to_inserted_text() {
        let mut tr = snapshot().tr();
        tr.add_stored_mark(Mark::new("bold"));
        tr.insert_text("!").unwrap();

        assert!(tr.doc().find("t").unwrap().has_mark("bold"));
    }

    #[test]
    fn test_commit_clears_stored_marks_on_doc_change() {
        let base = snapshot();

        let mut tr = base.tr();
        tr.add_stored_mark(Mark::new("italic"));
        let marked = tr.commit();
        assert_eq!(marked.stored_marks().map(<[Mark]>::len), Some(1));

        let mut tr = marked.tr();
        tr.insert_text("x").unwrap();
        let typed = tr.commit();
        assert!(typed.stored_marks().is_none());
        assert_eq!(typed.version(), 2);
    }

    #[test]
    fn test_commit_without_steps_shares_document() {
        let base = snapshot();
        let next = base.tr().commit();

        assert!(std::ptr::eq(base.doc(), next.doc()));
        assert_eq!(next.version(), 1);
    }

    #[test]
    fn test_fresh_ids_are_unused() {
        let mut tr = Snapshot::new(Document::paragraph("n-1", "n-2", "")).tr();

        let id = tr.fresh_id();
        assert_eq!(id, "n-3");
        tr.insert_node("doc", 1, Node::element(id.clone(), "paragraph", vec![]))
            .unwrap();
        assert!(tr.doc().contains(&id));
    }
}
