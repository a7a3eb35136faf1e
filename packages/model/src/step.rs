//! # Edit Steps
//!
//! Structural edits a transaction records against its pending document.
//!
//! ## Step Semantics
//!
//! ### InsertText / DeleteText
//! - Offsets are chars within one text node
//! - Out-of-range offsets fail, they are never clamped
//!
//! ### InsertNode
//! - Index is clamped to the parent's child count
//! - Fails if any id in the inserted subtree already exists
//!
//! ### RemoveNode
//! - Removes the node and all descendants
//! - The root cannot be removed
//!
//! ### ReplaceDocument
//! - Swaps the whole tree; selections pointing at missing nodes are dropped

use crate::document::{Document, Mark, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A single structural edit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    InsertText {
        node_id: String,
        offset: usize,
        text: String,
    },

    DeleteText {
        node_id: String,
        from: usize,
        to: usize,
    },

    InsertNode {
        parent_id: String,
        index: usize,
        node: Node,
    },

    RemoveNode {
        node_id: String,
    },

    SetAttribute {
        node_id: String,
        name: String,
        value: String,
    },

    AddMark {
        node_id: String,
        mark: Mark,
    },

    RemoveMark {
        node_id: String,
        name: String,
    },

    ReplaceDocument {
        doc: Document,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Node is not text: {0}")]
    NotText(String),

    #[error("Node is not an element: {0}")]
    NotAnElement(String),

    #[error("Offset {offset} out of bounds for node {node_id} (length {len})")]
    OutOfBounds {
        node_id: String,
        offset: usize,
        len: usize,
    },

    #[error("No text selection to edit")]
    NoTextSelection,

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl Step {
    /// Debug name for this step
    pub fn name(&self) -> &'static str {
        match self {
            Step::InsertText { .. } => "insertText",
            Step::DeleteText { .. } => "deleteText",
            Step::InsertNode { .. } => "insertNode",
            Step::RemoveNode { .. } => "removeNode",
            Step::SetAttribute { .. } => "setAttribute",
            Step::AddMark { .. } => "addMark",
            Step::RemoveMark { .. } => "removeMark",
            Step::ReplaceDocument { .. } => "replaceDocument",
        }
    }

    /// True if applying this step can change document content
    pub fn changes_content(&self) -> bool {
        match self {
            Step::InsertText { text, .. } => !text.is_empty(),
            Step::DeleteText { from, to, .. } => from != to,
            _ => true,
        }
    }

    /// Apply step to the document with validation
    pub fn apply(&self, doc: &mut Document) -> Result<(), StepError> {
        self.validate(doc)?;

        match self {
            Step::InsertText { node_id, offset, text } => {
                let content = Self::text_mut(doc, node_id)?;
                let at = byte_index(content, *offset);
                content.insert_str(at, text);
                Ok(())
            }

            Step::DeleteText { node_id, from, to } => {
                let content = Self::text_mut(doc, node_id)?;
                let start = byte_index(content, *from);
                let end = byte_index(content, *to);
                content.replace_range(start..end, "");
                Ok(())
            }

            Step::InsertNode { parent_id, index, node } => {
                let children = doc
                    .find_mut(parent_id)
                    .and_then(Node::children_mut)
                    .ok_or_else(|| StepError::ParentNotFound(parent_id.clone()))?;
                let insert_index = (*index).min(children.len());
                children.insert(insert_index, node.clone());
                Ok(())
            }

            Step::RemoveNode { node_id } => {
                doc.detach(node_id)
                    .map(|_| ())
                    .ok_or_else(|| StepError::NodeNotFound(node_id.clone()))
            }

            Step::SetAttribute { node_id, name, value } => match doc.find_mut(node_id) {
                Some(Node::Element { attrs, .. }) => {
                    attrs.insert(name.clone(), value.clone());
                    Ok(())
                }
                Some(Node::Text { .. }) => Err(StepError::NotAnElement(node_id.clone())),
                None => Err(StepError::NodeNotFound(node_id.clone())),
            },

            Step::AddMark { node_id, mark } => {
                let marks = Self::marks_mut(doc, node_id)?;
                match marks.iter_mut().find(|m| m.name == mark.name) {
                    Some(existing) => *existing = mark.clone(),
                    None => marks.push(mark.clone()),
                }
                Ok(())
            }

            Step::RemoveMark { node_id, name } => {
                let marks = Self::marks_mut(doc, node_id)?;
                marks.retain(|m| &m.name != name);
                Ok(())
            }

            Step::ReplaceDocument { doc: replacement } => {
                *doc = replacement.clone();
                Ok(())
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), StepError> {
        match self {
            Step::InsertText { node_id, offset, .. } => {
                let len = Self::text_len(doc, node_id)?;
                Self::check_offset(node_id, *offset, len)
            }

            Step::DeleteText { node_id, from, to } => {
                let len = Self::text_len(doc, node_id)?;
                Self::check_offset(node_id, *to, len)?;
                if from > to {
                    return Err(StepError::InvalidStructure(format!(
                        "Delete range {}..{} is reversed",
                        from, to
                    )));
                }
                Ok(())
            }

            Step::InsertNode { parent_id, node, .. } => {
                let parent = doc
                    .find(parent_id)
                    .ok_or_else(|| StepError::ParentNotFound(parent_id.clone()))?;

                if parent.is_text() {
                    return Err(StepError::NotAnElement(parent_id.clone()));
                }

                let mut ids = Vec::new();
                collect_ids(node, &mut HashSet::new(), &mut ids)?;
                match ids.into_iter().find(|id| doc.contains(id)) {
                    Some(id) => Err(StepError::DuplicateId(id.to_string())),
                    None => Ok(()),
                }
            }

            Step::RemoveNode { node_id } => {
                if doc.root.id() == node_id {
                    return Err(StepError::InvalidStructure(
                        "Cannot remove the document root".to_string(),
                    ));
                }
                doc.find(node_id)
                    .map(|_| ())
                    .ok_or_else(|| StepError::NodeNotFound(node_id.clone()))
            }

            Step::SetAttribute { node_id, .. } => match doc.find(node_id) {
                Some(node) if !node.is_text() => Ok(()),
                Some(_) => Err(StepError::NotAnElement(node_id.clone())),
                None => Err(StepError::NodeNotFound(node_id.clone())),
            },

            Step::AddMark { node_id, .. } | Step::RemoveMark { node_id, .. } => {
                Self::text_len(doc, node_id).map(|_| ())
            }

            Step::ReplaceDocument { doc: replacement } => replacement.validate(),
        }
    }

    fn text_len(doc: &Document, node_id: &str) -> Result<usize, StepError> {
        let node = doc
            .find(node_id)
            .ok_or_else(|| StepError::NodeNotFound(node_id.to_string()))?;

        if node.is_text() {
            Ok(node.text_len())
        } else {
            Err(StepError::NotText(node_id.to_string()))
        }
    }

    fn check_offset(node_id: &str, offset: usize, len: usize) -> Result<(), StepError> {
        if offset > len {
            return Err(StepError::OutOfBounds {
                node_id: node_id.to_string(),
                offset,
                len,
            });
        }
        Ok(())
    }

    fn text_mut<'a>(doc: &'a mut Document, node_id: &str) -> Result<&'a mut String, StepError> {
        match doc.find_mut(node_id) {
            Some(Node::Text { text, .. }) => Ok(text),
            Some(_) => Err(StepError::NotText(node_id.to_string())),
            None => Err(StepError::NodeNotFound(node_id.to_string())),
        }
    }

    fn marks_mut<'a>(doc: &'a mut Document, node_id: &str) -> Result<&'a mut Vec<Mark>, StepError> {
        match doc.find_mut(node_id) {
            Some(Node::Text { marks, .. }) => Ok(marks),
            Some(_) => Err(StepError::NotText(node_id.to_string())),
            None => Err(StepError::NodeNotFound(node_id.to_string())),
        }
    }
}

/// Gather every id in the subtree; a repeated id is an error
fn collect_ids<'a>(
    node: &'a Node,
    seen: &mut HashSet<&'a str>,
    out: &mut Vec<&'a str>,
) -> Result<(), StepError> {
    if !seen.insert(node.id()) {
        return Err(StepError::DuplicateId(node.id().to_string()));
    }
    out.push(node.id());
    if let Some(children) = node.children() {
        for child in children {
            collect_ids(child, seen, out)?;
        }
    }
    Ok(())
}

/// Byte index of a char offset (offset must be in bounds)
fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_serialization() {
        let step = Step::InsertText {
            node_id: "t-1".to_string(),
            offset: 2,
            text: "Hello".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"op\":\"insertText\""));

        let deserialized: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(step, deserialized);
    }

    #[test]
    fn test_insert_and_delete_text_use_char_offsets() {
        let mut doc = Document::paragraph("p", "t", "héllo");

        Step::InsertText {
            node_id: "t".to_string(),
            offset: 2,
            text: "ü".to_string(),
        }
        .apply(&mut doc)
        .unwrap();
        assert_eq!(doc.text_content(), "héüllo");

        Step::DeleteText {
            node_id: "t".to_string(),
            from: 1,
            to: 3,
        }
        .apply(&mut doc)
        .unwrap();
        assert_eq!(doc.text_content(), "hllo");
    }

    #[test]
    fn test_validation_rejects_bad_targets() {
        let doc = Document::paragraph("p", "t", "abc");

        let out_of_bounds = Step::InsertText {
            node_id: "t".to_string(),
            offset: 4,
            text: "x".to_string(),
        };
        assert!(matches!(
            out_of_bounds.validate(&doc),
            Err(StepError::OutOfBounds { len: 3, .. })
        ));

        let not_text = Step::InsertText {
            node_id: "p".to_string(),
            offset: 0,
            text: "x".to_string(),
        };
        assert_eq!(not_text.validate(&doc), Err(StepError::NotText("p".to_string())));

        let remove_root = Step::RemoveNode {
            node_id: "doc".to_string(),
        };
        assert!(matches!(
            remove_root.validate(&doc),
            Err(StepError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_insert_node_rejects_duplicate_ids() {
        let mut doc = Document::paragraph("p", "t", "abc");

        let dup = Step::InsertNode {
            parent_id: "doc".to_string(),
            index: 1,
            node: Node::element("p-2", "paragraph", vec![Node::text("t", "again")]),
        };
        assert_eq!(dup.apply(&mut doc), Err(StepError::DuplicateId("t".to_string())));
        assert!(!doc.contains("p-2"));
    }

    #[test]
    fn test_insert_node_rejects_internal_duplicate_ids() {
        let mut doc = Document::paragraph("p", "t", "abc");

        let dup = Step::InsertNode {
            parent_id: "doc".to_string(),
            index: 1,
            node: Node::element("q", "paragraph", vec![Node::text("z", "1"), Node::text("z", "2")]),
        };
        assert_eq!(dup.validate(&doc), Err(StepError::DuplicateId("z".to_string())));
        assert_eq!(dup.apply(&mut doc), Err(StepError::DuplicateId("z".to_string())));
        assert!(!doc.contains("q"));
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_marks_replace_by_name() {
        let mut doc = Document::paragraph("p", "t", "abc");

        let add = |mark: Mark| Step::AddMark {
            node_id: "t".to_string(),
            mark,
        };
        add(Mark::new("link").with_attr("href", "a")).apply(&mut doc).unwrap();
        add(Mark::new("link").with_attr("href", "b")).apply(&mut doc).unwrap();

        let marks = doc.find("t").unwrap().marks();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].attrs.get("href").map(String::as_str), Some("b"));

        Step::RemoveMark {
            node_id: "t".to_string(),
            name: "link".to_string(),
        }
        .apply(&mut doc)
        .unwrap();
        assert!(doc.find("t").unwrap().marks().is_empty());
    }
}
