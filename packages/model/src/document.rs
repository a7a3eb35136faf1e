//! # Document Tree
//!
//! A document is a tree of element and text nodes addressed by id.
//!
//! ```text
//! doc
//!  └─ paragraph (p-1)
//!      ├─ text (t-1) "Hello "
//!      └─ text (t-2) "world"   [bold]
//! ```
//!
//! Marks live on text nodes. Element attributes are plain strings.

use crate::StepError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tag used for the root element of every document
pub const ROOT_TAG: &str = "doc";

/// Formatting applied to a whole text node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub name: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl Mark {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Element {
        id: String,
        tag: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<Node>,
    },
    Text {
        id: String,
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
}

impl Node {
    pub fn element(id: impl Into<String>, tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element {
            id: id.into(),
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children,
        }
    }

    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Node::Text {
            id: id.into(),
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Element { id, .. } | Node::Text { id, .. } => id,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            Node::Text { .. } => None,
        }
    }

    /// Text content if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text { text, .. } => Some(text),
            Node::Element { .. } => None,
        }
    }

    pub fn marks(&self) -> &[Mark] {
        match self {
            Node::Text { marks, .. } => marks,
            Node::Element { .. } => &[],
        }
    }

    pub fn has_mark(&self, name: &str) -> bool {
        self.marks().iter().any(|m| m.name == name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            Node::Text { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Element { children, .. } => Some(children),
            Node::Text { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element { children, .. } => Some(children),
            Node::Text { .. } => None,
        }
    }

    /// Length in chars of all text below (and including) this node
    pub fn text_len(&self) -> usize {
        match self {
            Node::Text { text, .. } => text.chars().count(),
            Node::Element { children, .. } => children.iter().map(Node::text_len).sum(),
        }
    }

    fn find(&self, target: &str) -> Option<&Node> {
        if self.id() == target {
            return Some(self);
        }
        self.children()?.iter().find_map(|child| child.find(target))
    }

    fn find_mut(&mut self, target: &str) -> Option<&mut Node> {
        if self.id() == target {
            return Some(self);
        }
        self.children_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(target))
    }

    fn detach(&mut self, target: &str) -> Option<Node> {
        let children = self.children_mut()?;

        if let Some(pos) = children.iter().position(|c| c.id() == target) {
            return Some(children.remove(pos));
        }

        children.iter_mut().find_map(|child| child.detach(target))
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a Node>) {
        match self {
            Node::Text { .. } => out.push(self),
            Node::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// A whole document: a single root element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Node::element(ROOT_TAG, ROOT_TAG, children),
        }
    }

    /// Document holding a single paragraph with one text node
    pub fn paragraph(paragraph_id: &str, text_id: &str, text: &str) -> Self {
        Self::new(vec![Node::element(
            paragraph_id,
            "paragraph",
            vec![Node::text(text_id, text)],
        )])
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.root.find_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Remove a node (and its subtree) from its parent
    ///
    /// The root cannot be removed.
    pub fn detach(&mut self, id: &str) -> Option<Node> {
        self.root.detach(id)
    }

    /// Text nodes in document order
    pub fn text_nodes(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        self.root.collect_text(&mut out);
        out
    }

    /// Concatenated text of every text node, in document order
    pub fn text_content(&self) -> String {
        self.text_nodes()
            .into_iter()
            .filter_map(Node::as_text)
            .collect()
    }

    /// Total text length in chars
    pub fn text_len(&self) -> usize {
        self.root.text_len()
    }

    pub fn is_empty(&self) -> bool {
        self.text_len() == 0
    }

    /// Check that the root is an element and that node ids are unique
    pub fn validate(&self) -> Result<(), StepError> {
        if self.root.is_text() {
            return Err(StepError::InvalidStructure(
                "Document root must be an element".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id()) {
                return Err(StepError::DuplicateId(node.id().to_string()));
            }
            if let Some(children) = node.children() {
                stack.extend(children.iter());
            }
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::paragraph("p-0", "t-0", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(vec![
            Node::element("p-1", "paragraph", vec![Node::text("t-1", "Hello ")]),
            Node::element(
                "p-2",
                "paragraph",
                vec![Node::text("t-2", "wörld"), Node::text("t-3", "!")],
            ),
        ])
    }

    #[test]
    fn test_find_nested_nodes() {
        let doc = sample();

        assert_eq!(doc.find("t-2").and_then(Node::as_text), Some("wörld"));
        assert_eq!(doc.find("p-1").and_then(Node::tag), Some("paragraph"));
        assert!(doc.find("missing").is_none());
    }

    #[test]
    fn test_text_content_and_length_count_chars() {
        let doc = sample();

        assert_eq!(doc.text_content(), "Hello wörld!");
        assert_eq!(doc.text_len(), 12);
        assert!(!doc.is_empty());
        assert!(Document::default().is_empty());
    }

    #[test]
    fn test_detach_removes_subtree() {
        let mut doc = sample();

        let removed = doc.detach("p-2").unwrap();
        assert_eq!(removed.text_len(), 6);
        assert!(!doc.contains("t-2"));
        assert!(doc.detach(ROOT_TAG).is_none());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        assert!(sample().validate().is_ok());

        let doc = Document::new(vec![
            Node::text("same", "a"),
            Node::element("p", "paragraph", vec![Node::text("same", "b")]),
        ]);
        assert_eq!(doc.validate(), Err(StepError::DuplicateId("same".to_string())));

        let text_root = Document {
            root: Node::text("doc", "x"),
        };
        assert!(matches!(
            text_root.validate(),
            Err(StepError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_node_serialization_is_tagged() {
        let node = Node::text("t-1", "hi");
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["id"], "t-1");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
