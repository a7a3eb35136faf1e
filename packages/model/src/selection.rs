use crate::{Document, Step};
use serde::{Deserialize, Serialize};

/// Active selection
///
/// Text selections live inside a single text node; offsets are in chars.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    None,

    Text {
        node_id: String,
        anchor: usize,
        head: usize,
    },

    Node {
        node_id: String,
    },
}

impl Selection {
    pub fn cursor(node_id: impl Into<String>, offset: usize) -> Self {
        Selection::Text {
            node_id: node_id.into(),
            anchor: offset,
            head: offset,
        }
    }

    pub fn range(node_id: impl Into<String>, anchor: usize, head: usize) -> Self {
        Selection::Text {
            node_id: node_id.into(),
            anchor,
            head,
        }
    }

    pub fn node(node_id: impl Into<String>) -> Self {
        Selection::Node {
            node_id: node_id.into(),
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        match self {
            Selection::None => None,
            Selection::Text { node_id, .. } | Selection::Node { node_id } => Some(node_id),
        }
    }

    /// Start of a text selection
    pub fn from(&self) -> Option<usize> {
        match self {
            Selection::Text { anchor, head, .. } => Some((*anchor).min(*head)),
            _ => None,
        }
    }

    /// End of a text selection
    pub fn to(&self) -> Option<usize> {
        match self {
            Selection::Text { anchor, head, .. } => Some((*anchor).max(*head)),
            _ => None,
        }
    }

    /// True for no selection and for a collapsed text cursor
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::None => true,
            Selection::Text { anchor, head, .. } => anchor == head,
            Selection::Node { .. } => false,
        }
    }

    /// Map this selection through a step that has already been applied to `doc`
    pub fn map(&self, step: &Step, doc: &Document) -> Selection {
        let mapped = match (self, step) {
            (
                Selection::Text { node_id, anchor, head },
                Step::InsertText { node_id: target, offset, text },
            ) if node_id == target => {
                let len = text.chars().count();
                let shift = |pos: usize| if pos >= *offset { pos + len } else { pos };
                Selection::range(node_id.clone(), shift(*anchor), shift(*head))
            }

            (
                Selection::Text { node_id, anchor, head },
                Step::DeleteText { node_id: target, from, to },
            ) if node_id == target => {
                let removed = to - from;
                let shift = |pos: usize| {
                    if pos > *to {
                        pos - removed
                    } else if pos > *from {
                        *from
                    } else {
                        pos
                    }
                };
                Selection::range(node_id.clone(), shift(*anchor), shift(*head))
            }

            _ => self.clone(),
        };

        mapped.clamp_to(doc)
    }

    /// Drop the selection if its node is gone, clamp offsets to the node's text
    pub fn clamp_to(self, doc: &Document) -> Selection {
        match self {
            Selection::None => Selection::None,
            Selection::Node { node_id } => {
                if doc.contains(&node_id) {
                    Selection::Node { node_id }
                } else {
                    Selection::None
                }
            }
            Selection::Text { node_id, anchor, head } => match doc.find(&node_id) {
                Some(node) if node.is_text() => {
                    let len = node.text_len();
                    Selection::range(node_id, anchor.min(len), head.min(len))
                }
                _ => Selection::None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_after_insertion_at_cursor() {
        let mut doc = Document::paragraph("p", "t", "abc");
        let step = Step::InsertText {
            node_id: "t".to_string(),
            offset: 1,
            text: "XY".to_string(),
        };
        step.apply(&mut doc).unwrap();

        let mapped = Selection::cursor("t", 1).map(&step, &doc);
        assert_eq!(mapped, Selection::cursor("t", 3));

        let before = Selection::cursor("t", 0).map(&step, &doc);
        assert_eq!(before, Selection::cursor("t", 0));
    }

    #[test]
    fn test_deletion_collapses_positions_inside_range() {
        let mut doc = Document::paragraph("p", "t", "abcdef");
        let step = Step::DeleteText {
            node_id: "t".to_string(),
            from: 1,
            to: 4,
        };
        step.apply(&mut doc).unwrap();

        let mapped = Selection::range("t", 2, 6).map(&step, &doc);
        assert_eq!(mapped, Selection::range("t", 1, 3));
    }

    #[test]
    fn test_selection_dropped_when_node_removed() {
        let mut doc = Document::paragraph("p", "t", "abc");
        let step = Step::RemoveNode {
            node_id: "p".to_string(),
        };
        step.apply(&mut doc).unwrap();

        assert_eq!(Selection::cursor("t", 2).map(&step, &doc), Selection::None);
        assert_eq!(Selection::node("p").map(&step, &doc), Selection::None);
    }

    #[test]
    fn test_from_to_normalize_backwards_ranges() {
        let sel = Selection::range("t", 5, 2);

        assert_eq!(sel.from(), Some(2));
        assert_eq!(sel.to(), Some(5));
        assert!(!sel.is_empty());
        assert!(Selection::None.is_empty());
    }
}
