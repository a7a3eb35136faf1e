use crate::args;
use crate::commands::{CommandArgs, CommandInvoker};
use folio_model::Document;
use serde_json::Value;

/// Typed helpers for the built-in commands
///
/// Available on every invocation surface, so the same call reads the same
/// whether it runs now, queues on a chain or probes with `can()`.
pub trait CoreCommands: CommandInvoker {
    fn insert_text(&mut self, text: &str) -> Self::Output<'_> {
        self.invoke("insertText", args![text])
    }

    fn delete_selection(&mut self) -> Self::Output<'_> {
        self.invoke("deleteSelection", CommandArgs::new())
    }

    fn delete_range(&mut self, node_id: &str, from: usize, to: usize) -> Self::Output<'_> {
        self.invoke("deleteRange", args![node_id, from, to])
    }

    fn set_text_selection(&mut self, node_id: &str, anchor: usize, head: usize) -> Self::Output<'_> {
        self.invoke("setTextSelection", args![node_id, anchor, head])
    }

    fn select_node(&mut self, node_id: &str) -> Self::Output<'_> {
        self.invoke("selectNode", args![node_id])
    }

    fn clear_selection(&mut self) -> Self::Output<'_> {
        self.invoke("clearSelection", CommandArgs::new())
    }

    fn set_content(&mut self, doc: &Document) -> Self::Output<'_> {
        self.invoke("setContent", args![doc])
    }

    fn clear_content(&mut self) -> Self::Output<'_> {
        self.invoke("clearContent", CommandArgs::new())
    }

    fn insert_paragraph(&mut self, text: &str) -> Self::Output<'_> {
        self.invoke("insertParagraph", args![text])
    }

    fn set_node_attribute(&mut self, node_id: &str, name: &str, value: &str) -> Self::Output<'_> {
        self.invoke("setNodeAttribute", args![node_id, name, value])
    }

    fn set_mark(&mut self, name: &str) -> Self::Output<'_> {
        self.invoke("setMark", args![name])
    }

    fn unset_mark(&mut self, name: &str) -> Self::Output<'_> {
        self.invoke("unsetMark", args![name])
    }

    fn toggle_mark(&mut self, name: &str) -> Self::Output<'_> {
        self.invoke("toggleMark", args![name])
    }

    fn set_meta(&mut self, key: &str, value: Value) -> Self::Output<'_> {
        self.invoke("setMeta", args![key, value])
    }

    fn doc_length(&mut self) -> Self::Output<'_> {
        self.invoke("docLength", CommandArgs::new())
    }

    fn get_text(&mut self) -> Self::Output<'_> {
        self.invoke("getText", CommandArgs::new())
    }

    fn doc_length_at_least(&mut self, min: usize) -> Self::Output<'_> {
        self.invoke("docLengthAtLeast", args![min])
    }

    fn has_text(&mut self, needle: &str) -> Self::Output<'_> {
        self.invoke("hasText", args![needle])
    }
}

impl<T: CommandInvoker + ?Sized> CoreCommands for T {}
