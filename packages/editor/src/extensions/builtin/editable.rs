use crate::extensions::Extension;
use crate::plugins::Plugin;
use crate::Editor;

pub const EDITABLE_PRIORITY: i32 = 1000;

/// Rejects document-changing commits on a read-only editor
///
/// Selection and stored-mark changes still go through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Editable;

impl Extension for Editable {
    fn name(&self) -> &str {
        "editable"
    }

    fn priority(&self) -> i32 {
        EDITABLE_PRIORITY
    }

    fn add_plugins(&self, editor: &Editor) -> Vec<Plugin> {
        let editable = editor.config().editable;
        vec![Plugin::new("editable").filter_transaction(move |tr, _state| {
            editable || !tr.doc_changed()
        })]
    }
}
