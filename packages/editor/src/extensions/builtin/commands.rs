//! # Base Commands
//!
//! The built-in command set.
//!
//! ## Conventions
//!
//! - Mutating commands edit `ctx.tr()` and then call `ctx.commit()`
//! - Pre-checks read the pending transaction, so they hold inside chains
//! - "Cannot apply here" (no selection, missing node) is a falsy result
//! - Undecodable arguments and malformed documents are errors
//! - Queries read `ctx.state()` and return a value

use crate::args;
use crate::commands::{step, CommandArgs, CommandContext, CommandOutput, CommandSet, StateRead};
use crate::extensions::Extension;
use crate::CommandError;
use folio_model::{Document, Mark, Node, Selection, Step};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct BaseCommands;

impl Extension for BaseCommands {
    fn name(&self) -> &str {
        "commands"
    }

    fn add_commands(&self) -> CommandSet {
        CommandSet::new()
            .add("insertText", |args| step(move |ctx| insert_text(ctx, &args)))
            .add("deleteSelection", |_args| step(delete_selection))
            .add("deleteRange", |args| step(move |ctx| delete_range(ctx, &args)))
            .add("setTextSelection", |args| step(move |ctx| set_text_selection(ctx, &args)))
            .add("selectNode", |args| step(move |ctx| select_node(ctx, &args)))
            .add("clearSelection", |_args| step(clear_selection))
            .add("setContent", |args| step(move |ctx| set_content(ctx, &args)))
            .add("clearContent", |_args| step(clear_content))
            .add("insertParagraph", |args| step(move |ctx| insert_paragraph(ctx, &args)))
            .add("setNodeAttribute", |args| step(move |ctx| set_node_attribute(ctx, &args)))
            .add("setMark", |args| step(move |ctx| set_mark(ctx, &args)))
            .add("unsetMark", |args| step(move |ctx| unset_mark(ctx, &args)))
            .add("toggleMark", |args| step(move |ctx| toggle_mark(ctx, &args)))
            .add("setMeta", |args| step(move |ctx| set_meta(ctx, &args)))
            .add("first", |args| step(move |ctx| first(ctx, &args)))
            .add("docLength", |_args| step(doc_length))
            .add("getText", |_args| step(get_text))
            .add("docLengthAtLeast", |args| step(move |ctx| doc_length_at_least(ctx, &args)))
            .add("hasText", |args| step(move |ctx| has_text(ctx, &args)))
    }
}

type CommandResult = Result<CommandOutput, CommandError>;

fn committed(ctx: &CommandContext<'_>) -> CommandResult {
    ctx.commit();
    Ok(CommandOutput::success())
}

fn has_text_selection(ctx: &CommandContext<'_>) -> bool {
    matches!(ctx.pending().selection(), Selection::Text { .. })
}

fn insert_text(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let text: String = args.get(0)?;
    if !has_text_selection(ctx) {
        return Ok(CommandOutput::failure());
    }

    ctx.tr().insert_text(&text)?;
    committed(ctx)
}

fn delete_selection(ctx: &mut CommandContext<'_>) -> CommandResult {
    let root_selected = ctx.pending().selection().node_id() == Some(ctx.pending().doc().root.id());
    if root_selected || !ctx.tr().delete_selection()? {
        return Ok(CommandOutput::failure());
    }
    committed(ctx)
}

fn delete_range(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let node_id: String = args.get(0)?;
    let from: usize = args.get(1)?;
    let to: usize = args.get(2)?;

    if from > to {
        return Ok(CommandOutput::failure());
    }
    match ctx.tr().delete_range(&node_id, from, to) {
        Ok(_) => committed(ctx),
        Err(e) => {
            debug!(error = %e, "deleteRange does not apply");
            Ok(CommandOutput::failure())
        }
    }
}

fn set_text_selection(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let node_id: String = args.get(0)?;
    let anchor: usize = args.get(1)?;
    let head: usize = args.opt(2)?.unwrap_or(anchor);

    let is_text = ctx.pending().doc().find(&node_id).map(Node::is_text).unwrap_or(false);
    if !is_text {
        return Ok(CommandOutput::failure());
    }

    ctx.tr().set_selection(Selection::range(node_id, anchor, head));
    committed(ctx)
}

fn select_node(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let node_id: String = args.get(0)?;

    let doc = ctx.pending().doc();
    if !doc.contains(&node_id) || doc.root.id() == node_id {
        return Ok(CommandOutput::failure());
    }

    ctx.tr().set_selection(Selection::node(node_id));
    committed(ctx)
}

fn clear_selection(ctx: &mut CommandContext<'_>) -> CommandResult {
    ctx.tr().set_selection(Selection::None);
    committed(ctx)
}

/// Replace the document and put the cursor at the start of its first text node
fn replace_document(ctx: &mut CommandContext<'_>, doc: Document) -> CommandResult {
    let cursor = doc
        .text_nodes()
        .first()
        .map(|node| Selection::cursor(node.id(), 0))
        .unwrap_or_default();

    ctx.tr().step(Step::ReplaceDocument { doc })?.set_selection(cursor);
    committed(ctx)
}

fn set_content(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let doc: Document = args.get(0)?;
    replace_document(ctx, doc)
}

fn clear_content(ctx: &mut CommandContext<'_>) -> CommandResult {
    let paragraph_id = ctx.tr().fresh_id();
    let text_id = ctx.tr().fresh_id();
    replace_document(ctx, Document::paragraph(&paragraph_id, &text_id, ""))
}

fn insert_paragraph(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let text: String = args.get(0)?;

    let tr = ctx.tr();
    let paragraph_id = tr.fresh_id();
    let text_id = tr.fresh_id();
    let root = &tr.doc().root;
    let (root_id, index) = (root.id().to_string(), root.children().map(<[Node]>::len).unwrap_or(0));

    let paragraph = Node::element(paragraph_id, "paragraph", vec![Node::text(text_id.clone(), text.as_str())]);
    tr.insert_node(&root_id, index, paragraph)?
        .set_selection(Selection::cursor(text_id, text.chars().count()));
    committed(ctx)
}

fn set_node_attribute(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let node_id: String = args.get(0)?;
    let name: String = args.get(1)?;
    let value: String = args.get(2)?;

    match ctx.tr().step(Step::SetAttribute { node_id, name, value }) {
        Ok(_) => committed(ctx),
        Err(e) => {
            debug!(error = %e, "setNodeAttribute does not apply");
            Ok(CommandOutput::failure())
        }
    }
}

/// Text node a mark command targets, and whether it covers a range
fn mark_target(ctx: &CommandContext<'_>) -> Option<(String, bool)> {
    let tr = ctx.pending();
    match tr.selection() {
        Selection::Text { node_id, .. } => Some((node_id.clone(), !tr.selection().is_empty())),
        Selection::Node { node_id } => tr
            .doc()
            .find(node_id)
            .filter(|node| node.is_text())
            .map(|_| (node_id.clone(), true)),
        Selection::None => None,
    }
}

fn set_mark(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let name: String = args.get(0)?;
    let attrs: BTreeMap<String, String> = args.opt(1)?.unwrap_or_default();
    let mark = Mark { name, attrs };

    match mark_target(ctx) {
        Some((node_id, true)) => {
            ctx.tr().step(Step::AddMark { node_id, mark })?;
        }
        Some((_, false)) => {
            ctx.tr().add_stored_mark(mark);
        }
        None => return Ok(CommandOutput::failure()),
    }
    committed(ctx)
}

fn unset_mark(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let name: String = args.get(0)?;

    match mark_target(ctx) {
        Some((node_id, true)) => {
            ctx.tr().step(Step::RemoveMark { node_id, name })?;
        }
        Some((_, false)) => {
            ctx.tr().remove_stored_mark(&name);
        }
        None => return Ok(CommandOutput::failure()),
    }
    committed(ctx)
}

fn toggle_mark(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let name: String = args.get(0)?;

    let active = match mark_target(ctx) {
        Some((node_id, true)) => ctx
            .pending()
            .doc()
            .find(&node_id)
            .map(|node| node.has_mark(&name))
            .unwrap_or(false),
        Some((_, false)) => ctx.pending().current_marks().iter().any(|m| m.name == name),
        None => return Ok(CommandOutput::failure()),
    };

    if active {
        ctx.run("unsetMark", args![name])
    } else {
        ctx.run("setMark", args.clone())
    }
}

fn set_meta(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let key: String = args.get(0)?;
    let value: Value = args.opt(1)?.unwrap_or(Value::Null);

    ctx.tr().set_meta(key, value);
    committed(ctx)
}

/// Run the first alternative that a dry run reports as truthy
fn first(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let alternatives: Vec<(String, Vec<Value>)> = args.get(0)?;

    for (name, values) in alternatives {
        let args = CommandArgs::from_values(values);
        if ctx.can().command(&name, args.clone())?.is_truthy() {
            debug!(command = %name, "first: picked alternative");
            return ctx.run(&name, args);
        }
    }
    Ok(CommandOutput::failure())
}

fn doc_length(ctx: &mut CommandContext<'_>) -> CommandResult {
    Ok(CommandOutput::value(ctx.state().doc().text_len()))
}

fn get_text(ctx: &mut CommandContext<'_>) -> CommandResult {
    Ok(CommandOutput::value(ctx.state().doc().text_content()))
}

fn doc_length_at_least(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let min: usize = args.get(0)?;
    Ok(CommandOutput::from(ctx.state().doc().text_len() >= min))
}

fn has_text(ctx: &mut CommandContext<'_>, args: &CommandArgs) -> CommandResult {
    let needle: String = args.get(0)?;
    Ok(CommandOutput::from(ctx.state().doc().text_content().contains(&needle)))
}
