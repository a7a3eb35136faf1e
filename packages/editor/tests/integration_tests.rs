//! Integration tests for the editor crate

use anyhow::Result;
use folio_editor::{
    step, CommandOutput, ConfigError, CoreCommands, Editor, EditorConfig, EditorError, ExtensionDef,
    DEFAULT_PRIORITY,
};
use folio_model::{Document, Node, Selection, Snapshot, Step};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn test_editor_from_config_file() -> Result<()> {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("folio.config.json");
    std::fs::write(
        &path,
        r#"{
            "content": {
                "root": {
                    "type": "element",
                    "id": "doc",
                    "tag": "doc",
                    "children": [
                        {
                            "type": "element",
                            "id": "title",
                            "tag": "heading",
                            "children": [{ "type": "text", "id": "title-text", "text": "Draft" }]
                        }
                    ]
                }
            },
            "extensionOptions": { "commands": { "verbose": true } }
        }"#,
    )?;

    let config = EditorConfig::load_from_dir(dir.path())?;
    let mut editor = Editor::new(config)?;

    assert_eq!(editor.state().doc().text_content(), "Draft");
    assert_eq!(editor.state().selection(), &Selection::cursor("title-text", 0));
    assert_eq!(editor.extension_options("commands"), Some(&json!({ "verbose": true })));

    let ok = editor
        .chain()
        .set_text_selection("title-text", 5, 5)
        .insert_text(" v2")
        .set_node_attribute("title", "level", "1")
        .insert_paragraph("Body")
        .run()?;

    assert!(ok);
    assert_eq!(editor.state().version(), 1);
    assert_eq!(editor.state().doc().text_content(), "Draft v2Body");
    assert_eq!(editor.state().doc().find("title").and_then(|n| n.attr("level")), Some("1"));

    Ok(())
}

#[test]
fn test_editor_from_config_file_reports_config_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let missing = Editor::from_config_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, EditorError::Config(ConfigError::Io(_))));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"editable\": ")?;
    let broken = Editor::from_config_file(&path).unwrap_err();
    assert!(matches!(broken, EditorError::Config(ConfigError::Parse(_))));

    std::fs::write(&path, r#"{ "editable": false }"#)?;
    let editor = Editor::from_config_file(&path)?;
    assert!(!editor.config().editable);

    Ok(())
}

#[test]
fn test_document_round_trips_through_json() -> Result<()> {
    let mut editor = Editor::builder()
        .content(Document::paragraph("p", "t", "Hello"))
        .build()?;

    editor.commands().set_text_selection("t", 0, 5)?;
    editor.commands().set_mark("bold")?;

    let json = serde_json::to_string(editor.state().doc())?;
    let restored: Document = serde_json::from_str(&json)?;

    assert_eq!(&restored, editor.state().doc());
    assert!(restored.find("t").map(|n| n.has_mark("bold")).unwrap_or(false));

    Ok(())
}

#[test]
fn test_extension_built_on_core_commands() -> Result<()> {
    // Edits the transaction directly and takes its tag from the merged options
    let heading = ExtensionDef::new("heading")
        .with_priority(DEFAULT_PRIORITY + 50)
        .with_options(json!({ "tag": "heading" }))
        .command("addHeading", |args| {
            step(move |ctx| {
                let text: String = args.get(0)?;
                let tag = ctx
                    .editor()
                    .extension_options("heading")
                    .and_then(|o| o["tag"].as_str())
                    .unwrap_or("heading")
                    .to_string();

                let tr = ctx.tr();
                let heading_id = tr.fresh_id();
                let text_id = tr.fresh_id();
                let parent_id = tr.doc().root.id().to_string();
                let heading = Node::element(heading_id, tag, vec![Node::text(text_id.clone(), text.as_str())]);
                tr.step(Step::InsertNode {
                    parent_id,
                    index: 0,
                    node: heading,
                })?
                .set_selection(Selection::cursor(text_id, text.chars().count()));

                ctx.commit();
                Ok(CommandOutput::success())
            })
        });

    let config = EditorConfig::default()
        .with_content(Document::paragraph("p", "t", "body"))
        .with_extension_options("heading", json!({ "tag": "h1" }));
    let mut editor = Editor::builder().config(config).extension(heading).build()?;
    let before = editor.state().clone();

    // A failing chain leaves no trace
    let ok = editor
        .chain()
        .command("addHeading", folio_editor::args!["Title"])
        .has_text("missing")
        .run()?;
    assert!(!ok);
    assert!(Snapshot::ptr_eq(editor.state(), &before));

    let ok = editor
        .chain()
        .command("addHeading", folio_editor::args!["Title"])
        .has_text("Titlebody")
        .insert_text("!")
        .run()?;
    assert!(ok);

    let doc = editor.state().doc();
    assert_eq!(doc.text_content(), "Title!body");
    assert_eq!(doc.root.children().and_then(|c| c.first()).and_then(|n| n.tag()), Some("h1"));

    Ok(())
}
