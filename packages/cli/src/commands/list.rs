use super::load_config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::Editor;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Editor config file (defaults to ./folio.config.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn list(args: ListArgs, cwd: &str) -> Result<()> {
    let config = load_config(args.config.as_deref(), cwd)?;
    let editor = Editor::new(config)?;

    println!("{}", "📋 Registered commands".bright_blue().bold());
    println!(
        "   Extensions: {}",
        editor.extension_manager().names().collect::<Vec<_>>().join(", ")
    );
    println!();

    for (name, owner) in command_table(&editor) {
        println!("   {:<24} {}", name.bold(), owner.dimmed());
    }

    if !editor.diagnostics().is_empty() {
        println!();
        for diagnostic in editor.diagnostics() {
            println!("   {} {}", "warning:".yellow(), diagnostic);
        }
    }

    println!();
    println!("   {} commands", editor.registry().len());

    Ok(())
}

/// `(command, owning extension)` pairs sorted by command name
pub fn command_table(editor: &Editor) -> Vec<(String, String)> {
    let mut rows: Vec<_> = editor
        .registry()
        .iter()
        .map(|(name, entry)| (name.to_string(), entry.extension.clone()))
        .collect();
    rows.sort();
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::{step, CommandOutput, ExtensionDef};

    #[test]
    fn test_command_table_names_owners() {
        let editor = Editor::builder()
            .extension(ExtensionDef::new("shout").command("insertText", |_args| {
                step(|_ctx| Ok(CommandOutput::failure()))
            }))
            .build()
            .unwrap();

        let rows = command_table(&editor);
        assert!(rows.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(rows.contains(&("insertText".to_string(), "shout".to_string())));
        assert!(rows.contains(&("setMark".to_string(), "commands".to_string())));
    }
}
