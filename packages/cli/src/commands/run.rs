use super::load_config;
use crate::script::Script;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use folio_editor::{CommandOutput, Editor};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Script file: a JSON array of `{"command", "args"}` steps
    pub script: PathBuf,

    /// Editor config file (defaults to ./folio.config.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How the script is executed
    #[arg(short, long, value_enum, default_value_t = RunMode::Direct)]
    pub mode: RunMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Run every step as its own command, committing one by one
    Direct,
    /// Queue every step into one chain, committed atomically
    Chain,
    /// Probe every step without touching the document
    Can,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunMode::Direct => "direct",
            RunMode::Chain => "chain",
            RunMode::Can => "can",
        };
        f.write_str(name)
    }
}

/// Outcome of one executed unit: a script step, or the whole chain
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub label: String,
    pub output: CommandOutput,
}

pub fn run(args: RunArgs, cwd: &str) -> Result<()> {
    let config = load_config(args.config.as_deref(), cwd)?;
    let script = Script::load(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script.display()))?;
    let mut editor = Editor::new(config)?;

    println!(
        "▶ {} {} ({} steps, {} mode)",
        "Running".green().bold(),
        args.script.display(),
        script.len(),
        args.mode
    );
    for diagnostic in editor.diagnostics() {
        println!("   {} {}", "warning:".yellow(), diagnostic);
    }
    println!();

    let reports = execute(&mut editor, &script, args.mode)?;
    for report in &reports {
        print_report(report);
    }

    println!();
    println!("{}", serde_json::to_string_pretty(editor.state().doc())?);

    Ok(())
}

/// Execute `script` against `editor` in the given mode
pub fn execute(editor: &mut Editor, script: &Script, mode: RunMode) -> Result<Vec<StepReport>> {
    debug!(steps = script.len(), %mode, "executing script");

    match mode {
        RunMode::Direct => script
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| -> Result<StepReport> {
                let output = editor
                    .commands()
                    .run(&step.command, step.args())
                    .with_context(|| format!("Step {} ({}) failed", index, step.command))?;
                Ok(StepReport {
                    label: step.command.clone(),
                    output,
                })
            })
            .collect(),

        RunMode::Chain => {
            let mut chain = editor.chain();
            for step in &script.steps {
                chain.command(&step.command, step.args());
            }
            let committed = chain.run().context("Chain failed")?;

            Ok(vec![StepReport {
                label: format!("chain of {} steps", script.len()),
                output: CommandOutput::from(committed),
            }])
        }

        RunMode::Can => {
            let can = editor.can();
            script
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| -> Result<StepReport> {
                    let output = can
                        .command(&step.command, step.args())
                        .with_context(|| format!("Step {} ({}) failed", index, step.command))?;
                    Ok(StepReport {
                        label: step.command.clone(),
                        output,
                    })
                })
                .collect()
        }
    }
}

fn print_report(report: &StepReport) {
    let marker = if report.output.is_truthy() {
        "✓".green()
    } else {
        "✗".red()
    };

    match &report.output {
        CommandOutput::Done(_) => println!("   {} {}", marker, report.label),
        CommandOutput::Value(value) => println!("   {} {} → {}", marker, report.label, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::Document;
    use serde_json::json;

    fn editor() -> Editor {
        Editor::builder()
            .content(Document::paragraph("p", "t", "Hello"))
            .build()
            .unwrap()
    }

    fn script() -> Script {
        Script::from_json(
            r#"[
                { "command": "setTextSelection", "args": ["t", 5, 5] },
                { "command": "insertText", "args": [" world"] },
                { "command": "getText" }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_direct_mode_reports_each_step() {
        let mut editor = editor();
        let reports = execute(&mut editor, &script(), RunMode::Direct).unwrap();

        let labels: Vec<_> = reports.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["setTextSelection", "insertText", "getText"]);
        assert_eq!(reports[2].output, CommandOutput::value(json!("Hello world")));
        assert_eq!(editor.state().version(), 2);
    }

    #[test]
    fn test_chain_mode_commits_once() {
        let mut editor = editor();
        let reports = execute(&mut editor, &script(), RunMode::Chain).unwrap();

        assert_eq!(reports.len(), 1);
        assert!(reports[0].output.is_truthy());
        assert_eq!(editor.state().version(), 1);
        assert_eq!(editor.state().doc().text_content(), "Hello world");
    }

    #[test]
    fn test_can_mode_leaves_document_untouched() {
        let mut editor = editor();
        let reports = execute(&mut editor, &script(), RunMode::Can).unwrap();

        assert!(reports.iter().take(2).all(|r| r.output.is_truthy()));
        assert_eq!(editor.state().version(), 0);
        assert_eq!(editor.state().doc().text_content(), "Hello");
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let mut editor = editor();
        let script = Script::from_json(r#"[{ "command": "explode" }]"#).unwrap();

        for mode in [RunMode::Direct, RunMode::Chain, RunMode::Can] {
            assert!(execute(&mut editor, &script, mode).is_err());
        }
    }
}
