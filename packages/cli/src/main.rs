mod commands;
mod script;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{list, run, ListArgs, RunArgs};
use tracing_subscriber::EnvFilter;

/// Folio CLI - drive a structured-document editor from command scripts
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a command script against a fresh editor
    Run(RunArgs),

    /// List registered commands and the extensions that own them
    Commands(ListArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .context("Cannot get current directory")
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Run(args) => run(args, &cwd),
                Command::Commands(args) => list(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
