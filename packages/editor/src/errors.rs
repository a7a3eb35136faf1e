//! Error types for the editor

use folio_model::StepError;
use thiserror::Error;

/// Contract violations raised while looking up or running a command
///
/// Document-state failures ("nothing selected") are not errors: commands
/// report them as a falsy `CommandOutput`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument {index} for command {command}: {reason}")]
    InvalidArgument {
        command: String,
        index: usize,
        reason: String,
    },

    #[error("Step error: {0}")]
    Step(#[from] StepError),
}

/// Failure reported by an extension lifecycle hook
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtensionError {
    #[error("{0}")]
    Hook(String),

    #[error("Panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while constructing an editor
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid initial content: {0}")]
    Content(#[from] StepError),
}
