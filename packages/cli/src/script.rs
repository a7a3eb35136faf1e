use folio_editor::CommandArgs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Cannot read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Script step {index} has an empty command name")]
    EmptyCommand { index: usize },
}

/// One command invocation in a script file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub command: String,

    #[serde(default)]
    pub args: Vec<Value>,
}

impl ScriptStep {
    pub fn args(&self) -> CommandArgs {
        CommandArgs::from_values(self.args.clone())
    }
}

/// A script is a JSON array of steps: `[{"command": "insertText", "args": ["hi"]}]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(json)?;

        if let Some(index) = script.steps.iter().position(|s| s.command.trim().is_empty()) {
            return Err(ScriptError::EmptyCommand { index });
        }

        Ok(script)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
