//! # Command Registry
//!
//! Maps command names to factories. A factory binds arguments and returns a
//! one-shot step; the step runs against a `CommandContext`.
//!
//! ```text
//! "insertText" ─▶ factory(args) ─▶ step(ctx) ─▶ CommandOutput
//! ```
//!
//! The registry is built once by the `ExtensionManager` and never changes
//! afterwards.

use crate::commands::{CommandArgs, CommandContext, CommandOutput};
use crate::CommandError;
use indexmap::IndexMap;
use std::sync::Arc;

/// A step bound to its arguments, ready to run once
pub type BoxedStep = Box<dyn FnOnce(&mut CommandContext<'_>) -> Result<CommandOutput, CommandError>>;

/// Shared factory producing bound steps
pub type CommandFactory = Arc<dyn Fn(CommandArgs) -> BoxedStep + Send + Sync>;

/// Box a step closure
pub fn step<F>(f: F) -> BoxedStep
where
    F: FnOnce(&mut CommandContext<'_>) -> Result<CommandOutput, CommandError> + 'static,
{
    Box::new(f)
}

/// Commands contributed by one extension, in declaration order
#[derive(Clone, Default)]
pub struct CommandSet {
    commands: IndexMap<String, CommandFactory>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command; a later command with the same name replaces an earlier one
    pub fn add<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(CommandArgs) -> BoxedStep + Send + Sync + 'static,
    {
        self.commands.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, CommandFactory)> {
        self.commands.into_iter()
    }
}

impl std::fmt::Debug for CommandSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.commands.keys()).finish()
    }
}

/// A registered command and the extension that contributed it
#[derive(Clone)]
pub struct CommandEntry {
    pub factory: CommandFactory,
    pub extension: String,
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

/// Merged, read-only command registry
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    entries: IndexMap<String, CommandEntry>,
}

impl CommandRegistry {
    /// Insert an entry, returning the one it replaced
    pub(crate) fn insert(&mut self, name: String, entry: CommandEntry) -> Option<CommandEntry> {
        self.entries.insert(name, entry)
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up a factory, failing loudly for unregistered names
    pub fn factory(&self, name: &str) -> Result<CommandFactory, CommandError> {
        match self.entries.get(name) {
            Some(entry) => Ok(Arc::clone(&entry.factory)),
            None => {
                tracing::error!(command = name, "Unknown command");
                Err(CommandError::UnknownCommand(name.to_string()))
            }
        }
    }

    /// Look up and bind a command in one go
    pub fn bind(&self, name: &str, args: CommandArgs) -> Result<BoxedStep, CommandError> {
        let factory = self.factory(name)?;
        Ok(factory(args.bind(name)))
    }

    /// Name of the extension that owns a command
    pub fn owner(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.extension.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> CommandFactory {
        Arc::new(|_args| step(|_ctx| Ok(CommandOutput::success())))
    }

    #[test]
    fn test_command_set_keeps_declaration_order() {
        let set = CommandSet::new()
            .add("b", |_args| step(|_ctx| Ok(CommandOutput::success())))
            .add("a", |_args| step(|_ctx| Ok(CommandOutput::success())));

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_command_is_error() {
        let registry = CommandRegistry::default();

        assert_eq!(
            registry.factory("nope").err(),
            Some(CommandError::UnknownCommand("nope".to_string()))
        );
    }

    #[test]
    fn test_insert_reports_replaced_owner() {
        let mut registry = CommandRegistry::default();

        let first = CommandEntry {
            factory: noop(),
            extension: "one".to_string(),
        };
        let second = CommandEntry {
            factory: noop(),
            extension: "two".to_string(),
        };

        assert!(registry.insert("cmd".to_string(), first).is_none());
        let replaced = registry.insert("cmd".to_string(), second).unwrap();

        assert_eq!(replaced.extension, "one");
        assert_eq!(registry.owner("cmd"), Some("two"));
        assert_eq!(registry.len(), 1);
    }
}
