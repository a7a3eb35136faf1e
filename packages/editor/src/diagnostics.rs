use std::fmt;

/// Non-fatal events recorded while assembling or tearing down an editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A later extension with an already-seen name was dropped
    DuplicateExtension { name: String },

    /// A command name contributed by more than one extension
    CommandOverridden {
        command: String,
        replaced: String,
        by: String,
    },

    /// A later plugin with an already-seen key was dropped
    DuplicatePlugin { key: String },

    /// A lifecycle hook returned an error or panicked
    HookFailed {
        extension: String,
        hook: &'static str,
        message: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateExtension { name } => {
                write!(f, "Duplicate extension '{}' dropped", name)
            }
            Diagnostic::CommandOverridden { command, replaced, by } => {
                write!(f, "Command '{}' from '{}' overridden by '{}'", command, replaced, by)
            }
            Diagnostic::DuplicatePlugin { key } => {
                write!(f, "Duplicate plugin '{}' dropped", key)
            }
            Diagnostic::HookFailed {
                extension,
                hook,
                message,
            } => write!(f, "Hook {} of '{}' failed: {}", hook, extension, message),
        }
    }
}
