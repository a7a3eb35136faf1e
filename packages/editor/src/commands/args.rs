use crate::CommandError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Positional arguments handed to a command factory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    values: Vec<Value>,
    /// Name of the command the arguments are bound to, for error messages
    command: Option<String>,
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            values,
            command: None,
        }
    }

    pub fn push(mut self, value: Value) -> Self {
        self.values.push(value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn raw(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Decode a required argument
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, CommandError> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| self.invalid(index, "missing argument".to_string()))?;

        serde_json::from_value(value.clone()).map_err(|e| self.invalid(index, e.to_string()))
    }

    /// Decode an optional argument; missing and `null` both read as `None`
    pub fn opt<T: DeserializeOwned>(&self, index: usize) -> Result<Option<T>, CommandError> {
        match self.values.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get(index).map(Some),
        }
    }

    pub(crate) fn bind(mut self, command: &str) -> Self {
        self.command = Some(command.to_string());
        self
    }

    fn invalid(&self, index: usize, reason: String) -> CommandError {
        CommandError::InvalidArgument {
            command: self.command.clone().unwrap_or_default(),
            index,
            reason,
        }
    }
}

impl From<Vec<Value>> for CommandArgs {
    fn from(values: Vec<Value>) -> Self {
        Self::from_values(values)
    }
}

impl From<()> for CommandArgs {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

/// Build `CommandArgs` from serializable expressions
///
/// ```rust
/// use folio_editor::args;
///
/// let args = args!["hello", 3, true];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args.get::<u32>(1).unwrap(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::CommandArgs::new()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::CommandArgs::from_values(vec![$($crate::__json::json!($arg)),+])
    };
}
