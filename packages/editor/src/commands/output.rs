use serde_json::Value;

/// What a command step returns
///
/// Most commands report success with `Done`. Query-style commands return a
/// `Value`. Chains and dry-runs only look at truthiness.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Done(bool),
    Value(Value),
}

impl CommandOutput {
    pub fn success() -> Self {
        CommandOutput::Done(true)
    }

    pub fn failure() -> Self {
        CommandOutput::Done(false)
    }

    pub fn value(value: impl Into<Value>) -> Self {
        CommandOutput::Value(value.into())
    }

    /// JSON truthiness: `false`, `null`, `0` and `""` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            CommandOutput::Done(done) => *done,
            CommandOutput::Value(value) => match value {
                Value::Null => false,
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
                Value::String(s) => !s.is_empty(),
                Value::Array(_) | Value::Object(_) => true,
            },
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CommandOutput::Done(done) => Some(*done),
            CommandOutput::Value(Value::Bool(b)) => Some(*b),
            CommandOutput::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            CommandOutput::Value(value) => Some(value),
            CommandOutput::Done(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            CommandOutput::Done(done) => Value::Bool(done),
            CommandOutput::Value(value) => value,
        }
    }
}

impl From<bool> for CommandOutput {
    fn from(done: bool) -> Self {
        CommandOutput::Done(done)
    }
}
