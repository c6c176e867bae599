use crate::lox_value::LoxValue;

/// A runtime failure: carries the offending line so the top level can
/// render it in the exact `<message>\n[line N]` shape the language
/// promises on stderr.
#[derive(Debug, Clone)]
pub struct RuntimeError {
  pub message: String,
  pub line: usize,
}

impl RuntimeError {
  pub fn new(message: impl Into<String>, line: usize) -> Self {
    Self { message: message.into(), line }
  }

  pub fn render(&self) -> String {
    diagnostic::formatter::render_runtime_error(&self.message, self.line)
  }
}

/// Non-local control flow inside the tree walk. `Return` unwinds to the
/// nearest function call; everything else that aborts evaluation is a
/// genuine `Error`.
#[derive(Debug, Clone)]
pub enum Signal {
  Return(LoxValue),
  Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
  fn from(error: RuntimeError) -> Self {
    Signal::Error(error)
  }
}
