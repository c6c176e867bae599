use colored::*;

use crate::diagnostic_code::DiagnosticCode;

/// A single static diagnostic: scanner, parser, resolver, or CLI-argument
/// level. Runtime errors are a separate, simpler family (see
/// `interpreter::RuntimeError`) and never flow through this type.
///
/// `location` holds the jlox-style `where` clause verbatim (`""`,
/// `" at end"`, or `" at '<lexeme>'"`) so `render_plain`/`render_colored` can
/// splice it straight into the fixed one-line report format.
#[derive(Debug, Clone)]
pub struct Diagnostic {
  pub code: DiagnosticCode,
  pub message: String,
  pub line: usize,
  pub location: String,
}

impl Diagnostic {
  pub fn new(code: DiagnosticCode, line: usize, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
      line,
      location: String::new(),
    }
  }

  /// Attribute the diagnostic to end-of-input rather than a specific token.
  pub fn at_end(mut self) -> Self {
    self.location = " at end".to_string();
    self
  }

  /// Attribute the diagnostic to a specific token's lexeme.
  pub fn at_lexeme(mut self, lexeme: &str) -> Self {
    self.location = format!(" at '{}'", lexeme);
    self
  }

  pub fn render_plain(&self) -> String {
    format!("[line {}] Error{}: {}", self.line, self.location, self.message)
  }

  pub fn render_colored(&self) -> String {
    format!(
      "[line {}] {}{}: {}",
      self.line,
      "Error".red().bold(),
      self.location,
      self.message
    )
  }
}
