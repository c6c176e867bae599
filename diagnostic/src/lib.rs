pub mod diagnostic;
pub mod diagnostic_code;
pub mod formatter;

use std::io::Write;

use crate::diagnostic::Diagnostic;

/// Collector for all static diagnostics produced while scanning, parsing, and
/// resolving one compilation unit (one file, or one REPL line).
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
  diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEngine {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn emit(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }

  pub fn has_errors(&self) -> bool {
    !self.diagnostics.is_empty()
  }

  pub fn error_count(&self) -> usize {
    self.diagnostics.len()
  }

  /// Discards all accumulated diagnostics. The REPL calls this between
  /// lines so one bad line doesn't poison the error state of the next.
  pub fn clear(&mut self) {
    self.diagnostics.clear();
  }

  /// Prints every accumulated diagnostic to stderr, one per line, in the
  /// order they were emitted.
  pub fn print_all(&self) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    for diagnostic in &self.diagnostics {
      let _ = writeln!(handle, "{}", diagnostic.render_colored());
    }
  }

  pub fn get_diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }
}
