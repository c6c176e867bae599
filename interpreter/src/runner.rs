use std::{
  fs,
  io::{self, Write},
};

use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use parser::Parser;
use scanner::Scanner;
use semantic_analysis::Resolver;

use crate::interpreter::Interpreter;

/// The driver: owns the read-eval-print loop and the single-shot file mode,
/// both built on the same scan → parse → resolve → interpret pipeline.
pub struct Runner;

impl Runner {
  pub fn new() -> Self {
    Self
  }

  /// Reads one line at a time from stdin until end-of-input. A compile
  /// error on one line does not end the session and does not poison the
  /// next line's diagnostics; a runtime error is reported the same way and
  /// the loop continues. `exit` is accepted as a convenience terminator
  /// alongside the canonical end-of-input.
  pub fn run_interactive_mode(&mut self) -> i32 {
    let mut engine = DiagnosticEngine::new();
    let mut interpreter = Interpreter::new();

    loop {
      engine.clear();
      print!("> ");
      let _ = io::stdout().flush();

      let mut line = String::new();
      let bytes_read = io::stdin().read_line(&mut line).unwrap_or(0);
      if bytes_read == 0 {
        break;
      }

      let input = line.trim();
      if input == "exit" {
        break;
      }
      if input.is_empty() {
        continue;
      }

      self.run_source(input, &mut interpreter, &mut engine);
    }

    0
  }

  /// Reads `path`, runs it once, and returns the process exit code: 65 if
  /// any static error was raised (the interpreter never runs in that case),
  /// 70 if a runtime error was raised, 0 otherwise.
  pub fn run_file(&mut self, path: &str) -> i32 {
    let source = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(err) => {
        let mut engine = DiagnosticEngine::new();
        engine.emit(Diagnostic::new(
          DiagnosticCode::FileNotFound,
          0,
          format!("could not read file '{}': {}", path, err),
        ));
        engine.print_all();
        return 66;
      },
    };

    let mut engine = DiagnosticEngine::new();
    let mut interpreter = Interpreter::new();
    self.run_source(&source, &mut interpreter, &mut engine)
  }

  /// Runs the scan/parse/resolve/interpret pipeline over one compilation
  /// unit and reports whatever the pipeline produced; returns the exit code
  /// that unit would contribute.
  fn run_source(&mut self, source: &str, interpreter: &mut Interpreter, engine: &mut DiagnosticEngine) -> i32 {
    let tokens = Scanner::new(source.to_string()).scan_tokens(engine);

    let statements = Parser::new(tokens, engine).parse();
    if engine.has_errors() {
      engine.print_all();
      return 65;
    }

    let locals = Resolver::new().resolve(&statements, engine);
    if engine.has_errors() {
      engine.print_all();
      return 65;
    }

    match interpreter.interpret(&statements, locals) {
      Ok(()) => 0,
      Err(error) => {
        eprintln!("{}", error.render());
        70
      },
    }
  }
}
