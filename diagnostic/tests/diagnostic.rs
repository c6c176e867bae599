use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};

#[test]
fn renders_plain_static_error_without_location() {
  let diagnostic = Diagnostic::new(DiagnosticCode::UnterminatedString, 3, "Unterminated string.");
  assert_eq!(diagnostic.render_plain(), "[line 3] Error: Unterminated string.");
}

#[test]
fn renders_plain_static_error_at_token() {
  let diagnostic = Diagnostic::new(DiagnosticCode::MissingSemicolon, 7, "Expect ';' after value.")
    .at_lexeme("}");
  assert_eq!(
    diagnostic.render_plain(),
    "[line 7] Error at '}': Expect ';' after value."
  );
}

#[test]
fn renders_plain_static_error_at_end() {
  let diagnostic = Diagnostic::new(DiagnosticCode::MissingClosingParen, 12, "Expect ')' after arguments.")
    .at_end();
  assert_eq!(
    diagnostic.render_plain(),
    "[line 12] Error at end: Expect ')' after arguments."
  );
}

#[test]
fn engine_accumulates_and_clears() {
  let mut engine = DiagnosticEngine::new();
  assert!(!engine.has_errors());

  engine.emit(Diagnostic::new(DiagnosticCode::UndefinedVariable, 1, "Undefined variable 'x'."));
  engine.emit(Diagnostic::new(DiagnosticCode::InvalidCharacter, 2, "Unexpected character."));
  assert!(engine.has_errors());
  assert_eq!(engine.error_count(), 2);

  engine.clear();
  assert!(!engine.has_errors());
  assert_eq!(engine.error_count(), 0);
}
