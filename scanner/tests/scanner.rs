use diagnostic::DiagnosticEngine;
use scanner::{
  token::types::{Literal, TokenType},
  Scanner,
};

fn scan(source: &str) -> (Vec<scanner::token::Token>, DiagnosticEngine) {
  let mut engine = DiagnosticEngine::new();
  let tokens = Scanner::new(source.to_string()).scan_tokens(&mut engine);
  (tokens, engine)
}

#[test]
fn scans_single_and_double_character_operators() {
  let (tokens, engine) = scan("!= == <= >= < > = !");
  assert!(!engine.has_errors());
  let kinds: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
  assert_eq!(
    kinds,
    vec![
      TokenType::BangEqual,
      TokenType::EqualEqual,
      TokenType::LessEqual,
      TokenType::GreaterEqual,
      TokenType::Less,
      TokenType::Greater,
      TokenType::Equal,
      TokenType::Bang,
      TokenType::Eof,
    ]
  );
}

#[test]
fn scans_string_literal_without_processing_escapes() {
  let (tokens, engine) = scan(r#""hi\nthere""#);
  assert!(!engine.has_errors());
  assert_eq!(tokens[0].token_type, TokenType::String);
  assert_eq!(tokens[0].literal, Literal::Str(r"hi\nthere".to_string()));
}

#[test]
fn reports_unterminated_string() {
  let (_, engine) = scan("\"never closed");
  assert!(engine.has_errors());
}

#[test]
fn scans_number_literal() {
  let (tokens, _) = scan("123.45");
  assert_eq!(tokens[0].token_type, TokenType::Number);
  assert_eq!(tokens[0].literal, Literal::Number(123.45));
}

#[test]
fn scans_keywords_and_identifiers() {
  let (tokens, _) = scan("and or class orchid");
  let kinds: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
  assert_eq!(
    kinds,
    vec![
      TokenType::And,
      TokenType::Or,
      TokenType::Class,
      TokenType::Identifier,
      TokenType::Eof,
    ]
  );
}

#[test]
fn line_comments_are_skipped_and_line_numbers_tracked() {
  let (tokens, _) = scan("var a = 1; // a comment\nvar b = 2;");
  let var_b_line = tokens
    .iter()
    .skip_while(|t| t.lexeme != "b")
    .next()
    .unwrap()
    .line;
  assert_eq!(var_b_line, 2);
}

#[test]
fn reports_invalid_character() {
  let (_, engine) = scan("var a = @;");
  assert!(engine.has_errors());
}
