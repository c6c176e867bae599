use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};

use crate::{
  token::{
    types::{Literal, TokenType},
    Token,
  },
  Scanner,
};

impl Scanner {
  fn scan_token(&mut self, engine: &mut DiagnosticEngine) {
    let c = self.advance();

    match c {
      '(' => self.add_token(TokenType::LeftParen, Literal::Nil),
      ')' => self.add_token(TokenType::RightParen, Literal::Nil),
      '{' => self.add_token(TokenType::LeftBrace, Literal::Nil),
      '}' => self.add_token(TokenType::RightBrace, Literal::Nil),
      ',' => self.add_token(TokenType::Comma, Literal::Nil),
      '.' => self.add_token(TokenType::Dot, Literal::Nil),
      '-' => self.add_token(TokenType::Minus, Literal::Nil),
      '+' => self.add_token(TokenType::Plus, Literal::Nil),
      ';' => self.add_token(TokenType::Semicolon, Literal::Nil),
      '*' => self.add_token(TokenType::Star, Literal::Nil),

      '!' => {
        let kind = if self.match_char('=') { TokenType::BangEqual } else { TokenType::Bang };
        self.add_token(kind, Literal::Nil);
      },
      '=' => {
        let kind = if self.match_char('=') { TokenType::EqualEqual } else { TokenType::Equal };
        self.add_token(kind, Literal::Nil);
      },
      '<' => {
        let kind = if self.match_char('=') { TokenType::LessEqual } else { TokenType::Less };
        self.add_token(kind, Literal::Nil);
      },
      '>' => {
        let kind = if self.match_char('=') { TokenType::GreaterEqual } else { TokenType::Greater };
        self.add_token(kind, Literal::Nil);
      },

      '/' => {
        if self.match_char('/') {
          // Line comment: consume to end of line, emit no token.
          while self.peek() != Some('\n') && !self.is_at_end() {
            self.advance();
          }
        } else {
          self.add_token(TokenType::Slash, Literal::Nil);
        }
      },

      ' ' | '\r' | '\t' => {},
      '\n' => self.line += 1,

      '"' => self.scan_string(engine),

      c if c.is_ascii_digit() => self.scan_number(),
      c if is_identifier_start(c) => self.scan_identifier(),

      other => {
        engine.emit(Diagnostic::new(
          DiagnosticCode::InvalidCharacter,
          self.line,
          format!("Unexpected character: {}", other),
        ));
      },
    }
  }

  fn scan_string(&mut self, engine: &mut DiagnosticEngine) {
    while self.peek() != Some('"') && !self.is_at_end() {
      if self.peek() == Some('\n') {
        self.line += 1;
      }
      self.advance();
    }

    if self.is_at_end() {
      engine.emit(Diagnostic::new(
        DiagnosticCode::UnterminatedString,
        self.line,
        "Unterminated string.",
      ));
      return;
    }

    // Closing quote.
    self.advance();

    // Lexeme content without the surrounding quotes; no escape processing.
    let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
    self.add_token(TokenType::String, Literal::Str(value));
  }

  fn scan_number(&mut self) {
    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
      self.advance();
    }

    if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
      self.advance(); // consume the '.'
      while self.peek().is_some_and(|c| c.is_ascii_digit()) {
        self.advance();
      }
    }

    let lexeme = self.current_lexeme();
    let value: f64 = lexeme.parse().expect("scanned number lexeme must parse as f64");
    self.add_token(TokenType::Number, Literal::Number(value));
  }

  fn scan_identifier(&mut self) {
    while self.peek().is_some_and(is_identifier_continue) {
      self.advance();
    }

    let lexeme = self.current_lexeme();
    let kind = keyword(&lexeme).unwrap_or(TokenType::Identifier);
    let literal = match kind {
      TokenType::True => Literal::Bool(true),
      TokenType::False => Literal::Bool(false),
      TokenType::Nil => Literal::Nil,
      _ => Literal::Nil,
    };
    self.add_token(kind, literal);
  }

  fn add_token(&mut self, token_type: TokenType, literal: Literal) {
    let lexeme = self.current_lexeme();
    self
      .tokens
      .push(Token::new(token_type, lexeme, literal, self.line));
  }

  fn current_lexeme(&self) -> String {
    self.source[self.start..self.current].iter().collect()
  }

  fn is_at_end(&self) -> bool {
    self.current >= self.source.len()
  }

  fn advance(&mut self) -> char {
    let c = self.source[self.current];
    self.current += 1;
    c
  }

  fn peek(&self) -> Option<char> {
    self.source.get(self.current).copied()
  }

  fn peek_next(&self) -> Option<char> {
    self.source.get(self.current + 1).copied()
  }

  fn match_char(&mut self, expected: char) -> bool {
    if self.peek() != Some(expected) {
      return false;
    }
    self.current += 1;
    true
  }
}

fn is_identifier_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

fn keyword(lexeme: &str) -> Option<TokenType> {
  Some(match lexeme {
    "and" => TokenType::And,
    "class" => TokenType::Class,
    "else" => TokenType::Else,
    "false" => TokenType::False,
    "for" => TokenType::For,
    "fun" => TokenType::Fun,
    "if" => TokenType::If,
    "nil" => TokenType::Nil,
    "or" => TokenType::Or,
    "print" => TokenType::Print,
    "return" => TokenType::Return,
    "super" => TokenType::Super,
    "this" => TokenType::This,
    "true" => TokenType::True,
    "var" => TokenType::Var,
    "while" => TokenType::While,
    _ => return None,
  })
}
