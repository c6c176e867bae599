use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use scanner::token::{types::TokenType, Token};
use std::rc::Rc;

pub mod expr;
pub mod stmt;

use expr::Expr;
use stmt::{FunctionDecl, Stmt};

const MAX_ARGS: usize = 255;

/// Marks that a rule failed to match and a diagnostic has already been
/// emitted; callers use it purely to drive panic-mode `synchronize`, never
/// to report anything themselves.
struct ParseError;

/// Recursive-descent parser over the token stream, one precedence level per
/// method, from `expression` (lowest) down to `primary` (highest) — see the
/// grammar mirrored in each method's doc comment.
pub struct Parser<'a> {
  tokens: Vec<Token>,
  current: usize,
  engine: &'a mut DiagnosticEngine,
}

impl<'a> Parser<'a> {
  pub fn new(tokens: Vec<Token>, engine: &'a mut DiagnosticEngine) -> Self {
    Self {
      tokens,
      current: 0,
      engine,
    }
  }

  /// `program -> declaration* EOF`
  pub fn parse(mut self) -> Vec<Stmt> {
    let mut statements = Vec::new();
    while !self.is_at_end() {
      if let Some(stmt) = self.declaration() {
        statements.push(stmt);
      }
    }
    statements
  }

  // ---- declarations -------------------------------------------------------

  /// `declaration -> classDecl | funDecl | varDecl | statement`
  fn declaration(&mut self) -> Option<Stmt> {
    let result = if self.match_token(&[TokenType::Class]) {
      self.class_declaration()
    } else if self.match_token(&[TokenType::Fun]) {
      self.function_declaration("function").map(Stmt::Function)
    } else if self.match_token(&[TokenType::Var]) {
      self.var_declaration()
    } else {
      self.statement()
    };

    match result {
      Ok(stmt) => Some(stmt),
      Err(ParseError) => {
        self.synchronize();
        None
      },
    }
  }

  /// `classDecl -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" function* "}"`
  fn class_declaration(&mut self) -> Result<Stmt, ParseError> {
    let name = self
      .consume(TokenType::Identifier, DiagnosticCode::ExpectedIdentifier, "Expect class name.")?
      .clone();

    let superclass = if self.match_token(&[TokenType::Less]) {
      let superclass_name = self
        .consume(TokenType::Identifier, DiagnosticCode::ExpectedIdentifier, "Expect superclass name.")?
        .clone();
      Some(Expr::variable(superclass_name))
    } else {
      None
    };

    self.consume(TokenType::LeftBrace, DiagnosticCode::UnexpectedToken, "Expect '{' before class body.")?;

    let mut methods = Vec::new();
    while !self.check(TokenType::RightBrace) && !self.is_at_end() {
      methods.push(self.function_declaration("method")?);
    }

    self.consume(TokenType::RightBrace, DiagnosticCode::MissingClosingBrace, "Expect '}' after class body.")?;

    Ok(Stmt::Class { name, superclass, methods })
  }

  /// `function -> IDENTIFIER "(" parameters? ")" block`
  fn function_declaration(&mut self, kind: &str) -> Result<Rc<FunctionDecl>, ParseError> {
    let name = self
      .consume(TokenType::Identifier, DiagnosticCode::ExpectedIdentifier, format!("Expect {} name.", kind))?
      .clone();

    self.consume(TokenType::LeftParen, DiagnosticCode::UnexpectedToken, format!("Expect '(' after {} name.", kind))?;

    let mut params = Vec::new();
    if !self.check(TokenType::RightParen) {
      loop {
        if params.len() >= MAX_ARGS {
          let token = self.peek().clone();
          self.error_at(&token, DiagnosticCode::TooManyParameters, "Can't have more than 255 parameters.");
        }
        params.push(
          self
            .consume(TokenType::Identifier, DiagnosticCode::ExpectedIdentifier, "Expect parameter name.")?
            .clone(),
        );
        if !self.match_token(&[TokenType::Comma]) {
          break;
        }
      }
    }
    self.consume(TokenType::RightParen, DiagnosticCode::MissingClosingParen, "Expect ')' after parameters.")?;

    self.consume(TokenType::LeftBrace, DiagnosticCode::UnexpectedToken, format!("Expect '{{' before {} body.", kind))?;
    let body = self.block()?;

    Ok(Rc::new(FunctionDecl { name, params, body }))
  }

  /// `varDecl -> "var" IDENTIFIER ( "=" expression )? ";"`
  fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
    let name = self
      .consume(TokenType::Identifier, DiagnosticCode::ExpectedIdentifier, "Expect variable name.")?
      .clone();

    let initializer = if self.match_token(&[TokenType::Equal]) {
      Some(self.expression()?)
    } else {
      None
    };

    self.consume(TokenType::Semicolon, DiagnosticCode::MissingSemicolon, "Expect ';' after variable declaration.")?;
    Ok(Stmt::VarDecl { name, initializer })
  }

  // ---- statements -----------------------------------------------------------

  /// `statement -> exprStmt | forStmt | ifStmt | printStmt | returnStmt
  ///             | whileStmt | block`
  fn statement(&mut self) -> Result<Stmt, ParseError> {
    if self.match_token(&[TokenType::For]) {
      return self.for_statement();
    }
    if self.match_token(&[TokenType::If]) {
      return self.if_statement();
    }
    if self.match_token(&[TokenType::Print]) {
      return self.print_statement();
    }
    if self.match_token(&[TokenType::Return]) {
      return self.return_statement();
    }
    if self.match_token(&[TokenType::While]) {
      return self.while_statement();
    }
    if self.match_token(&[TokenType::LeftBrace]) {
      return Ok(Stmt::Block(self.block()?));
    }
    self.expression_statement()
  }

  /// `forStmt -> "for" "(" ( varDecl | exprStmt | ";" )
  ///             expression? ";" expression? ")" statement`
  ///
  /// Desugared into the equivalent `while` wrapped in a block, rather than
  /// given its own AST node — there is no runtime difference once parsed.
  fn for_statement(&mut self) -> Result<Stmt, ParseError> {
    self.consume(TokenType::LeftParen, DiagnosticCode::UnexpectedToken, "Expect '(' after 'for'.")?;

    let initializer = if self.match_token(&[TokenType::Semicolon]) {
      None
    } else if self.match_token(&[TokenType::Var]) {
      Some(self.var_declaration()?)
    } else {
      Some(self.expression_statement()?)
    };

    let condition = if !self.check(TokenType::Semicolon) {
      self.expression()?
    } else {
      Expr::Literal(Token::new(
        TokenType::True,
        "true".to_string(),
        scanner::token::types::Literal::Bool(true),
        self.previous().line,
      ))
    };
    self.consume(TokenType::Semicolon, DiagnosticCode::MissingSemicolon, "Expect ';' after loop condition.")?;

    let increment = if !self.check(TokenType::RightParen) {
      Some(self.expression()?)
    } else {
      None
    };
    self.consume(TokenType::RightParen, DiagnosticCode::MissingClosingParen, "Expect ')' after for clauses.")?;

    let mut body = self.statement()?;

    if let Some(increment) = increment {
      body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
    }

    body = Stmt::While {
      condition,
      body: Box::new(body),
    };

    if let Some(initializer) = initializer {
      body = Stmt::Block(vec![initializer, body]);
    }

    Ok(body)
  }

  /// `ifStmt -> "if" "(" expression ")" statement ( "else" statement )?`
  fn if_statement(&mut self) -> Result<Stmt, ParseError> {
    self.consume(TokenType::LeftParen, DiagnosticCode::UnexpectedToken, "Expect '(' after 'if'.")?;
    let condition = self.expression()?;
    self.consume(TokenType::RightParen, DiagnosticCode::MissingClosingParen, "Expect ')' after if condition.")?;

    let then_branch = Box::new(self.statement()?);
    let else_branch = if self.match_token(&[TokenType::Else]) {
      Some(Box::new(self.statement()?))
    } else {
      None
    };

    Ok(Stmt::If { condition, then_branch, else_branch })
  }

  /// `printStmt -> "print" expression ";"`
  fn print_statement(&mut self) -> Result<Stmt, ParseError> {
    let value = self.expression()?;
    self.consume(TokenType::Semicolon, DiagnosticCode::MissingSemicolon, "Expect ';' after value.")?;
    Ok(Stmt::Print(value))
  }

  /// `returnStmt -> "return" expression? ";"`
  fn return_statement(&mut self) -> Result<Stmt, ParseError> {
    let keyword = self.previous().clone();
    let value = if !self.check(TokenType::Semicolon) {
      Some(self.expression()?)
    } else {
      None
    };
    self.consume(TokenType::Semicolon, DiagnosticCode::MissingSemicolon, "Expect ';' after return value.")?;
    Ok(Stmt::Return { keyword, value })
  }

  /// `whileStmt -> "while" "(" expression ")" statement`
  fn while_statement(&mut self) -> Result<Stmt, ParseError> {
    self.consume(TokenType::LeftParen, DiagnosticCode::UnexpectedToken, "Expect '(' after 'while'.")?;
    let condition = self.expression()?;
    self.consume(TokenType::RightParen, DiagnosticCode::MissingClosingParen, "Expect ')' after condition.")?;
    let body = Box::new(self.statement()?);
    Ok(Stmt::While { condition, body })
  }

  /// `block -> "{" declaration* "}"`
  fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
    let mut statements = Vec::new();
    while !self.check(TokenType::RightBrace) && !self.is_at_end() {
      if let Some(stmt) = self.declaration() {
        statements.push(stmt);
      }
    }
    self.consume(TokenType::RightBrace, DiagnosticCode::MissingClosingBrace, "Expect '}' after block.")?;
    Ok(statements)
  }

  /// `exprStmt -> expression ";"`
  fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
    let expr = self.expression()?;
    self.consume(TokenType::Semicolon, DiagnosticCode::MissingSemicolon, "Expect ';' after expression.")?;
    Ok(Stmt::Expression(expr))
  }

  // ---- expressions ------------------------------------------------------------

  /// `expression -> assignment`
  fn expression(&mut self) -> Result<Expr, ParseError> {
    self.assignment()
  }

  /// `assignment -> ( call "." )? IDENTIFIER "=" assignment | logic_or`
  fn assignment(&mut self) -> Result<Expr, ParseError> {
    let expr = self.or()?;

    if self.match_token(&[TokenType::Equal]) {
      let equals = self.previous().clone();
      let value = self.assignment()?;

      return match expr {
        Expr::Variable { name, .. } => Ok(Expr::assign(name, value)),
        Expr::Get { object, name } => Ok(Expr::Set { object, name, value: Box::new(value) }),
        _ => {
          self.error_at(&equals, DiagnosticCode::InvalidAssignmentTarget, "Invalid assignment target.");
          // Not fatal: the left-hand side is kept so parsing can continue.
          Ok(expr)
        },
      };
    }

    Ok(expr)
  }

  /// `logic_or -> logic_and ( "or" logic_and )*`
  fn or(&mut self) -> Result<Expr, ParseError> {
    let mut expr = self.and()?;
    while self.match_token(&[TokenType::Or]) {
      let operator = self.previous().clone();
      let right = self.and()?;
      expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
    }
    Ok(expr)
  }

  /// `logic_and -> equality ( "and" equality )*`
  fn and(&mut self) -> Result<Expr, ParseError> {
    let mut expr = self.equality()?;
    while self.match_token(&[TokenType::And]) {
      let operator = self.previous().clone();
      let right = self.equality()?;
      expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
    }
    Ok(expr)
  }

  /// `equality -> comparison ( ( "!=" | "==" ) comparison )*`
  fn equality(&mut self) -> Result<Expr, ParseError> {
    let mut expr = self.comparison()?;
    while self.match_token(&[TokenType::BangEqual, TokenType::EqualEqual]) {
      let operator = self.previous().clone();
      let right = self.comparison()?;
      expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
    }
    Ok(expr)
  }

  /// `comparison -> term ( ( ">" | ">=" | "<" | "<=" ) term )*`
  fn comparison(&mut self) -> Result<Expr, ParseError> {
    let mut expr = self.term()?;
    while self.match_token(&[
      TokenType::Greater,
      TokenType::GreaterEqual,
      TokenType::Less,
      TokenType::LessEqual,
    ]) {
      let operator = self.previous().clone();
      let right = self.term()?;
      expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
    }
    Ok(expr)
  }

  /// `term -> factor ( ( "-" | "+" ) factor )*`
  fn term(&mut self) -> Result<Expr, ParseError> {
    let mut expr = self.factor()?;
    while self.match_token(&[TokenType::Minus, TokenType::Plus]) {
      let operator = self.previous().clone();
      let right = self.factor()?;
      expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
    }
    Ok(expr)
  }

  /// `factor -> unary ( ( "/" | "*" ) unary )*`
  fn factor(&mut self) -> Result<Expr, ParseError> {
    let mut expr = self.unary()?;
    while self.match_token(&[TokenType::Slash, TokenType::Star]) {
      let operator = self.previous().clone();
      let right = self.unary()?;
      expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
    }
    Ok(expr)
  }

  /// `unary -> ( "!" | "-" ) unary | call`
  fn unary(&mut self) -> Result<Expr, ParseError> {
    if self.match_token(&[TokenType::Bang, TokenType::Minus]) {
      let operator = self.previous().clone();
      let right = self.unary()?;
      return Ok(Expr::Unary { operator, right: Box::new(right) });
    }
    self.call()
  }

  /// `call -> primary ( "(" arguments? ")" | "." IDENTIFIER )*`
  fn call(&mut self) -> Result<Expr, ParseError> {
    let mut expr = self.primary()?;

    loop {
      if self.match_token(&[TokenType::LeftParen]) {
        expr = self.finish_call(expr)?;
      } else if self.match_token(&[TokenType::Dot]) {
        let name = self
          .consume(TokenType::Identifier, DiagnosticCode::ExpectedIdentifier, "Expect property name after '.'.")?
          .clone();
        expr = Expr::Get { object: Box::new(expr), name };
      } else {
        break;
      }
    }

    Ok(expr)
  }

  /// `arguments -> expression ( "," expression )*`
  fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
    let mut arguments = Vec::new();
    if !self.check(TokenType::RightParen) {
      loop {
        if arguments.len() >= MAX_ARGS {
          let token = self.peek().clone();
          self.error_at(&token, DiagnosticCode::TooManyArguments, "Can't have more than 255 arguments.");
        }
        arguments.push(self.expression()?);
        if !self.match_token(&[TokenType::Comma]) {
          break;
        }
      }
    }

    let paren = self
      .consume(TokenType::RightParen, DiagnosticCode::MissingClosingParen, "Expect ')' after arguments.")?
      .clone();

    Ok(Expr::Call { callee: Box::new(callee), paren, arguments })
  }

  /// `primary -> "true" | "false" | "nil" | "this" | NUMBER | STRING
  ///           | IDENTIFIER | "(" expression ")" | "super" "." IDENTIFIER`
  fn primary(&mut self) -> Result<Expr, ParseError> {
    if self.match_token(&[
      TokenType::False,
      TokenType::True,
      TokenType::Nil,
      TokenType::Number,
      TokenType::String,
    ]) {
      return Ok(Expr::Literal(self.previous().clone()));
    }

    if self.match_token(&[TokenType::Super]) {
      let keyword = self.previous().clone();
      self.consume(TokenType::Dot, DiagnosticCode::UnexpectedToken, "Expect '.' after 'super'.")?;
      let method = self
        .consume(TokenType::Identifier, DiagnosticCode::ExpectedIdentifier, "Expect superclass method name.")?
        .clone();
      return Ok(Expr::super_(keyword, method));
    }

    if self.match_token(&[TokenType::This]) {
      return Ok(Expr::this(self.previous().clone()));
    }

    if self.match_token(&[TokenType::Identifier]) {
      return Ok(Expr::variable(self.previous().clone()));
    }

    if self.match_token(&[TokenType::LeftParen]) {
      let expr = self.expression()?;
      self.consume(TokenType::RightParen, DiagnosticCode::MissingClosingParen, "Expect ')' after expression.")?;
      return Ok(Expr::Grouping(Box::new(expr)));
    }

    let token = self.peek().clone();
    Err(self.error_at(&token, DiagnosticCode::ExpectedExpression, "Expect expression."))
  }

  // ---- token-stream primitives -----------------------------------------------

  fn match_token(&mut self, kinds: &[TokenType]) -> bool {
    for kind in kinds {
      if self.check(*kind) {
        self.advance();
        return true;
      }
    }
    false
  }

  fn consume(
    &mut self,
    kind: TokenType,
    code: DiagnosticCode,
    message: impl Into<String>,
  ) -> Result<&Token, ParseError> {
    if self.check(kind) {
      return Ok(self.advance());
    }
    let token = self.peek().clone();
    Err(self.error_at(&token, code, message))
  }

  fn check(&self, kind: TokenType) -> bool {
    if self.is_at_end() {
      return false;
    }
    self.peek().token_type == kind
  }

  fn advance(&mut self) -> &Token {
    if !self.is_at_end() {
      self.current += 1;
    }
    self.previous()
  }

  fn is_at_end(&self) -> bool {
    self.peek().token_type == TokenType::Eof
  }

  fn peek(&self) -> &Token {
    &self.tokens[self.current]
  }

  fn previous(&self) -> &Token {
    &self.tokens[self.current - 1]
  }

  fn error_at(&mut self, token: &Token, code: DiagnosticCode, message: impl Into<String>) -> ParseError {
    let diagnostic = Diagnostic::new(code, token.line, message);
    let diagnostic = if token.token_type == TokenType::Eof {
      diagnostic.at_end()
    } else {
      diagnostic.at_lexeme(&token.lexeme)
    };
    self.engine.emit(diagnostic);
    ParseError
  }

  /// Discards tokens until we're likely at the start of the next statement,
  /// so one syntax error doesn't cascade into a wall of spurious ones.
  fn synchronize(&mut self) {
    self.advance();

    while !self.is_at_end() {
      if self.previous().token_type == TokenType::Semicolon {
        return;
      }

      match self.peek().token_type {
        TokenType::Class
        | TokenType::Fun
        | TokenType::Var
        | TokenType::For
        | TokenType::If
        | TokenType::While
        | TokenType::Print
        | TokenType::Return => return,
        _ => {},
      }

      self.advance();
    }
  }
}
