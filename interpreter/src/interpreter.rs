use std::{cell::RefCell, collections::HashMap, rc::Rc};

use parser::{
  expr::Expr,
  stmt::{FunctionDecl, Stmt},
};
use scanner::token::{types::TokenType, Token};
use uuid::Uuid;

use crate::{
  class::{LoxClass, LoxInstance},
  env::Env,
  error::{RuntimeError, Signal},
  function::{native::clock::ClockFunction, normal::LoxFunction, LoxCallable},
  lox_value::LoxValue,
};

/// Tree-walking evaluator. Drives the environment chain and callable/class
/// runtime described alongside it; the only non-local transfer it handles
/// itself is the return-unwind (`Signal::Return`), caught by
/// `LoxFunction::call`. A `Signal::Error` instead propagates all the way out
/// to `interpret`, which is the one place that converts it to the
/// `<message>\n[line N]` stderr form.
pub struct Interpreter {
  globals: Rc<RefCell<Env>>,
  env: Rc<RefCell<Env>>,
  locals: HashMap<Uuid, usize>,
}

impl Interpreter {
  pub fn new() -> Self {
    let globals = Env::new();
    globals
      .borrow_mut()
      .define("clock".to_string(), LoxValue::Native(Rc::new(ClockFunction)));

    Self {
      env: globals.clone(),
      globals,
      locals: HashMap::new(),
    }
  }

  /// Exposes the global environment, mainly so callers (tests, an embedder)
  /// can inspect top-level bindings after `interpret` returns without
  /// depending on `print` output.
  pub fn globals(&self) -> Rc<RefCell<Env>> {
    self.globals.clone()
  }

  /// Runs one compilation unit's worth of statements against the resolver's
  /// depth side table. The REPL calls this once per line and relies on
  /// `locals` accumulating rather than being replaced, since each line's
  /// node ids are freshly minted and never collide with an earlier line's.
  pub fn interpret(&mut self, statements: &[Stmt], locals: HashMap<Uuid, usize>) -> Result<(), RuntimeError> {
    self.locals.extend(locals);

    for stmt in statements {
      match self.execute(stmt) {
        Ok(()) => {},
        Err(Signal::Error(error)) => return Err(error),
        Err(Signal::Return(_)) => {
          // The resolver guarantees `return` only appears inside a function
          // body; a return-unwind reaching the top-level statement loop is
          // an interpreter bug, not a user error.
          debug_assert!(false, "return-unwind escaped to the top level");
        },
      }
    }

    Ok(())
  }

  // ---- statements ---------------------------------------------------------

  fn execute(&mut self, stmt: &Stmt) -> Result<(), Signal> {
    match stmt {
      Stmt::Expression(expr) => {
        self.evaluate(expr)?;
        Ok(())
      },

      Stmt::Print(expr) => {
        let value = self.evaluate(expr)?;
        println!("{}", value);
        Ok(())
      },

      Stmt::VarDecl { name, initializer } => {
        let value = match initializer {
          Some(expr) => self.evaluate(expr)?,
          None => LoxValue::Nil,
        };
        self.env.borrow_mut().define(name.lexeme.clone(), value);
        Ok(())
      },

      Stmt::Block(statements) => {
        let env = Env::with_enclosing(self.env.clone());
        self.execute_block(statements, env)
      },

      Stmt::If { condition, then_branch, else_branch } => {
        if self.evaluate(condition)?.is_truthy() {
          self.execute(then_branch)
        } else if let Some(else_branch) = else_branch {
          self.execute(else_branch)
        } else {
          Ok(())
        }
      },

      Stmt::While { condition, body } => {
        while self.evaluate(condition)?.is_truthy() {
          self.execute(body)?;
        }
        Ok(())
      },

      Stmt::Function(decl) => {
        let function = LoxFunction::new(decl.clone(), self.env.clone(), false);
        self
          .env
          .borrow_mut()
          .define(decl.name.lexeme.clone(), LoxValue::Function(Rc::new(function)));
        Ok(())
      },

      Stmt::Return { value, .. } => {
        let value = match value {
          Some(expr) => self.evaluate(expr)?,
          None => LoxValue::Nil,
        };
        Err(Signal::Return(value))
      },

      Stmt::Class { name, superclass, methods } => self.execute_class(name, superclass, methods),
    }
  }

  /// Executes `statements` with `env` as the active environment, restoring
  /// the previous environment on every exit path (normal, error, or
  /// return-unwind) — the only scoped resource in the core.
  pub fn execute_block(&mut self, statements: &[Stmt], env: Rc<RefCell<Env>>) -> Result<(), Signal> {
    let previous = std::mem::replace(&mut self.env, env);

    let result = (|| {
      for stmt in statements {
        self.execute(stmt)?;
      }
      Ok(())
    })();

    self.env = previous;
    result
  }

  fn execute_class(&mut self, name: &Token, superclass: &Option<Expr>, methods: &[Rc<FunctionDecl>]) -> Result<(), Signal> {
    let superclass_value = match superclass {
      Some(expr) => {
        let value = self.evaluate(expr)?;
        match value {
          LoxValue::Class(class) => Some(class),
          // The parser only ever builds `superclass` from a bare identifier.
          _ => return Err(RuntimeError::new("Superclass must be a class.", name.line).into()),
        }
      },
      None => None,
    };

    self.env.borrow_mut().define(name.lexeme.clone(), LoxValue::Nil);

    let method_env = match &superclass_value {
      Some(superclass) => {
        let env = Env::with_enclosing(self.env.clone());
        env.borrow_mut().define("super".to_string(), LoxValue::Class(superclass.clone()));
        env
      },
      None => self.env.clone(),
    };

    let mut method_table = HashMap::new();
    for method in methods {
      let is_initializer = method.name.lexeme == "init";
      let function = LoxFunction::new(method.clone(), method_env.clone(), is_initializer);
      method_table.insert(method.name.lexeme.clone(), Rc::new(function));
    }

    let class = Rc::new(LoxClass {
      name: name.lexeme.clone(),
      superclass: superclass_value,
      methods: method_table,
    });

    self
      .env
      .borrow_mut()
      .assign(&name.lexeme, LoxValue::Class(class), name.line)
      .map_err(Signal::Error)
  }

  // ---- expressions ----------------------------------------------------------

  fn evaluate(&mut self, expr: &Expr) -> Result<LoxValue, Signal> {
    match expr {
      Expr::Literal(token) => Ok(Self::literal_value(token)),
      Expr::Grouping(inner) => self.evaluate(inner),
      Expr::Unary { operator, right } => self.evaluate_unary(operator, right),
      Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
      Expr::Logical { left, operator, right } => self.evaluate_logical(left, operator, right),
      Expr::Variable { id, name } => self.look_up_variable(*id, name),
      Expr::Assign { id, name, value } => self.evaluate_assign(*id, name, value),
      Expr::Call { callee, paren, arguments } => self.evaluate_call(callee, paren, arguments),
      Expr::Get { object, name } => self.evaluate_get(object, name),
      Expr::Set { object, name, value } => self.evaluate_set(object, name, value),
      Expr::This { id, keyword } => self.look_up_variable(*id, keyword),
      Expr::Super { id, keyword, method } => self.evaluate_super(*id, keyword, method),
    }
  }

  fn literal_value(token: &Token) -> LoxValue {
    match &token.literal {
      scanner::token::types::Literal::Number(n) => LoxValue::Number(*n),
      scanner::token::types::Literal::Str(s) => LoxValue::String(s.clone()),
      scanner::token::types::Literal::Bool(b) => LoxValue::Bool(*b),
      scanner::token::types::Literal::Nil => LoxValue::Nil,
    }
  }

  fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<LoxValue, Signal> {
    let right = self.evaluate(right)?;

    match operator.token_type {
      TokenType::Bang => Ok(LoxValue::Bool(!right.is_truthy())),
      TokenType::Minus => match right {
        LoxValue::Number(n) => Ok(LoxValue::Number(-n)),
        _ => Err(RuntimeError::new("Operand must be a number.", operator.line).into()),
      },
      _ => unreachable!("parser never produces a unary operator outside !/-"),
    }
  }

  fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<LoxValue, Signal> {
    let left = self.evaluate(left)?;
    let right = self.evaluate(right)?;

    match operator.token_type {
      TokenType::Plus => match (left, right) {
        (LoxValue::Number(a), LoxValue::Number(b)) => Ok(LoxValue::Number(a + b)),
        (LoxValue::String(a), LoxValue::String(b)) => Ok(LoxValue::String(a + &b)),
        _ => Err(RuntimeError::new("Operands must be two numbers or two strings.", operator.line).into()),
      },
      TokenType::Minus => Self::numeric_binary(left, right, operator, |a, b| a - b),
      TokenType::Star => Self::numeric_binary(left, right, operator, |a, b| a * b),
      TokenType::Slash => Self::numeric_binary(left, right, operator, |a, b| a / b),
      TokenType::Greater => Self::comparison(left, right, operator, |a, b| a > b),
      TokenType::GreaterEqual => Self::comparison(left, right, operator, |a, b| a >= b),
      TokenType::Less => Self::comparison(left, right, operator, |a, b| a < b),
      TokenType::LessEqual => Self::comparison(left, right, operator, |a, b| a <= b),
      TokenType::EqualEqual => Ok(LoxValue::Bool(Self::values_equal(&left, &right))),
      TokenType::BangEqual => Ok(LoxValue::Bool(!Self::values_equal(&left, &right))),
      _ => unreachable!("parser never produces a binary operator outside this set"),
    }
  }

  fn numeric_binary(left: LoxValue, right: LoxValue, operator: &Token, op: fn(f64, f64) -> f64) -> Result<LoxValue, Signal> {
    match (left, right) {
      (LoxValue::Number(a), LoxValue::Number(b)) => Ok(LoxValue::Number(op(a, b))),
      _ => Err(RuntimeError::new("Operands must be numbers.", operator.line).into()),
    }
  }

  fn comparison(left: LoxValue, right: LoxValue, operator: &Token, op: fn(f64, f64) -> bool) -> Result<LoxValue, Signal> {
    match (left, right) {
      (LoxValue::Number(a), LoxValue::Number(b)) => Ok(LoxValue::Bool(op(a, b))),
      _ => Err(RuntimeError::new("Operands must be numbers.", operator.line).into()),
    }
  }

  /// nil equals only nil; scalars compare by value within the same kind;
  /// callables and instances compare by identity; cross-type is always
  /// false and never errors.
  fn values_equal(a: &LoxValue, b: &LoxValue) -> bool {
    match (a, b) {
      (LoxValue::Nil, LoxValue::Nil) => true,
      (LoxValue::Bool(a), LoxValue::Bool(b)) => a == b,
      (LoxValue::Number(a), LoxValue::Number(b)) => a == b,
      (LoxValue::String(a), LoxValue::String(b)) => a == b,
      (LoxValue::Function(a), LoxValue::Function(b)) => Rc::ptr_eq(a, b),
      (LoxValue::Native(a), LoxValue::Native(b)) => Rc::ptr_eq(a, b),
      (LoxValue::Class(a), LoxValue::Class(b)) => Rc::ptr_eq(a, b),
      (LoxValue::Instance(a), LoxValue::Instance(b)) => Rc::ptr_eq(a, b),
      _ => false,
    }
  }

  fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<LoxValue, Signal> {
    let left = self.evaluate(left)?;

    match operator.token_type {
      TokenType::Or if left.is_truthy() => Ok(left),
      TokenType::Or => self.evaluate(right),
      TokenType::And if !left.is_truthy() => Ok(left),
      TokenType::And => self.evaluate(right),
      _ => unreachable!("parser only builds Logical with and/or"),
    }
  }

  fn evaluate_assign(&mut self, id: Uuid, name: &Token, value: &Expr) -> Result<LoxValue, Signal> {
    let value = self.evaluate(value)?;

    if let Some(&depth) = self.locals.get(&id) {
      self.env.borrow_mut().assign_at(depth, &name.lexeme, value.clone());
    } else {
      self.globals.borrow_mut().assign(&name.lexeme, value.clone(), name.line)?;
    }

    Ok(value)
  }

  fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> Result<LoxValue, Signal> {
    let callee = self.evaluate(callee)?;

    let mut args = Vec::with_capacity(arguments.len());
    for argument in arguments {
      args.push(self.evaluate(argument)?);
    }

    match callee {
      LoxValue::Class(class) => {
        let arity = class.arity();
        if args.len() != arity {
          return Err(
            RuntimeError::new(format!("Expected {} arguments but got {}.", arity, args.len()), paren.line).into(),
          );
        }
        class.instantiate(self, args, paren.line)
      },
      other => {
        let Some(callable) = other.as_callable() else {
          return Err(RuntimeError::new("Can only call functions and classes.", paren.line).into());
        };
        if args.len() != callable.arity() {
          return Err(RuntimeError::new(
            format!("Expected {} arguments but got {}.", callable.arity(), args.len()),
            paren.line,
          )
          .into());
        }
        callable.call(self, args, paren.line)
      },
    }
  }

  fn evaluate_get(&mut self, object: &Expr, name: &Token) -> Result<LoxValue, Signal> {
    let object = self.evaluate(object)?;

    match object {
      LoxValue::Instance(instance) => LoxInstance::get(&instance, &name.lexeme, name.line).map_err(Signal::Error),
      _ => Err(RuntimeError::new("Only instances have properties.", name.line).into()),
    }
  }

  fn evaluate_set(&mut self, object: &Expr, name: &Token, value: &Expr) -> Result<LoxValue, Signal> {
    let object = self.evaluate(object)?;

    let LoxValue::Instance(instance) = object else {
      return Err(RuntimeError::new("Only instances have fields.", name.line).into());
    };

    let value = self.evaluate(value)?;
    instance.borrow_mut().set(&name.lexeme, value.clone());
    Ok(value)
  }

  fn evaluate_super(&mut self, id: Uuid, keyword: &Token, method: &Token) -> Result<LoxValue, Signal> {
    let distance = *self
      .locals
      .get(&id)
      .expect("resolver always records a depth for `super`");

    let superclass = match self.env.borrow().get_at(distance, "super") {
      Some(LoxValue::Class(class)) => class,
      _ => unreachable!("`super` always resolves to a class"),
    };

    let instance = match self.env.borrow().get_at(distance - 1, "this") {
      Some(LoxValue::Instance(instance)) => instance,
      _ => unreachable!("`this` is always bound one scope inside `super`"),
    };

    let method = superclass
      .find_method(&method.lexeme)
      .ok_or_else(|| RuntimeError::new(format!("Undefined property '{}'.", method.lexeme), keyword.line))?;

    Ok(LoxValue::Function(method.bind(instance)))
  }

  /// Resolved references go straight to the environment at the recorded
  /// depth; anything absent from the side table is a global.
  fn look_up_variable(&self, id: Uuid, name: &Token) -> Result<LoxValue, Signal> {
    if let Some(&depth) = self.locals.get(&id) {
      return Ok(
        self
          .env
          .borrow()
          .get_at(depth, &name.lexeme)
          .expect("resolver depth must correspond to a live binding"),
      );
    }

    self.globals.borrow().get(&name.lexeme, name.line).map_err(Signal::Error)
  }
}
