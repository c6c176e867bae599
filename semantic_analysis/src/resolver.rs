use std::collections::HashMap;

use diagnostic::{diagnostic::Diagnostic, diagnostic_code::DiagnosticCode, DiagnosticEngine};
use parser::{
  expr::Expr,
  stmt::{FunctionDecl, Stmt},
};
use scanner::token::Token;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
  None,
  Function,
  Initializer,
  Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassType {
  None,
  Class,
  Subclass,
}

/// Static pass between parsing and evaluation: walks the AST once to work
/// out, for every variable reference, how many enclosing scopes separate it
/// from its declaration. The interpreter's environment chain uses that
/// number directly instead of walking scopes at every lookup.
///
/// The side table is keyed by each expression's `Uuid`, not by variable
/// name — two unrelated references that happen to share a lexeme must
/// resolve independently.
pub struct Resolver {
  scopes: Vec<HashMap<String, bool>>,
  locals: HashMap<Uuid, usize>,
  current_function: FunctionType,
  current_class: ClassType,
}

impl Resolver {
  pub fn new() -> Self {
    Self {
      scopes: Vec::new(),
      locals: HashMap::new(),
      current_function: FunctionType::None,
      current_class: ClassType::None,
    }
  }

  /// Resolves a whole program and hands back the depth side table.
  pub fn resolve(mut self, statements: &[Stmt], engine: &mut DiagnosticEngine) -> HashMap<Uuid, usize> {
    self.resolve_statements(statements, engine);
    self.locals
  }

  fn resolve_statements(&mut self, statements: &[Stmt], engine: &mut DiagnosticEngine) {
    for stmt in statements {
      self.resolve_stmt(stmt, engine);
    }
  }

  fn resolve_stmt(&mut self, stmt: &Stmt, engine: &mut DiagnosticEngine) {
    match stmt {
      Stmt::Block(statements) => {
        self.begin_scope();
        self.resolve_statements(statements, engine);
        self.end_scope();
      },

      Stmt::VarDecl { name, initializer } => {
        self.declare(name, engine);
        if let Some(initializer) = initializer {
          self.resolve_expr(initializer, engine);
        }
        self.define(name);
      },

      Stmt::Function(decl) => {
        self.declare(&decl.name, engine);
        self.define(&decl.name);
        self.resolve_function(decl, FunctionType::Function, engine);
      },

      Stmt::Expression(expr) => self.resolve_expr(expr, engine),
      Stmt::Print(expr) => self.resolve_expr(expr, engine),

      Stmt::If { condition, then_branch, else_branch } => {
        self.resolve_expr(condition, engine);
        self.resolve_stmt(then_branch, engine);
        if let Some(else_branch) = else_branch {
          self.resolve_stmt(else_branch, engine);
        }
      },

      Stmt::While { condition, body } => {
        self.resolve_expr(condition, engine);
        self.resolve_stmt(body, engine);
      },

      Stmt::Return { keyword, value } => {
        if self.current_function == FunctionType::None {
          engine.emit(Diagnostic::new(
            DiagnosticCode::ReturnOutsideFunction,
            keyword.line,
            "Can't return from top-level code.",
          ));
        }

        if let Some(value) = value {
          if self.current_function == FunctionType::Initializer {
            engine.emit(Diagnostic::new(
              DiagnosticCode::ReturnFromInitializer,
              keyword.line,
              "Can't return a value from an initializer.",
            ));
          }
          self.resolve_expr(value, engine);
        }
      },

      Stmt::Class { name, superclass, methods } => {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(name, engine);
        self.define(name);

        if let Some(superclass_expr) = superclass {
          if let Expr::Variable { name: super_name, .. } = superclass_expr {
            if super_name.lexeme == name.lexeme {
              engine.emit(Diagnostic::new(
                DiagnosticCode::ClassInheritsItself,
                super_name.line,
                "A class can't inherit from itself.",
              ));
            }
          }
          self.current_class = ClassType::Subclass;
          self.resolve_expr(superclass_expr, engine);

          self.begin_scope();
          self.scopes.last_mut().unwrap().insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().unwrap().insert("this".to_string(), true);

        for method in methods {
          let kind = if method.name.lexeme == "init" {
            FunctionType::Initializer
          } else {
            FunctionType::Method
          };
          self.resolve_function(method, kind, engine);
        }

        self.end_scope();

        if superclass.is_some() {
          self.end_scope();
        }

        self.current_class = enclosing_class;
      },
    }
  }

  fn resolve_expr(&mut self, expr: &Expr, engine: &mut DiagnosticEngine) {
    match expr {
      Expr::Variable { id, name } => {
        if let Some(scope) = self.scopes.last() {
          if scope.get(&name.lexeme) == Some(&false) {
            engine.emit(Diagnostic::new(
              DiagnosticCode::SelfReferenceInInitializer,
              name.line,
              "Can't read local variable in its own initializer.",
            ));
          }
        }
        self.resolve_local(*id, &name.lexeme);
      },

      Expr::Assign { id, name, value } => {
        self.resolve_expr(value, engine);
        self.resolve_local(*id, &name.lexeme);
      },

      Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
        self.resolve_expr(left, engine);
        self.resolve_expr(right, engine);
      },

      Expr::Unary { right, .. } => self.resolve_expr(right, engine),
      Expr::Grouping(inner) => self.resolve_expr(inner, engine),
      Expr::Literal(_) => {},

      Expr::Call { callee, arguments, .. } => {
        self.resolve_expr(callee, engine);
        for argument in arguments {
          self.resolve_expr(argument, engine);
        }
      },

      Expr::Get { object, .. } => self.resolve_expr(object, engine),

      Expr::Set { object, value, .. } => {
        self.resolve_expr(value, engine);
        self.resolve_expr(object, engine);
      },

      Expr::This { id, keyword } => {
        if self.current_class == ClassType::None {
          engine.emit(Diagnostic::new(
            DiagnosticCode::ThisOutsideClass,
            keyword.line,
            "Can't use 'this' outside of a class.",
          ));
          return;
        }
        self.resolve_local(*id, "this");
      },

      Expr::Super { id, keyword, .. } => match self.current_class {
        ClassType::None => {
          engine.emit(Diagnostic::new(
            DiagnosticCode::SuperOutsideClass,
            keyword.line,
            "Can't use 'super' outside of a class.",
          ));
        },
        ClassType::Class => {
          engine.emit(Diagnostic::new(
            DiagnosticCode::SuperWithoutSuperclass,
            keyword.line,
            "Can't use 'super' in a class with no superclass.",
          ));
        },
        ClassType::Subclass => {
          self.resolve_local(*id, "super");
        },
      },
    }
  }

  fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionType, engine: &mut DiagnosticEngine) {
    let enclosing_function = self.current_function;
    self.current_function = kind;

    self.begin_scope();
    for param in &decl.params {
      self.declare(param, engine);
      self.define(param);
    }
    self.resolve_statements(&decl.body, engine);
    self.end_scope();

    self.current_function = enclosing_function;
  }

  fn begin_scope(&mut self) {
    self.scopes.push(HashMap::new());
  }

  fn end_scope(&mut self) {
    self.scopes.pop();
  }

  /// Declares a name in the innermost scope as "not yet ready", so a
  /// reference to it in its own initializer can be caught. No-op at global
  /// scope, which is resolved dynamically at runtime instead.
  fn declare(&mut self, name: &Token, engine: &mut DiagnosticEngine) {
    let Some(scope) = self.scopes.last_mut() else { return };

    if scope.contains_key(&name.lexeme) {
      engine.emit(Diagnostic::new(
        DiagnosticCode::DuplicateDeclaration,
        name.line,
        "Already a variable with this name in this scope.",
      ));
    }

    scope.insert(name.lexeme.clone(), false);
  }

  fn define(&mut self, name: &Token) {
    if let Some(scope) = self.scopes.last_mut() {
      scope.insert(name.lexeme.clone(), true);
    }
  }

  /// Counts outward from the innermost scope (depth 0) to the scope that
  /// declares `lexeme`, and records that depth against the expression's id.
  /// Leaves no entry if the name isn't found locally — the interpreter
  /// treats that as a global lookup.
  fn resolve_local(&mut self, id: Uuid, lexeme: &str) {
    for (depth, scope) in self.scopes.iter().rev().enumerate() {
      if scope.contains_key(lexeme) {
        self.locals.insert(id, depth);
        return;
      }
    }
  }
}
