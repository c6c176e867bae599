use std::{cell::RefCell, rc::Rc};

use parser::stmt::FunctionDecl;

use crate::{
  class::LoxInstance,
  env::Env,
  error::Signal,
  function::LoxCallable,
  interpreter::Interpreter,
  lox_value::LoxValue,
};

/// A user-defined function or method. Bodies are shared via `Rc` with the
/// declaration parsed once; each closure and `this`-binding gets its own
/// environment without re-cloning the body.
#[derive(Debug, Clone)]
pub struct LoxFunction {
  pub declaration: Rc<FunctionDecl>,
  pub closure: Rc<RefCell<Env>>,
  pub is_initializer: bool,
}

impl LoxFunction {
  pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Env>>, is_initializer: bool) -> Self {
    Self { declaration, closure, is_initializer }
  }

  /// Returns a copy of this function closing over an environment where
  /// `this` is bound to `instance`, used when a method is looked up off an
  /// instance.
  pub fn bind(&self, instance: Rc<RefCell<LoxInstance>>) -> Rc<LoxFunction> {
    let env = Env::with_enclosing(self.closure.clone());
    env.borrow_mut().define("this".to_string(), LoxValue::Instance(instance));

    Rc::new(LoxFunction {
      declaration: self.declaration.clone(),
      closure: env,
      is_initializer: self.is_initializer,
    })
  }
}

impl LoxCallable for LoxFunction {
  fn arity(&self) -> usize {
    self.declaration.params.len()
  }

  fn name(&self) -> &str {
    &self.declaration.name.lexeme
  }

  fn call(&self, interpreter: &mut Interpreter, arguments: Vec<LoxValue>, _line: usize) -> Result<LoxValue, Signal> {
    let env = Env::with_enclosing(self.closure.clone());
    for (param, arg) in self.declaration.params.iter().zip(arguments) {
      env.borrow_mut().define(param.lexeme.clone(), arg);
    }

    let result = interpreter.execute_block(&self.declaration.body, env);

    match result {
      Ok(()) if self.is_initializer => Ok(self.closure.borrow().get_at(0, "this").unwrap_or(LoxValue::Nil)),
      Ok(()) => Ok(LoxValue::Nil),
      Err(Signal::Return(_)) if self.is_initializer => {
        Ok(self.closure.borrow().get_at(0, "this").unwrap_or(LoxValue::Nil))
      },
      Err(Signal::Return(value)) => Ok(value),
      Err(error) => Err(error),
    }
  }
}
