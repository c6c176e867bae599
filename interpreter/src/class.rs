use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
  error::{RuntimeError, Signal},
  function::normal::LoxFunction,
  interpreter::Interpreter,
  lox_value::LoxValue,
};

#[derive(Debug)]
pub struct LoxClass {
  pub name: String,
  pub superclass: Option<Rc<LoxClass>>,
  pub methods: HashMap<String, Rc<LoxFunction>>,
}

impl LoxClass {
  /// Searches this class's own methods first, then walks the superclass
  /// chain, so an override always shadows the class it inherits from.
  pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
    if let Some(method) = self.methods.get(name) {
      return Some(method.clone());
    }
    self.superclass.as_ref()?.find_method(name)
  }

  pub fn arity(&self) -> usize {
    self.find_method("init").map(|init| init.arity()).unwrap_or(0)
  }

  /// Instantiation is handled on the `Rc` handle directly (rather than via
  /// `LoxCallable`) so the new instance shares the caller's class handle
  /// instead of needing its own copy of the method table.
  pub fn instantiate(
    self: Rc<Self>,
    interpreter: &mut Interpreter,
    arguments: Vec<LoxValue>,
    line: usize,
  ) -> Result<LoxValue, Signal> {
    let instance = Rc::new(RefCell::new(LoxInstance { class: self.clone(), fields: HashMap::new() }));

    if let Some(initializer) = self.find_method("init") {
      let bound = initializer.bind(instance.clone());
      bound.call(interpreter, arguments, line)?;
    }

    Ok(LoxValue::Instance(instance))
  }
}

#[derive(Debug)]
pub struct LoxInstance {
  pub class: Rc<LoxClass>,
  pub fields: HashMap<String, LoxValue>,
}

impl LoxInstance {
  pub fn get(instance: &Rc<RefCell<LoxInstance>>, name: &str, line: usize) -> Result<LoxValue, RuntimeError> {
    if let Some(value) = instance.borrow().fields.get(name) {
      return Ok(value.clone());
    }

    if let Some(method) = instance.borrow().class.find_method(name) {
      return Ok(LoxValue::Function(method.bind(instance.clone())));
    }

    Err(RuntimeError::new(format!("Undefined property '{}'.", name), line))
  }

  pub fn set(&mut self, name: &str, value: LoxValue) {
    self.fields.insert(name.to_string(), value);
  }
}
