use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{error::RuntimeError, lox_value::LoxValue};

#[derive(Debug)]
pub struct Env {
  values: HashMap<String, LoxValue>,
  enclosing: Option<Rc<RefCell<Env>>>,
}

impl Env {
  pub fn new() -> Rc<RefCell<Env>> {
    Rc::new(RefCell::new(Self { values: HashMap::new(), enclosing: None }))
  }

  pub fn with_enclosing(enclosing: Rc<RefCell<Env>>) -> Rc<RefCell<Env>> {
    Rc::new(RefCell::new(Self { values: HashMap::new(), enclosing: Some(enclosing) }))
  }

  pub fn define(&mut self, name: String, value: LoxValue) {
    self.values.insert(name, value);
  }

  pub fn get(&self, name: &str, line: usize) -> Result<LoxValue, RuntimeError> {
    if let Some(value) = self.values.get(name) {
      return Ok(value.clone());
    }
    if let Some(enclosing) = &self.enclosing {
      return enclosing.borrow().get(name, line);
    }
    Err(RuntimeError::new(format!("Undefined variable '{}'.", name), line))
  }

  pub fn get_at(&self, distance: usize, name: &str) -> Option<LoxValue> {
    if distance == 0 {
      return self.values.get(name).cloned();
    }
    self.ancestor(distance)?.borrow().values.get(name).cloned()
  }

  pub fn assign(&mut self, name: &str, value: LoxValue, line: usize) -> Result<(), RuntimeError> {
    if self.values.contains_key(name) {
      self.values.insert(name.to_string(), value);
      return Ok(());
    }
    if let Some(enclosing) = &self.enclosing {
      return enclosing.borrow_mut().assign(name, value, line);
    }
    Err(RuntimeError::new(format!("Undefined variable '{}'.", name), line))
  }

  pub fn assign_at(&mut self, distance: usize, name: &str, value: LoxValue) {
    if distance == 0 {
      self.values.insert(name.to_string(), value);
      return;
    }
    if let Some(env) = self.ancestor(distance) {
      env.borrow_mut().values.insert(name.to_string(), value);
    }
  }

  /// Walks `distance` links up the enclosing chain. Distance 1 is the
  /// immediate parent, matching the depths the resolver computes.
  fn ancestor(&self, distance: usize) -> Option<Rc<RefCell<Env>>> {
    let mut env = self.enclosing.clone()?;
    for _ in 1..distance {
      let next = env.borrow().enclosing.clone()?;
      env = next;
    }
    Some(env)
  }
}
