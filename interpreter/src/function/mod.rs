use crate::{error::Signal, interpreter::Interpreter, lox_value::LoxValue};

pub mod native;
pub mod normal;

/// Anything that can appear on the left of a call expression: user-defined
/// functions and methods, native functions, and classes (instantiation).
pub trait LoxCallable: std::fmt::Debug {
  fn arity(&self) -> usize;
  fn name(&self) -> &str;
  fn call(&self, interpreter: &mut Interpreter, arguments: Vec<LoxValue>, line: usize) -> Result<LoxValue, Signal>;
}
