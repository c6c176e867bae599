use std::time::{SystemTime, UNIX_EPOCH};

use crate::{error::Signal, function::LoxCallable, interpreter::Interpreter, lox_value::LoxValue};

/// Seconds since the Unix epoch, as a float. The only native function the
/// language ships with.
#[derive(Debug)]
pub struct ClockFunction;

impl LoxCallable for ClockFunction {
  fn arity(&self) -> usize {
    0
  }

  fn name(&self) -> &str {
    "clock"
  }

  fn call(&self, _interpreter: &mut Interpreter, _arguments: Vec<LoxValue>, _line: usize) -> Result<LoxValue, Signal> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs_f64();
    Ok(LoxValue::Number(now))
  }
}
