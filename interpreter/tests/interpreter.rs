use diagnostic::DiagnosticEngine;
use interpreter::{error::RuntimeError, interpreter::Interpreter, lox_value::LoxValue};
use parser::Parser;
use scanner::Scanner;
use semantic_analysis::Resolver;

/// Runs one compilation unit end to end and hands back the interpreter (so
/// globals can be inspected) and whatever runtime error it produced, if any.
/// Panics if scanning, parsing, or resolving raised a diagnostic, since every
/// test here is meant to exercise the interpreter itself, not the pipeline
/// stages already covered by their own crates.
fn run(source: &str) -> (Interpreter, Result<(), RuntimeError>) {
  let mut engine = DiagnosticEngine::new();
  let tokens = Scanner::new(source.to_string()).scan_tokens(&mut engine);
  let statements = Parser::new(tokens, &mut engine).parse();
  assert!(!engine.has_errors(), "unexpected parse errors for: {source}");

  let locals = Resolver::new().resolve(&statements, &mut engine);
  assert!(!engine.has_errors(), "unexpected resolver errors for: {source}");

  let mut interpreter = Interpreter::new();
  let result = interpreter.interpret(&statements, locals);
  (interpreter, result)
}

fn global(interpreter: &Interpreter, name: &str) -> LoxValue {
  interpreter.globals().borrow().get(name, 0).expect("global should be defined")
}

#[test]
fn evaluates_arithmetic_with_standard_precedence() {
  let (interpreter, result) = run("var a = 1 + 2 * 3 - 4 / 2;");
  assert!(result.is_ok());
  assert!(matches!(global(&interpreter, "a"), LoxValue::Number(n) if n == 5.0));
}

#[test]
fn concatenates_strings_with_plus() {
  let (interpreter, result) = run(r#"var a = "foo" + "bar";"#);
  assert!(result.is_ok());
  match global(&interpreter, "a") {
    LoxValue::String(s) => assert_eq!(s, "foobar"),
    other => panic!("expected string, got {:?}", other),
  }
}

#[test]
fn mixed_plus_operands_raise_a_runtime_error() {
  let (_, result) = run(r#"var a = 1 + "two";"#);
  let err = result.unwrap_err();
  assert_eq!(err.message, "Operands must be two numbers or two strings.");
}

#[test]
fn unary_minus_on_a_string_raises_a_runtime_error() {
  let (_, result) = run(r#"var a = -"nope";"#);
  let err = result.unwrap_err();
  assert_eq!(err.message, "Operand must be a number.");
}

#[test]
fn reading_an_undefined_variable_raises_a_runtime_error() {
  let (_, result) = run("print missing;");
  let err = result.unwrap_err();
  assert_eq!(err.message, "Undefined variable 'missing'.");
}

#[test]
fn block_scoping_shadows_the_outer_binding_and_restores_it() {
  let (interpreter, result) = run(
    "
    var a = \"outer\";
    var inner = nil;
    {
      var a = \"inner\";
      inner = a;
    }
    ",
  );
  assert!(result.is_ok());
  match (global(&interpreter, "a"), global(&interpreter, "inner")) {
    (LoxValue::String(outer), LoxValue::String(inner)) => {
      assert_eq!(outer, "outer");
      assert_eq!(inner, "inner");
    },
    other => panic!("unexpected values: {:?}", other),
  }
}

#[test]
fn closures_capture_their_own_mutable_counter() {
  let (interpreter, result) = run(
    "
    fun makeCounter() {
      var count = 0;
      fun counter() {
        count = count + 1;
        return count;
      }
      return counter;
    }
    var c1 = makeCounter();
    var c2 = makeCounter();
    c1();
    c1();
    var a = c1();
    var b = c2();
    ",
  );
  assert!(result.is_ok());
  assert!(matches!(global(&interpreter, "a"), LoxValue::Number(n) if n == 3.0));
  assert!(matches!(global(&interpreter, "b"), LoxValue::Number(n) if n == 1.0));
}

#[test]
fn methods_bind_this_to_the_receiving_instance() {
  let (interpreter, result) = run(
    "
    class Counter {
      init() { this.count = 0; }
      increment() { this.count = this.count + 1; return this.count; }
    }
    var c = Counter();
    c.increment();
    var a = c.increment();
    ",
  );
  assert!(result.is_ok());
  assert!(matches!(global(&interpreter, "a"), LoxValue::Number(n) if n == 2.0));
}

#[test]
fn super_dispatches_to_the_overridden_superclass_method() {
  let (interpreter, result) = run(
    "
    class Greeter {
      greet() { return \"hello\"; }
    }
    class LoudGreeter < Greeter {
      greet() { return super.greet() + \"!\"; }
    }
    var a = LoudGreeter().greet();
    ",
  );
  assert!(result.is_ok());
  match global(&interpreter, "a") {
    LoxValue::String(s) => assert_eq!(s, "hello!"),
    other => panic!("expected string, got {:?}", other),
  }
}

#[test]
fn bare_return_from_a_function_yields_nil() {
  let (interpreter, result) = run(
    "
    fun f() { return; }
    var a = f();
    ",
  );
  assert!(result.is_ok());
  assert!(matches!(global(&interpreter, "a"), LoxValue::Nil));
}

#[test]
fn bare_return_from_an_initializer_yields_the_instance_not_nil() {
  let (interpreter, result) = run(
    "
    class A {
      init() { return; }
    }
    var a = A();
    ",
  );
  assert!(result.is_ok());
  assert!(matches!(global(&interpreter, "a"), LoxValue::Instance(_)));
}

#[test]
fn desugared_for_loop_runs_the_expected_number_of_iterations() {
  let (interpreter, result) = run(
    "
    var sum = 0;
    for (var i = 0; i < 5; i = i + 1) {
      sum = sum + i;
    }
    ",
  );
  assert!(result.is_ok());
  assert!(matches!(global(&interpreter, "sum"), LoxValue::Number(n) if n == 10.0));
}

#[test]
fn calling_a_function_with_the_wrong_arity_raises_a_runtime_error() {
  let (_, result) = run(
    "
    fun f(a, b) { return a + b; }
    f(1);
    ",
  );
  let err = result.unwrap_err();
  assert_eq!(err.message, "Expected 2 arguments but got 1.");
}

#[test]
fn calling_a_non_callable_value_raises_a_runtime_error() {
  let (_, result) = run(
    "
    var a = 1;
    a();
    ",
  );
  let err = result.unwrap_err();
  assert_eq!(err.message, "Can only call functions and classes.");
}

#[test]
fn only_nil_and_false_are_falsy() {
  let (interpreter, result) = run(
    "
    var a = !nil;
    var b = !false;
    var c = !0;
    var d = !\"\";
    ",
  );
  assert!(result.is_ok());
  assert!(matches!(global(&interpreter, "a"), LoxValue::Bool(true)));
  assert!(matches!(global(&interpreter, "b"), LoxValue::Bool(true)));
  assert!(matches!(global(&interpreter, "c"), LoxValue::Bool(false)));
  assert!(matches!(global(&interpreter, "d"), LoxValue::Bool(false)));
}
