use diagnostic::DiagnosticEngine;
use parser::Parser;
use scanner::Scanner;
use semantic_analysis::Resolver;

fn resolve(source: &str) -> DiagnosticEngine {
  let mut engine = DiagnosticEngine::new();
  let tokens = Scanner::new(source.to_string()).scan_tokens(&mut engine);
  let statements = Parser::new(tokens, &mut engine).parse();
  Resolver::new().resolve(&statements, &mut engine);
  engine
}

#[test]
fn resolves_nested_scopes_without_error() {
  let engine = resolve(
    "var a = 1; { var a = 2; { var a = 3; print a; } print a; } print a;",
  );
  assert!(!engine.has_errors());
}

#[test]
fn reports_duplicate_declaration_in_same_scope() {
  let engine = resolve("{ var a = 1; var a = 2; }");
  assert!(engine.has_errors());
}

#[test]
fn allows_same_name_redeclared_in_different_scopes() {
  let engine = resolve("var a = 1; { var a = 2; }");
  assert!(!engine.has_errors());
}

#[test]
fn reports_self_reference_in_initializer() {
  let engine = resolve("var a = 1; { var a = a; }");
  assert!(engine.has_errors());
}

#[test]
fn reports_return_outside_function() {
  let engine = resolve("return 1;");
  assert!(engine.has_errors());
}

#[test]
fn allows_return_inside_function() {
  let engine = resolve("fun f() { return 1; }");
  assert!(!engine.has_errors());
}

#[test]
fn reports_return_value_from_initializer() {
  let engine = resolve("class A { init() { return 1; } }");
  assert!(engine.has_errors());
}

#[test]
fn allows_bare_return_from_initializer() {
  let engine = resolve("class A { init() { return; } }");
  assert!(!engine.has_errors());
}

#[test]
fn reports_this_outside_class() {
  let engine = resolve("print this;");
  assert!(engine.has_errors());
}

#[test]
fn allows_this_inside_method() {
  let engine = resolve("class A { greet() { print this; } }");
  assert!(!engine.has_errors());
}

#[test]
fn reports_super_outside_class() {
  let engine = resolve("print super.greet();");
  assert!(engine.has_errors());
}

#[test]
fn reports_super_without_superclass() {
  let engine = resolve("class A { greet() { return super.greet(); } }");
  assert!(engine.has_errors());
}

#[test]
fn allows_super_in_subclass() {
  let engine = resolve(
    "class A { greet() { return 1; } } class B < A { greet() { return super.greet(); } }",
  );
  assert!(!engine.has_errors());
}

#[test]
fn reports_class_inheriting_itself() {
  let engine = resolve("class A < A {}");
  assert!(engine.has_errors());
}

#[test]
fn distinct_variable_references_resolve_independently() {
  // Two separate `x` references in unrelated scopes, sharing a lexeme but
  // never the same declaration: the resolver's per-expression identity must
  // keep them apart.
  let engine = resolve(
    "fun outer() { var x = 1; fun inner() { var x = 2; print x; } print x; }",
  );
  assert!(!engine.has_errors());
}
