use diagnostic::DiagnosticEngine;
use parser::{expr::Expr, stmt::Stmt, Parser};
use scanner::Scanner;

fn parse(source: &str) -> (Vec<Stmt>, DiagnosticEngine) {
  let mut engine = DiagnosticEngine::new();
  let tokens = Scanner::new(source.to_string()).scan_tokens(&mut engine);
  let statements = Parser::new(tokens, &mut engine).parse();
  (statements, engine)
}

#[test]
fn parses_variable_declaration_with_initializer() {
  let (statements, engine) = parse("var a = 1 + 2;");
  assert!(!engine.has_errors());
  assert_eq!(statements.len(), 1);
  match &statements[0] {
    Stmt::VarDecl { name, initializer } => {
      assert_eq!(name.lexeme, "a");
      assert!(matches!(initializer, Some(Expr::Binary { .. })));
    },
    other => panic!("expected VarDecl, got {:?}", other),
  }
}

#[test]
fn parses_if_else_and_logical_operators() {
  let (statements, engine) = parse("if (a and b or c) { print 1; } else { print 2; }");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::If { condition, else_branch, .. } => {
      assert!(matches!(condition, Expr::Logical { .. }));
      assert!(else_branch.is_some());
    },
    other => panic!("expected If, got {:?}", other),
  }
}

#[test]
fn desugars_for_loop_into_while() {
  let (statements, engine) = parse("for (var i = 0; i < 3; i = i + 1) print i;");
  assert!(!engine.has_errors());
  assert!(matches!(statements[0], Stmt::Block(_)));
}

#[test]
fn parses_class_with_superclass_and_methods() {
  let (statements, engine) = parse("class Cake < Pastry { bake() { print \"baking\"; } }");
  assert!(!engine.has_errors());
  match &statements[0] {
    Stmt::Class { name, superclass, methods } => {
      assert_eq!(name.lexeme, "Cake");
      assert!(superclass.is_some());
      assert_eq!(methods.len(), 1);
      assert_eq!(methods[0].name.lexeme, "bake");
    },
    other => panic!("expected Class, got {:?}", other),
  }
}

#[test]
fn reports_missing_semicolon() {
  let (_, engine) = parse("var a = 1");
  assert!(engine.has_errors());
}

#[test]
fn reports_invalid_assignment_target_but_recovers() {
  let (statements, engine) = parse("1 + 2 = 3;");
  assert!(engine.has_errors());
  // Recovery keeps the left-hand side rather than aborting the whole parse.
  assert_eq!(statements.len(), 1);
}

#[test]
fn parses_this_and_super_in_method_body() {
  let (statements, engine) = parse(
    "class A { greet() { return this; } }\nclass B < A { greet() { return super.greet(); } }",
  );
  assert!(!engine.has_errors());
  assert_eq!(statements.len(), 2);
}
