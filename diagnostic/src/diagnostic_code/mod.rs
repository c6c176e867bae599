/// The closed set of error conditions the interpreter can report, spanning
/// the scanner, parser, resolver, runtime, and CLI layers.
///
/// Every variant here is a *static* error family member except the runtime
/// group, which is mirrored here only so callers can match on a stable code;
/// runtime errors are actually carried by `interpreter::RuntimeError`, which
/// holds a live `Token` rather than a bare line number and is never
/// accumulated across a whole compilation unit the way `Diagnostic` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
  // Scanner
  UnterminatedString,
  InvalidCharacter,

  // Parser
  ExpectedExpression,
  UnexpectedToken,
  MissingClosingParen,
  MissingClosingBrace,
  MissingSemicolon,
  ExpectedIdentifier,
  InvalidAssignmentTarget,
  TooManyParameters,
  TooManyArguments,

  // Resolver
  DuplicateDeclaration,
  SelfReferenceInInitializer,
  ReturnOutsideFunction,
  ReturnFromInitializer,
  ThisOutsideClass,
  SuperOutsideClass,
  SuperWithoutSuperclass,
  ClassInheritsItself,

  // Runtime
  OperandMustBeNumber,
  OperandsMustBeNumbers,
  OperandsMustBeNumbersOrStrings,
  UndefinedVariable,
  CallOnNonCallable,
  WrongNumberOfArguments,
  OnlyInstancesHaveProperties,
  OnlyInstancesHaveFields,
  UndefinedProperty,
  SuperclassMustBeClass,

  // CLI
  InvalidArguments,
  FileNotFound,
}
