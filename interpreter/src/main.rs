use interpreter::runner::Runner;

/// `lox [script]`: zero args starts the REPL, one arg runs that file once.
/// More than one arg is a usage error (exit 64); the file/REPL path itself
/// exits 65 on a static error or 70 on a runtime error.
fn main() {
  let args: Vec<String> = std::env::args().collect();

  let code = match args.as_slice() {
    [_] => Runner::new().run_interactive_mode(),
    [_, script] => Runner::new().run_file(script),
    _ => {
      eprintln!("Usage: lox [script]");
      64
    },
  };

  std::process::exit(code);
}
