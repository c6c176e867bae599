/// Renders a runtime error for stderr: `<message>\n[line N]`, with no
/// "Error" prefix — runtime errors are reported differently from the static
/// diagnostics produced by the scanner/parser/resolver.
pub fn render_runtime_error(message: &str, line: usize) -> String {
  format!("{}\n[line {}]", message, line)
}
