//! Diagnostic rendering.
//!
//! Mirrors the teacher's `Origin`/`Severity` split (a message knows where it
//! came from and how serious it is) but renders in the format spec'd for
//! this interpreter: an error-kind header, a `File ..., line L, column C`
//! locator, the offending source line, and a caret underline.

use colored::Colorize;

use crate::error::PolyscriptError;

/// Renders `err` against `source` (the full text of the file or REPL line
/// that produced it) and writes the result to `out`.
pub fn render(err: &PolyscriptError, source: &str, use_color: bool) -> String {
    let (start, end) = err.span();
    let header = format!("{}", err);

    let line_text = source.lines().nth(start.line.saturating_sub(1)).unwrap_or("");
    let col = start.column.saturating_sub(1);
    let underline_len = if end.line == start.line && end.index > start.index {
        (end.index - start.index).max(1)
    } else {
        1
    };
    let caret_line = format!(
        "{}{}",
        " ".repeat(col),
        "^".repeat(underline_len),
    );

    let locator = format!("File {}, line {}, column {}", start.file_name, start.line, start.column);

    let mut out = format!("{header}\n{locator}\n    {line_text}\n    {caret_line}");

    if let PolyscriptError::Runtime { traceback, .. } = err {
        if !traceback.0.is_empty() {
            out.push_str("\nTraceback (most recent call last):");
            for frame in &traceback.0 {
                out.push_str(&format!("\n  in {frame}"));
            }
        }
    }

    if use_color {
        out.red().to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn renders_header_and_locator() {
        let pos = Position { file_name: "<stdin>".into(), index: 2, line: 1, column: 3 };
        let err = PolyscriptError::runtime("Division by zero", pos.clone(), pos);
        let rendered = render(&err, "1 / 0", false);
        assert!(rendered.contains("RuntimeError: Division by zero"));
        assert!(rendered.contains("File <stdin>, line 1, column 3"));
        assert!(rendered.contains("1 / 0"));
    }
}
