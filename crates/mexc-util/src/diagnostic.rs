//! Caret-diagnostic rendering.
//!
//! The parser reports a [`ParseError`] carrying only byte offsets; this
//! module turns that plus the original source into the classic
//! line/column/caret display a host front-end prints:
//!
//! ```text
//! error: unexpected character `#`
//!   |
//! 1 | a + # b
//!   |     ^
//! ```

use crate::error::ParseError;
use crate::span::Span;

/// Render a parse error against its source as a caret diagnostic.
pub fn render(error: &ParseError, source: &str) -> String {
    let (line_number, column) = line_column(source, error.span.start);
    let line = source.lines().nth(line_number - 1).unwrap_or("");

    // Width of the caret underline, clamped to the rest of the line.
    let width = error
        .span
        .len()
        .max(1)
        .min(line.chars().count().saturating_sub(column - 1).max(1));

    let gutter = line_number.to_string().len();
    let mut out = String::new();
    out.push_str(&format!("error: {}\n", error));
    out.push_str(&format!("{:>gutter$} |\n", ""));
    out.push_str(&format!("{line_number} | {line}\n"));
    out.push_str(&format!(
        "{:>gutter$} | {:>pad$}{}",
        "",
        "",
        "^".repeat(width),
        pad = column - 1,
    ));
    out
}

/// Compute the 1-based line and column of a byte offset.
///
/// Columns count characters, not bytes, so the caret lines up under
/// multi-byte input.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

/// Convenience for hosts that only want the offending slice.
pub fn offending_slice<'a>(error: &ParseError, source: &'a str) -> &'a str {
    Span::new(error.span.start, error.span.end.min(source.len())).slice(source)
}
