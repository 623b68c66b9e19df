//! Parse-error surface for the Mex front-end.
//!
//! Errors are fail-fast: the first one encountered aborts the parse and is
//! returned to the caller. There is no recovery or resynchronisation, so a
//! failure always points at exactly one offending token.

use thiserror::Error;

use crate::span::Span;

/// The closed set of failure kinds the lexer and parser can produce.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    // Lexical errors
    /// A byte the lexer has no rule for.
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),

    /// A string literal with no closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A `/*` comment with no closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedBlockComment,

    // Structural errors
    /// A specific token was required and something else was found.
    #[error("expected `{0}`")]
    ExpectedToken(String),

    /// A statement ended with neither `;` nor end of input.
    #[error("expected `;` or end of input")]
    ExpectedSemicolonOrEnd,

    /// Input ended where more was required.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    // Grammar errors
    /// Two `^` attachments on the same base.
    #[error("double superscript")]
    DoubleSuperscript,

    /// Two `_` attachments on the same base.
    #[error("double subscript")]
    DoubleSubscript,

    /// `^` or `_` with nothing attachable after it.
    #[error("expected superscript or subscript argument")]
    ExpectedScriptArgument,

    /// A binary operator with no right-hand operand.
    #[error("expected expression after operator")]
    ExpectedExpressionAfterOperator,

    // Binding errors
    /// `let` followed by something other than an identifier.
    #[error("expected identifier after `let`")]
    ExpectedIdentifierAfterLet,

    // Call errors
    /// A structural call with the wrong number of arguments.
    #[error("`{name}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A lowering that needs a handler the registry does not provide.
    #[error("unsupported function `{0}`")]
    UnsupportedFunction(String),

    /// An accent kind outside the accepted set.
    #[error("unsupported accent `{0}`")]
    UnsupportedAccent(String),

    /// The accent-kind argument did not reduce to plain text.
    #[error("accent kind must be plain text")]
    AccentKindMustBeText,

    /// `cases()` with no cells at all.
    #[error("`cases` requires at least one cell")]
    EmptyCases,

    /// An empty argument sequence in a call (e.g. a trailing comma).
    #[error("empty function argument")]
    EmptyArgument,
}

/// A fatal front-end failure: what went wrong, and where.
///
/// The span indexes the original input; pair it with that input via
/// [`crate::diagnostic::render`] to produce a caret diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Result alias used throughout the front-end.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::new(ParseErrorKind::UnexpectedCharacter('#'), Span::new(3, 4));
        assert_eq!(err.to_string(), "unexpected character `#`");
    }

    #[test]
    fn test_arity_display() {
        let err = ParseError::new(
            ParseErrorKind::ArityMismatch {
                name: "frac".to_string(),
                expected: 2,
                got: 1,
            },
            Span::new(0, 4),
        );
        assert_eq!(err.to_string(), "`frac` expects 2 argument(s), got 1");
    }

    #[test]
    fn test_error_carries_span() {
        let err = ParseError::new(ParseErrorKind::UnterminatedString, Span::new(7, 8));
        assert_eq!(err.span, Span::new(7, 8));
    }
}
