//! Token definitions for the Mex notation.
//!
//! Unlike a keyword-heavy language front-end, Mex has no reserved words at
//! the lexical level; `let` is an ordinary identifier the parser recognises
//! by text. A token is therefore a category plus its literal text, not a
//! closed enum of lexemes.

use mexc_util::Span;

/// The category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier: `[A-Za-z][A-Za-z0-9]*`. Underscore is not an identifier
    /// character; it is the subscript operator.
    Ident,

    /// Number literal: digits with at most one `.`.
    Number,

    /// String literal, delimited by `"` or `'`. The token text is the
    /// decoded content with escapes resolved.
    Str,

    /// Operator, single- or multi-character (`+`, `<=`, `<=>`, ...).
    Op,

    /// Punctuation: `, : ; . ( ) [ ] { } |` and any non-ASCII character
    /// the lexer has no other rule for.
    Punct,

    /// End-of-input sentinel. Idempotent: lexing past the end keeps
    /// producing it at the end position.
    Eof,
}

/// A single lexical unit: category, literal text, and source span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// The EOF sentinel at the given end position.
    pub fn eof(offset: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: String::new(),
            span: Span::point(offset),
        }
    }

    /// Is this the EOF sentinel?
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Is this an operator token with exactly this text?
    #[inline]
    pub fn is_op(&self, text: &str) -> bool {
        self.kind == TokenKind::Op && self.text == text
    }

    /// Is this a punctuation token with exactly this text?
    #[inline]
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    /// Is this an identifier with exactly this text?
    #[inline]
    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_predicates() {
        let plus = Token::new(TokenKind::Op, "+", Span::new(0, 1));
        assert!(plus.is_op("+"));
        assert!(!plus.is_op("-"));
        assert!(!plus.is_punct("+"));

        let comma = Token::new(TokenKind::Punct, ",", Span::new(1, 2));
        assert!(comma.is_punct(","));
        assert!(!comma.is_op(","));
    }

    #[test]
    fn test_eof_token() {
        let eof = Token::eof(12);
        assert!(eof.is_eof());
        assert_eq!(eof.span, Span::point(12));
        assert!(eof.text.is_empty());
    }
}
