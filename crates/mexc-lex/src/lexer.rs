//! Main lexer implementation for the Mex math notation.
//!
//! The lexer is a single-pass scanner with one-character dispatch: skip
//! trivia, record the token start, branch on the first character. Every
//! token records its byte span so diagnostics and AST leaves can point back
//! into the input.
//!
//! Errors are returned, not accumulated: the front-end is fail-fast, and the
//! first lexical error aborts the parse.

use mexc_util::{ParseError, ParseErrorKind, ParseResult, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Multi-character operators, longest first so `<=` never shadows `<=>`.
const MULTI_CHAR_OPS: [&str; 9] = ["<=>", "<->", "=>", "->", "<-", "<=", ">=", "!=", "=="];

/// Single-character operators.
const SINGLE_CHAR_OPS: [char; 10] = ['+', '-', '*', '/', '^', '_', '=', '<', '>', '!'];

/// Punctuation characters.
const PUNCTUATION: [char; 11] = [',', ':', ';', '.', '(', ')', '[', ']', '{', '}', '|'];

/// The main lexer for Mex source text.
///
/// Calling [`Lexer::next_token`] repeatedly produces a finite stream
/// terminating in an EOF token; further calls keep yielding EOF at the end
/// position.
///
/// # Example
///
/// ```
/// use mexc_lex::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("alpha + 2");
/// let token = lexer.next_token().unwrap();
/// assert_eq!(token.kind, TokenKind::Ident);
/// assert_eq!(token.text, "alpha");
/// ```
pub struct Lexer<'a> {
    /// Character cursor for traversing source.
    cursor: Cursor<'a>,

    /// Set once EOF or an error has been yielded through the iterator.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            finished: false,
        }
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and comments, then dispatches on the first
    /// character. At the end of input this returns the EOF token, and keeps
    /// returning it on every further call.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_trivia()?;

        let start = self.cursor.position();
        if self.cursor.is_at_end() {
            return Ok(Token::eof(start));
        }

        let c = self.cursor.current_char();

        // Identifier: [A-Za-z][A-Za-z0-9]*
        if is_ident_start(c) {
            return Ok(self.lex_identifier(start));
        }

        // Number: digit start, or `.` immediately followed by a digit.
        if c.is_ascii_digit() || (c == '.' && self.cursor.char_at(1).is_ascii_digit()) {
            return Ok(self.lex_number(start));
        }

        // String literal, either quote kind.
        if c == '"' || c == '\'' {
            return self.lex_string(start);
        }

        // Multi-character operators, longest match wins.
        for op in MULTI_CHAR_OPS {
            if self.cursor.remaining().starts_with(op) {
                for _ in 0..op.len() {
                    self.cursor.advance();
                }
                return Ok(self.make_token(TokenKind::Op, start));
            }
        }

        if SINGLE_CHAR_OPS.contains(&c) {
            self.cursor.advance();
            return Ok(self.make_token(TokenKind::Op, start));
        }

        // Known punctuation, plus any non-ASCII character. The latter flow
        // through to the parser's symbol-table fallback instead of failing
        // here, so input like `§` still renders as an ordinary symbol.
        if PUNCTUATION.contains(&c) || !c.is_ascii() {
            self.cursor.advance();
            return Ok(self.make_token(TokenKind::Punct, start));
        }

        Err(ParseError::new(
            ParseErrorKind::UnexpectedCharacter(c),
            Span::new(start, start + c.len_utf8()),
        ))
    }

    /// Builds a token from the recorded start position to the cursor.
    fn make_token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(
            kind,
            self.cursor.slice_from(start),
            Span::new(start, self.cursor.position()),
        )
    }

    /// Skips whitespace and comments before a token.
    ///
    /// Whitespace is ASCII only (space, tab, CR, LF). Line comments run
    /// `//` to end of line; block comments `/* */` do not nest.
    fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            let c = self.cursor.current_char();

            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                self.cursor.advance();
                continue;
            }

            if c == '/' && self.cursor.char_at(1) == '/' {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
                continue;
            }

            if c == '/' && self.cursor.char_at(1) == '*' {
                let open = self.cursor.position();
                self.cursor.advance();
                self.cursor.advance();
                loop {
                    if self.cursor.is_at_end() {
                        return Err(ParseError::new(
                            ParseErrorKind::UnterminatedBlockComment,
                            Span::new(open, open + 2),
                        ));
                    }
                    if self.cursor.current_char() == '*' && self.cursor.char_at(1) == '/' {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    self.cursor.advance();
                }
                continue;
            }

            return Ok(());
        }
    }

    /// Lexes an identifier.
    fn lex_identifier(&mut self, start: usize) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        self.make_token(TokenKind::Ident, start)
    }

    /// Lexes a number literal: digits with at most one decimal point.
    fn lex_number(&mut self, start: usize) -> Token {
        let mut seen_dot = false;
        loop {
            let c = self.cursor.current_char();
            if c.is_ascii_digit() {
                self.cursor.advance();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.cursor.advance();
            } else {
                break;
            }
        }
        self.make_token(TokenKind::Number, start)
    }

    /// Lexes a string literal delimited by `"` or `'`.
    ///
    /// The token text is the decoded content: `\n`, `\r`, `\t`, `\\`, `\"`
    /// and `\'` produce the usual characters, any other `\X` produces the
    /// literal `X`. An unterminated literal fails at the opening quote.
    fn lex_string(&mut self, start: usize) -> ParseResult<Token> {
        let quote = self.cursor.current_char();
        self.cursor.advance();

        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(ParseError::new(
                    ParseErrorKind::UnterminatedString,
                    Span::new(start, start + 1),
                ));
            }

            let c = self.cursor.current_char();
            if c == quote {
                self.cursor.advance();
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    return Err(ParseError::new(
                        ParseErrorKind::UnterminatedString,
                        Span::new(start, start + 1),
                    ));
                }
                let escaped = self.cursor.current_char();
                self.cursor.advance();
                content.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Ok(Token::new(
            TokenKind::Str,
            content,
            Span::new(start, self.cursor.position()),
        ))
    }
}

/// Iterate over the token stream, ending before the EOF sentinel.
///
/// A lexical error is yielded once and terminates the iterator.
impl<'a> Iterator for Lexer<'a> {
    type Item = ParseResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.is_eof() => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

// Underscore is deliberately absent from both sets: `_` is the subscript
// operator, so `x_1` must lex as three tokens.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
