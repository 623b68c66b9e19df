//! mexc-lex - Lexical analyzer for the Mex math notation.
//!
//! Transforms source text into a stream of categorised tokens. The grammar
//! is small and fully ASCII at the operator level:
//!
//! - **Identifiers**: `[A-Za-z][A-Za-z0-9]*`. There are no reserved words;
//!   `let` is recognised by the parser, not here.
//! - **Numbers**: digits with at most one decimal point (`2`, `3.14`, `.5`).
//! - **Strings**: `"..."` or `'...'` with C-style escapes.
//! - **Operators**: `+ - * / ^ _ = < > !` and the multi-character set
//!   `<=> <-> => -> <- <= >= != ==` (longest match wins).
//! - **Punctuation**: `, : ; . ( ) [ ] { } |`.
//!
//! Whitespace and `//` / `/* */` comments are skipped between tokens. Every
//! token carries its byte span; the stream terminates in an idempotent EOF
//! token.
//!
//! # Example
//!
//! ```
//! use mexc_lex::{Lexer, TokenKind};
//!
//! let tokens: Result<Vec<_>, _> = Lexer::new("x_1 + 2").collect();
//! let kinds: Vec<TokenKind> = tokens.unwrap().iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Ident,
//!         TokenKind::Op,
//!         TokenKind::Number,
//!         TokenKind::Op,
//!         TokenKind::Number,
//!     ]
//! );
//! ```

pub mod cursor;
mod edge_cases;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
