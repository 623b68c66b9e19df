//! Parser core: token plumbing and the statement level.
//!
//! The parser is a precedence-climbing recursive descent over a lazily
//! materialised single-token lookahead. This module owns the `Parser`
//! struct, the lookahead primitives (`fetch`/`consume`/`expect_*`), and the
//! top-level statement grammar; the expression levels live in `expr`, call
//! lowering in `call`.
//!
//! A source is a semicolon-separated statement list. `let` statements feed
//! the binding environment; the parse result is the node sequence of the
//! *last* expression statement. All state is discarded when `parse`
//! returns — a `Parser` is single-use.

use mexc_lex::{Lexer, Token, TokenKind};
use mexc_util::{ParseError, ParseErrorKind, ParseResult, Span};

use crate::ast::Node;
use crate::environment::Environment;
use crate::functions::{FunctionRegistry, HandlerContext};
use crate::symbols::SymbolTable;
use crate::{Mode, Settings};

/// Tokens that terminate the current expression level without being
/// consumed. EOF always stops.
#[derive(Clone, Copy)]
pub(crate) struct StopSet {
    tokens: &'static [&'static str],
    /// Stop on every operator token, regardless of text.
    any_operator: bool,
}

impl StopSet {
    /// Statement bodies stop at `;`.
    pub(crate) const STATEMENT: StopSet = StopSet::new(&[";"]);

    /// Call arguments stop at `,` and `)`.
    pub(crate) const ARGUMENT: StopSet = StopSet::new(&[",", ")"]);

    /// `cases` cells additionally stop at the row separator `;`.
    pub(crate) const CASES_CELL: StopSet = StopSet::new(&[",", ";", ")"]);

    pub(crate) const PAREN: StopSet = StopSet::new(&[")"]);
    pub(crate) const BRACKET: StopSet = StopSet::new(&["]"]);
    pub(crate) const BRACE: StopSet = StopSet::new(&["}"]);

    /// Unbraced script arguments bind a single unary expression: every
    /// operator, every closing delimiter, and EOF ends them.
    pub(crate) const SCRIPT: StopSet = StopSet {
        tokens: &[")", "]", "}"],
        any_operator: true,
    };

    const fn new(tokens: &'static [&'static str]) -> Self {
        Self {
            tokens,
            any_operator: false,
        }
    }

    pub(crate) fn stops(&self, token: &Token) -> bool {
        token.is_eof()
            || (self.any_operator && token.kind == TokenKind::Op)
            || self.tokens.contains(&token.text.as_str())
    }
}

/// The Mex parser.
///
/// # Example
///
/// ```
/// use mexc_par::{Parser, Settings};
///
/// let settings = Settings::default();
/// let nodes = Parser::new("x^2 + 1", &settings).parse().unwrap();
/// assert_eq!(nodes.len(), 3);
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,

    /// One token of lookahead, filled on demand.
    lookahead: Option<Token>,

    /// `let` bindings made so far.
    pub(crate) env: Environment,

    /// Handler table for structural lowerings.
    functions: FunctionRegistry,

    /// Symbol classification table.
    pub(crate) symbols: SymbolTable,

    settings: &'a Settings,

    /// Current rendering mode; the default mode of new nodes.
    pub(crate) mode: Mode,
}

impl<'a> Parser<'a> {
    /// Create a parser over `input` with the built-in handler registry.
    pub fn new(input: &'a str, settings: &'a Settings) -> Self {
        Self::with_functions(input, settings, FunctionRegistry::builtin())
    }

    /// Create a parser with a custom handler registry.
    pub fn with_functions(
        input: &'a str,
        settings: &'a Settings,
        functions: FunctionRegistry,
    ) -> Self {
        Self {
            lexer: Lexer::new(input),
            lookahead: None,
            env: Environment::new(),
            functions,
            symbols: SymbolTable::new(),
            settings,
            mode: Mode::Math,
        }
    }

    /// Parse the entire input.
    ///
    /// Consumes the parser; all binding and lookahead state dies here.
    pub fn parse(mut self) -> ParseResult<Vec<Node>> {
        let mut result = Vec::new();

        loop {
            let token = self.fetch()?.clone();
            if token.is_eof() {
                break;
            }
            if token.is_punct(";") {
                self.consume()?;
                continue;
            }

            if token.is_ident("let") {
                self.parse_let_binding()?;
            } else {
                // Earlier expression statements are discarded; only the
                // last one is the result.
                result = self.parse_expression(StopSet::STATEMENT)?;
            }

            let boundary = self.fetch()?.clone();
            if boundary.is_punct(";") {
                self.consume()?;
            } else if !boundary.is_eof() {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedSemicolonOrEnd,
                    boundary.span,
                ));
            }
        }

        self.expect_eof()?;
        Ok(result)
    }

    /// `let` IDENT `=` expression.
    fn parse_let_binding(&mut self) -> ParseResult<()> {
        self.consume()?; // the `let` identifier

        let name = self.fetch()?.clone();
        if name.kind != TokenKind::Ident {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifierAfterLet,
                name.span,
            ));
        }
        self.consume()?;

        self.expect_op("=")?;
        let value = self.parse_expression(StopSet::STATEMENT)?;
        self.env.define(name.text, value);
        Ok(())
    }

    // =========================================================================
    // TOKEN PLUMBING
    // =========================================================================

    /// Peek the lookahead token, lexing it if necessary.
    pub(crate) fn fetch(&mut self) -> ParseResult<&Token> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token()?);
        }
        match &self.lookahead {
            Some(token) => Ok(token),
            None => unreachable!("lookahead was just filled"),
        }
    }

    /// Take the lookahead token, advancing the stream.
    pub(crate) fn consume(&mut self) -> ParseResult<Token> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    /// Consume a punctuation token with the given text, or fail.
    pub(crate) fn expect_punct(&mut self, text: &str) -> ParseResult<Token> {
        let token = self.fetch()?.clone();
        if token.is_punct(text) {
            return self.consume();
        }
        Err(Self::expected(text, &token))
    }

    /// Consume an operator token with the given text, or fail.
    pub(crate) fn expect_op(&mut self, text: &str) -> ParseResult<Token> {
        let token = self.fetch()?.clone();
        if token.is_op(text) {
            return self.consume();
        }
        Err(Self::expected(text, &token))
    }

    /// The terminal expect: the only place EOF is ever consumed.
    fn expect_eof(&mut self) -> ParseResult<()> {
        let token = self.fetch()?.clone();
        if token.is_eof() {
            self.consume()?;
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::ExpectedSemicolonOrEnd,
                token.span,
            ))
        }
    }

    fn expected(what: &str, found: &Token) -> ParseError {
        if found.is_eof() {
            ParseError::new(ParseErrorKind::UnexpectedEnd, found.span)
        } else {
            ParseError::new(ParseErrorKind::ExpectedToken(what.to_string()), found.span)
        }
    }

    // =========================================================================
    // NODE CONSTRUCTION
    // =========================================================================

    /// Build a symbol node for `text` via the symbol table.
    pub(crate) fn symbol_node(&self, text: &str, span: Span) -> Node {
        self.symbols.make_symbol(self.mode, text, Some(span))
    }

    /// Invoke a registered handler, or fail with `UnsupportedFunction`.
    pub(crate) fn call_handler(
        &self,
        name: &str,
        token: &Token,
        args: Vec<Node>,
        optional: Vec<Option<Node>>,
    ) -> ParseResult<Node> {
        let Some(handler) = self.functions.get(name) else {
            return Err(ParseError::new(
                ParseErrorKind::UnsupportedFunction(name.to_string()),
                token.span,
            ));
        };
        let context = HandlerContext {
            func_name: name,
            token,
            settings: self.settings,
            mode: self.mode,
        };
        handler(&context, args, optional)
    }
}
