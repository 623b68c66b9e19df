//! mexc-par - Parser for the Mex math notation.
//!
//! Turns Mex source into the typeset AST a math layout engine consumes.
//! The grammar is a precedence-climbing recursive descent with single-token
//! lookahead over [`mexc_lex`]'s token stream:
//!
//! - expression levels: comparison, additive, multiplicative (with implicit
//!   juxtaposition and `/`-as-fraction), unary, postfix scripts, primary;
//! - `let name = expr;` bindings, substituted by value with spans stripped;
//! - structural calls (`frac`, `sqrt`, `root`, `accent`, `cases`, delimiter
//!   wrappers, named operators) each lowering to a specific node shape via
//!   the [`functions::FunctionRegistry`].
//!
//! The whole input is parsed per call; the first error aborts and is
//! returned with its source span. No state survives a parse.
//!
//! # Example
//!
//! ```
//! use mexc_par::{parse, ast::Node, Settings};
//!
//! let settings = Settings::default();
//! let nodes = parse("a / b", &settings).unwrap();
//! assert!(matches!(nodes[0], Node::GenFrac(_)));
//! ```

pub mod ast;
mod call;
mod edge_cases;
mod environment;
mod expr;
pub mod functions;
pub mod parser;
pub mod symbols;

pub use ast::{Mode, Node};
pub use functions::{FunctionRegistry, HandlerContext, HandlerFn};
pub use mexc_util::{ParseError, ParseErrorKind, ParseResult, Span};
pub use parser::Parser;
pub use symbols::{Group, SymbolTable};

/// Host-facing parse settings.
///
/// The parser core never inspects these beyond forwarding them into every
/// handler invocation; they exist so handlers and downstream builders can
/// agree on rendering options.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// Typeset in display style rather than inline style.
    pub display_mode: bool,
}

/// Parse a Mex source string into its typeset AST.
///
/// The result is the node sequence of the last expression statement;
/// earlier statements matter only through their `let` bindings. An empty
/// input parses to an empty sequence.
pub fn parse(input: &str, settings: &Settings) -> ParseResult<Vec<Node>> {
    Parser::new(input, settings).parse()
}
