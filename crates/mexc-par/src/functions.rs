//! Function-handler registry.
//!
//! Every structural lowering ends in a handler call: the parser resolves a
//! command name (`\frac`, `\hat`, `\sum`, ...) through the registry and
//! invokes the handler with the lowered arguments. The parser treats the
//! returned node opaquely, so a host can replace or extend the registry to
//! change what a lowering produces without touching the grammar.

use mexc_lex::Token;
use mexc_util::{ParseError, ParseErrorKind, ParseResult};
use rustc_hash::FxHashMap;

use crate::ast::{GenFracNode, Mode, Node};
use crate::Settings;

/// Context passed to every handler invocation.
pub struct HandlerContext<'a> {
    /// The command name the handler was registered under.
    pub func_name: &'a str,
    /// The call-site token, for error spans.
    pub token: &'a Token,
    /// Host settings, forwarded verbatim.
    pub settings: &'a Settings,
    /// The parser's current mode.
    pub mode: Mode,
}

/// A function handler: receives mandatory and optional arguments, returns
/// the lowered node.
pub type HandlerFn =
    fn(&HandlerContext<'_>, Vec<Node>, Vec<Option<Node>>) -> ParseResult<Node>;

/// Accent commands sharing the generic accent handler.
const ACCENT_COMMANDS: [&str; 10] = [
    "\\hat", "\\bar", "\\tilde", "\\dot", "\\ddot", "\\vec", "\\acute", "\\grave", "\\check",
    "\\breve",
];

/// Named-operator commands sharing the operator handler.
const OPERATOR_COMMANDS: [&str; 12] = [
    "\\sin", "\\cos", "\\tan", "\\ln", "\\log", "\\exp", "\\lim", "\\max", "\\min", "\\sum",
    "\\prod", "\\int",
];

/// The handler table consulted for every lowered call.
pub struct FunctionRegistry {
    handlers: FxHashMap<&'static str, HandlerFn>,
}

impl FunctionRegistry {
    /// An empty registry. Every lowering through it fails with
    /// `UnsupportedFunction`.
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// The built-in handler set: fractions, radicals, accents, rules, and
    /// the named operators.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("\\frac", frac_handler);
        registry.register("\\sqrt", sqrt_handler);
        for command in ACCENT_COMMANDS {
            registry.register(command, accent_handler);
        }
        registry.register("\\overline", overline_handler);
        registry.register("\\underline", underline_handler);
        for command in OPERATOR_COMMANDS {
            registry.register(command, operator_handler);
        }
        registry
    }

    /// Register or replace a handler.
    pub fn register(&mut self, name: &'static str, handler: HandlerFn) {
        self.handlers.insert(name, handler);
    }

    /// Look up a handler by command name.
    pub fn get(&self, name: &str) -> Option<HandlerFn> {
        self.handlers.get(name).copied()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn arity_error(ctx: &HandlerContext<'_>, expected: usize, got: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::ArityMismatch {
            name: ctx.func_name.to_string(),
            expected,
            got,
        },
        ctx.token.span,
    )
}

fn frac_handler(
    ctx: &HandlerContext<'_>,
    args: Vec<Node>,
    _optional: Vec<Option<Node>>,
) -> ParseResult<Node> {
    let got = args.len();
    let Ok([numer, denom]) = <[Node; 2]>::try_from(args) else {
        return Err(arity_error(ctx, 2, got));
    };
    Ok(Node::GenFrac(GenFracNode {
        numer: Box::new(numer),
        denom: Box::new(denom),
        has_bar_line: true,
    }))
}

fn sqrt_handler(
    ctx: &HandlerContext<'_>,
    args: Vec<Node>,
    optional: Vec<Option<Node>>,
) -> ParseResult<Node> {
    let got = args.len();
    let Ok([body]) = <[Node; 1]>::try_from(args) else {
        return Err(arity_error(ctx, 1, got));
    };
    let index = optional.into_iter().next().flatten();
    Ok(Node::Sqrt {
        body: Box::new(body),
        index: index.map(Box::new),
    })
}

/// One handler serves every accent command; the label is the name it was
/// invoked under.
fn accent_handler(
    ctx: &HandlerContext<'_>,
    args: Vec<Node>,
    _optional: Vec<Option<Node>>,
) -> ParseResult<Node> {
    let got = args.len();
    let Ok([base]) = <[Node; 1]>::try_from(args) else {
        return Err(arity_error(ctx, 1, got));
    };
    Ok(Node::Accent {
        label: ctx.func_name.to_string(),
        base: Box::new(base),
    })
}

fn overline_handler(
    ctx: &HandlerContext<'_>,
    args: Vec<Node>,
    _optional: Vec<Option<Node>>,
) -> ParseResult<Node> {
    let got = args.len();
    let Ok([body]) = <[Node; 1]>::try_from(args) else {
        return Err(arity_error(ctx, 1, got));
    };
    Ok(Node::Overline {
        body: Box::new(body),
    })
}

fn underline_handler(
    ctx: &HandlerContext<'_>,
    args: Vec<Node>,
    _optional: Vec<Option<Node>>,
) -> ParseResult<Node> {
    let got = args.len();
    let Ok([body]) = <[Node; 1]>::try_from(args) else {
        return Err(arity_error(ctx, 1, got));
    };
    Ok(Node::Underline {
        body: Box::new(body),
    })
}

/// Named operators take no handler arguments; an argument list at the call
/// site is assembled separately by the parser.
fn operator_handler(
    ctx: &HandlerContext<'_>,
    _args: Vec<Node>,
    _optional: Vec<Option<Node>>,
) -> ParseResult<Node> {
    let name = ctx.func_name;
    Ok(Node::Op {
        mode: ctx.mode,
        name: name.to_string(),
        limits: matches!(name, "\\lim" | "\\max" | "\\min" | "\\sum" | "\\prod"),
        symbol: matches!(name, "\\sum" | "\\prod" | "\\int"),
        span: Some(ctx.token.span),
    })
}
