//! Symbol classification tables.
//!
//! The parser consults a read-only, mode-indexed table to decide what node
//! a single symbol becomes: an `Atom` of some spacing family, or a node
//! whose tag *is* the group (`MathOrd`, `TextOrd`, `Op`). Characters the
//! table does not know fall back to `TextOrd`, so nothing is ever dropped.
//!
//! This module also owns the fixed name tables: Greek letters and infinity
//! for identifier lowering, the named operators, and the map from surface
//! operators to the commands their symbol nodes carry.

use mexc_util::Span;
use rustc_hash::FxHashMap;

use crate::ast::{Family, Mode, Node};

/// What the symbol table knows about a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    /// One of the spacing atom families.
    Atom(Family),
    /// Ordinary italic symbol.
    MathOrd,
    /// Ordinary upright symbol.
    TextOrd,
    /// Operator symbol.
    Op,
}

/// Lowercase Greek commands.
const GREEK_LOWER: [&str; 23] = [
    "\\alpha", "\\beta", "\\gamma", "\\delta", "\\epsilon", "\\zeta", "\\eta", "\\theta",
    "\\iota", "\\kappa", "\\lambda", "\\mu", "\\nu", "\\xi", "\\pi", "\\rho", "\\sigma",
    "\\tau", "\\upsilon", "\\phi", "\\chi", "\\psi", "\\omega",
];

/// Uppercase Greek commands (only those with distinct glyphs).
const GREEK_UPPER: [&str; 11] = [
    "\\Gamma", "\\Delta", "\\Theta", "\\Lambda", "\\Xi", "\\Pi", "\\Sigma", "\\Upsilon",
    "\\Phi", "\\Psi", "\\Omega",
];

/// A read-only symbol table indexed by mode and symbol text.
pub struct SymbolTable {
    math: FxHashMap<String, Group>,
    text: FxHashMap<String, Group>,
}

impl SymbolTable {
    /// Builds the table with the core symbol set.
    pub fn new() -> Self {
        let mut math = FxHashMap::default();
        let mut text = FxHashMap::default();

        // Latin letters are italic ordinaries in math, upright in text.
        for c in ('a'..='z').chain('A'..='Z') {
            math.insert(c.to_string(), Group::MathOrd);
            text.insert(c.to_string(), Group::TextOrd);
        }

        for command in GREEK_LOWER.iter().chain(GREEK_UPPER.iter()) {
            math.insert((*command).to_string(), Group::MathOrd);
        }
        math.insert("\\infty".to_string(), Group::TextOrd);

        for op in ["+", "-", "\\cdot"] {
            math.insert(op.to_string(), Group::Atom(Family::Bin));
        }
        for rel in [
            "=",
            "<",
            ">",
            "\\ne",
            "\\leq",
            "\\geq",
            "\\to",
            "\\leftarrow",
            "\\leftrightarrow",
            "\\Rightarrow",
            "\\Leftrightarrow",
        ] {
            math.insert(rel.to_string(), Group::Atom(Family::Rel));
        }
        for open in ["(", "[", "\\{", "\\lfloor", "\\lceil"] {
            math.insert(open.to_string(), Group::Atom(Family::Open));
        }
        for close in [")", "]", "\\}", "\\rfloor", "\\rceil"] {
            math.insert(close.to_string(), Group::Atom(Family::Close));
        }
        for punct in [",", ";", ":"] {
            math.insert(punct.to_string(), Group::Atom(Family::Punct));
            text.insert(punct.to_string(), Group::Atom(Family::Punct));
        }

        Self { math, text }
    }

    /// Look up a symbol. `None` means the caller should fall back to
    /// `TextOrd`.
    pub fn lookup(&self, mode: Mode, text: &str) -> Option<Group> {
        let table = match mode {
            Mode::Math => &self.math,
            Mode::Text => &self.text,
        };
        table.get(text).copied()
    }

    /// Build the node for a symbol, honouring the table's classification.
    pub fn make_symbol(&self, mode: Mode, text: &str, span: Option<Span>) -> Node {
        match self.lookup(mode, text) {
            Some(Group::Atom(family)) => Node::Atom {
                family,
                mode,
                text: text.to_string(),
                span,
            },
            Some(Group::MathOrd) => Node::MathOrd {
                mode,
                text: text.to_string(),
                span,
            },
            Some(Group::Op) => Node::Op {
                mode,
                name: text.to_string(),
                limits: false,
                symbol: false,
                span,
            },
            // Unknown content is preserved as an upright ordinary.
            Some(Group::TextOrd) | None => Node::TextOrd {
                mode,
                text: text.to_string(),
                span,
            },
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The command a named-symbol identifier stands for.
pub(crate) fn named_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "alpha" => "\\alpha",
        "beta" => "\\beta",
        "gamma" => "\\gamma",
        "delta" => "\\delta",
        "epsilon" => "\\epsilon",
        "zeta" => "\\zeta",
        "eta" => "\\eta",
        "theta" => "\\theta",
        "iota" => "\\iota",
        "kappa" => "\\kappa",
        "lambda" => "\\lambda",
        "mu" => "\\mu",
        "nu" => "\\nu",
        "xi" => "\\xi",
        "pi" => "\\pi",
        "rho" => "\\rho",
        "sigma" => "\\sigma",
        "tau" => "\\tau",
        "upsilon" => "\\upsilon",
        "phi" => "\\phi",
        "chi" => "\\chi",
        "psi" => "\\psi",
        "omega" => "\\omega",
        "Gamma" => "\\Gamma",
        "Delta" => "\\Delta",
        "Theta" => "\\Theta",
        "Lambda" => "\\Lambda",
        "Xi" => "\\Xi",
        "Pi" => "\\Pi",
        "Sigma" => "\\Sigma",
        "Upsilon" => "\\Upsilon",
        "Phi" => "\\Phi",
        "Psi" => "\\Psi",
        "Omega" => "\\Omega",
        "oo" | "infty" => "\\infty",
        _ => return None,
    })
}

/// The command a named-operator identifier invokes.
pub(crate) fn named_operator(name: &str) -> Option<&'static str> {
    Some(match name {
        "sin" => "\\sin",
        "cos" => "\\cos",
        "tan" => "\\tan",
        "ln" => "\\ln",
        "log" => "\\log",
        "exp" => "\\exp",
        "lim" => "\\lim",
        "max" => "\\max",
        "min" => "\\min",
        "sum" => "\\sum",
        "prod" => "\\prod",
        "int" => "\\int",
        _ => return None,
    })
}

/// The symbol text emitted for a binary/relation operator token.
///
/// Operators without a dedicated command pass through unchanged.
pub(crate) fn operator_symbol(op: &str) -> &str {
    match op {
        "*" => "\\cdot",
        "==" => "=",
        "!=" => "\\ne",
        "<=" => "\\leq",
        ">=" => "\\geq",
        "->" => "\\to",
        "<-" => "\\leftarrow",
        "<->" => "\\leftrightarrow",
        "=>" => "\\Rightarrow",
        "<=>" => "\\Leftrightarrow",
        other => other,
    }
}

/// Visible-group delimiter normalisation: braces must be escaped to stay
/// printable as commands.
pub(crate) fn normalize_delimiter(delim: &str) -> &str {
    match delim {
        "{" => "\\{",
        "}" => "\\}",
        other => other,
    }
}
