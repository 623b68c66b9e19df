//! Typeset AST node definitions.
//!
//! The parser lowers Mex surface syntax into the node family a math layout
//! engine consumes. Leaves (`MathOrd`, `TextOrd`, `Atom`, `Op`) carry their
//! rendering mode and an optional source span; structural nodes only carry
//! children. Spans never survive binding substitution, so a substituted
//! subtree can be told apart from directly-parsed input only by its missing
//! locations.

use mexc_util::Span;

/// Rendering mode of a leaf node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Math,
    Text,
}

/// Spacing family of an atom, in the TeX sense.
///
/// Ordinary symbols are not atoms here; they get their own node tags
/// (`MathOrd` / `TextOrd`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Binary operator: `+`, `\cdot`, ...
    Bin,
    /// Relation: `=`, `\leq`, `\to`, ...
    Rel,
    /// Opening delimiter: `(`, `[`, `\{`, ...
    Open,
    /// Closing delimiter: `)`, `]`, `\}`, ...
    Close,
    /// Punctuation: `,`, `;`, ...
    Punct,
    /// Inner atom.
    Inner,
}

/// Typesetting style forced by a `Styling` wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Display,
    Text,
    Script,
    ScriptScript,
}

/// Horizontal alignment of an array column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnAlign {
    Left,
    Center,
    Right,
}

/// Layout description of one array column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSpec {
    pub align: ColumnAlign,
    /// Gap before the column, in em.
    pub pregap: f64,
    /// Gap after the column, in em.
    pub postgap: f64,
}

/// An aligned array of cells, as produced for `cases`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayNode {
    pub cols: Vec<ColumnSpec>,
    /// Rows of cells; every row has `cols.len()` entries.
    pub body: Vec<Vec<Node>>,
    /// Extra gap below each row except the last, in em.
    pub row_gaps: Vec<Option<f64>>,
    /// Horizontal rules above each row and below the last; empty means none.
    pub h_lines_before_row: Vec<Vec<bool>>,
    pub arraystretch: f64,
}

/// A generalised fraction.
#[derive(Clone, Debug, PartialEq)]
pub struct GenFracNode {
    pub numer: Box<Node>,
    pub denom: Box<Node>,
    pub has_bar_line: bool,
}

/// A typeset math node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Ordinary math symbol, rendered italic: letters, Greek commands.
    MathOrd {
        mode: Mode,
        text: String,
        span: Option<Span>,
    },

    /// Ordinary upright symbol: digits, unknown characters, text chars.
    TextOrd {
        mode: Mode,
        text: String,
        span: Option<Span>,
    },

    /// A spacing atom: binary operator, relation, delimiter, punctuation.
    Atom {
        family: Family,
        mode: Mode,
        text: String,
        span: Option<Span>,
    },

    /// A named operator such as `\sin` or `\sum`.
    Op {
        mode: Mode,
        name: String,
        /// Scripts set above/below rather than beside.
        limits: bool,
        /// Rendered as a large symbol rather than roman text.
        symbol: bool,
        span: Option<Span>,
    },

    /// An ordered sequence of children treated as one semantic unit.
    OrdGroup { body: Vec<Node> },

    /// Superscript/subscript attachment; at least one script is present.
    SupSub {
        base: Box<Node>,
        sup: Option<Box<Node>>,
        sub: Option<Box<Node>>,
    },

    /// A paired-delimiter group. `"."` denotes an invisible delimiter.
    LeftRight {
        left: String,
        right: String,
        body: Vec<Node>,
    },

    /// A run of literal text-mode characters.
    Text { mode: Mode, body: Vec<Node> },

    /// A style override around its children.
    Styling { style: Style, body: Vec<Node> },

    /// An aligned array (`cases` rows and cells).
    Array(ArrayNode),

    /// A fraction.
    GenFrac(GenFracNode),

    /// A radical, with an optional index (`root(3, x)`).
    Sqrt {
        body: Box<Node>,
        index: Option<Box<Node>>,
    },

    /// An accented base: `\hat`, `\vec`, ...
    Accent { label: String, base: Box<Node> },

    /// A horizontal rule above its content.
    Overline { body: Box<Node> },

    /// A horizontal rule below its content.
    Underline { body: Box<Node> },
}

impl Node {
    /// The source span of a leaf node, if it still carries one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Node::MathOrd { span, .. }
            | Node::TextOrd { span, .. }
            | Node::Atom { span, .. }
            | Node::Op { span, .. } => *span,
            _ => None,
        }
    }

    /// The literal text of a single-symbol leaf.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::MathOrd { text, .. }
            | Node::TextOrd { text, .. }
            | Node::Atom { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Remove source spans from this node and everything below it.
    ///
    /// Binding values are stored stripped: a substituted subtree must not
    /// point diagnostics at the `let` body it was cloned from.
    pub fn strip_spans(&mut self) {
        match self {
            Node::MathOrd { span, .. }
            | Node::TextOrd { span, .. }
            | Node::Atom { span, .. }
            | Node::Op { span, .. } => *span = None,
            Node::OrdGroup { body }
            | Node::LeftRight { body, .. }
            | Node::Text { body, .. }
            | Node::Styling { body, .. } => strip_spans(body),
            Node::SupSub { base, sup, sub } => {
                base.strip_spans();
                if let Some(sup) = sup {
                    sup.strip_spans();
                }
                if let Some(sub) = sub {
                    sub.strip_spans();
                }
            }
            Node::Array(array) => {
                for row in &mut array.body {
                    strip_spans(row);
                }
            }
            Node::GenFrac(frac) => {
                frac.numer.strip_spans();
                frac.denom.strip_spans();
            }
            Node::Sqrt { body, index } => {
                body.strip_spans();
                if let Some(index) = index {
                    index.strip_spans();
                }
            }
            Node::Accent { base, .. } => base.strip_spans(),
            Node::Overline { body } | Node::Underline { body } => body.strip_spans(),
        }
    }
}

/// Strip spans from a whole node sequence.
pub fn strip_spans(nodes: &mut [Node]) {
    for node in nodes {
        node.strip_spans();
    }
}

/// Collapse a node sequence into a single argument node.
///
/// A one-element sequence is that element; anything else (including the
/// empty sequence) becomes an `OrdGroup`.
pub fn argify(mut nodes: Vec<Node>) -> Node {
    if nodes.len() == 1 {
        nodes.swap_remove(0)
    } else {
        Node::OrdGroup { body: nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str, span: Option<Span>) -> Node {
        Node::MathOrd {
            mode: Mode::Math,
            text: text.to_string(),
            span,
        }
    }

    #[test]
    fn test_argify_single() {
        let node = argify(vec![leaf("x", None)]);
        assert_eq!(node, leaf("x", None));
    }

    #[test]
    fn test_argify_many() {
        let node = argify(vec![leaf("x", None), leaf("y", None)]);
        assert!(matches!(node, Node::OrdGroup { ref body } if body.len() == 2));
    }

    #[test]
    fn test_argify_empty() {
        assert_eq!(argify(Vec::new()), Node::OrdGroup { body: Vec::new() });
    }

    #[test]
    fn test_strip_spans_recurses() {
        let mut node = Node::SupSub {
            base: Box::new(leaf("x", Some(Span::new(0, 1)))),
            sup: Some(Box::new(Node::OrdGroup {
                body: vec![leaf("a", Some(Span::new(2, 3)))],
            })),
            sub: None,
        };
        node.strip_spans();

        let Node::SupSub { base, sup, .. } = node else {
            unreachable!();
        };
        assert_eq!(base.span(), None);
        let Node::OrdGroup { body } = *sup.unwrap() else {
            unreachable!();
        };
        assert_eq!(body[0].span(), None);
    }

    #[test]
    fn test_leaf_accessors() {
        let node = leaf("x", Some(Span::new(3, 4)));
        assert_eq!(node.span(), Some(Span::new(3, 4)));
        assert_eq!(node.text(), Some("x"));
        assert_eq!(Node::OrdGroup { body: Vec::new() }.text(), None);
    }
}
