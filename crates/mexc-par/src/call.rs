//! Call lowering: `name(arg, ...)`.
//!
//! Each known call name lowers to a specific AST shape; unknown names fall
//! back to rendering the name and its argument list literally. `cases` has
//! its own argument grammar (semicolon-separated rows) and is handled
//! before ordinary argument parsing.

use mexc_lex::Token;
use mexc_util::{ParseError, ParseErrorKind, ParseResult};

use crate::ast::{
    argify, ArrayNode, ColumnAlign, ColumnSpec, Node, Style,
};
use crate::parser::{Parser, StopSet};
use crate::symbols::named_operator;

/// The command behind an accent short-form call (`hat(x)`).
fn accent_call_command(name: &str) -> Option<&'static str> {
    Some(match name {
        "hat" => "\\hat",
        "bar" => "\\bar",
        "tilde" => "\\tilde",
        "dot" => "\\dot",
        "ddot" => "\\ddot",
        "vec" => "\\vec",
        "overline" => "\\overline",
        "underline" => "\\underline",
        _ => return None,
    })
}

/// The command behind an `accent(base, kind)` kind string, matched
/// case-insensitively after trimming. `arrow` aliases `vec`.
fn accent_kind_command(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "hat" => "\\hat",
        "bar" => "\\bar",
        "tilde" => "\\tilde",
        "dot" => "\\dot",
        "ddot" => "\\ddot",
        "vec" | "arrow" => "\\vec",
        "acute" => "\\acute",
        "grave" => "\\grave",
        "check" => "\\check",
        "breve" => "\\breve",
        "overline" => "\\overline",
        "underline" => "\\underline",
        _ => return None,
    })
}

/// The delimiter pair a wrapper call produces.
fn delimiter_call(name: &str) -> Option<(&'static str, &'static str)> {
    Some(match name {
        "abs" => ("|", "|"),
        "norm" => ("\\|", "\\|"),
        "floor" => ("\\lfloor", "\\rfloor"),
        "ceil" => ("\\lceil", "\\rceil"),
        _ => return None,
    })
}

/// Does a node sequence reduce to plain text? Used for the accent kind.
fn plain_text(nodes: &[Node]) -> Option<String> {
    let mut out = String::new();
    if collect_plain_text(nodes, &mut out) {
        Some(out)
    } else {
        None
    }
}

fn collect_plain_text(nodes: &[Node], out: &mut String) -> bool {
    for node in nodes {
        match node {
            Node::MathOrd { text, .. }
            | Node::TextOrd { text, .. }
            | Node::Atom { text, .. } => out.push_str(text),
            Node::OrdGroup { body } => {
                if !collect_plain_text(body, out) {
                    return false;
                }
            }
            Node::Text { body, .. } => {
                for child in body {
                    let Node::TextOrd { text, .. } = child else {
                        return false;
                    };
                    out.push_str(text);
                }
            }
            _ => return false,
        }
    }
    true
}

impl<'a> Parser<'a> {
    /// Parse and lower a call; `name` is the already-consumed identifier
    /// and the lookahead is the opening `(`.
    pub(crate) fn parse_call(&mut self, name: Token) -> ParseResult<Vec<Node>> {
        if name.text == "cases" {
            return self.parse_cases(name);
        }

        self.consume()?; // `(`

        let mut args: Vec<Vec<Node>> = Vec::new();
        if !self.fetch()?.is_punct(")") {
            loop {
                let arg = self.parse_expression(StopSet::ARGUMENT)?;
                if arg.is_empty() {
                    let span = self.fetch()?.span;
                    return Err(ParseError::new(ParseErrorKind::EmptyArgument, span));
                }
                args.push(arg);
                if self.fetch()?.is_punct(",") {
                    self.consume()?;
                    continue;
                }
                break;
            }
        }
        self.expect_punct(")")?;

        self.lower_call(name, args)
    }

    fn lower_call(&mut self, name: Token, args: Vec<Vec<Node>>) -> ParseResult<Vec<Node>> {
        match name.text.as_str() {
            "frac" => {
                let [numer, denom] = self.fixed_args(&name, args)?;
                let node = self.call_handler(
                    "\\frac",
                    &name,
                    vec![argify(numer), argify(denom)],
                    Vec::new(),
                )?;
                Ok(vec![node])
            }

            "sqrt" => {
                let [radicand] = self.fixed_args(&name, args)?;
                let node =
                    self.call_handler("\\sqrt", &name, vec![argify(radicand)], vec![None])?;
                Ok(vec![node])
            }

            "root" => {
                let [index, radicand] = self.fixed_args(&name, args)?;
                let node = self.call_handler(
                    "\\sqrt",
                    &name,
                    vec![argify(radicand)],
                    vec![Some(argify(index))],
                )?;
                Ok(vec![node])
            }

            "accent" => {
                let [base, kind] = self.fixed_args(&name, args)?;
                let Some(kind_text) = plain_text(&kind) else {
                    return Err(ParseError::new(
                        ParseErrorKind::AccentKindMustBeText,
                        name.span,
                    ));
                };
                let normalized = kind_text.trim().to_ascii_lowercase();
                let Some(command) = accent_kind_command(&normalized) else {
                    return Err(ParseError::new(
                        ParseErrorKind::UnsupportedAccent(normalized),
                        name.span,
                    ));
                };
                let node = self.call_handler(command, &name, vec![argify(base)], Vec::new())?;
                Ok(vec![node])
            }

            name_text => {
                if let Some(command) = accent_call_command(name_text) {
                    let [base] = self.fixed_args(&name, args)?;
                    let node =
                        self.call_handler(command, &name, vec![argify(base)], Vec::new())?;
                    return Ok(vec![node]);
                }

                if let Some((left, right)) = delimiter_call(name_text) {
                    let [body] = self.fixed_args(&name, args)?;
                    return Ok(vec![Node::LeftRight {
                        left: left.to_string(),
                        right: right.to_string(),
                        body,
                    }]);
                }

                if let Some(command) = named_operator(name_text) {
                    let op = self.call_handler(command, &name, Vec::new(), Vec::new())?;
                    let group = self.parenthesized_args(args);
                    return Ok(vec![op, group]);
                }

                // Unknown call: render the name and its argument list
                // literally.
                let mut body = self.spell_out(&name);
                body.push(self.parenthesized_args(args));
                Ok(vec![Node::OrdGroup { body }])
            }
        }
    }

    /// Exactly `N` argument sequences, or `ArityMismatch` at the call site.
    fn fixed_args<const N: usize>(
        &self,
        name: &Token,
        args: Vec<Vec<Node>>,
    ) -> ParseResult<[Vec<Node>; N]> {
        let got = args.len();
        <[Vec<Node>; N]>::try_from(args).map_err(|_| {
            ParseError::new(
                ParseErrorKind::ArityMismatch {
                    name: name.text.clone(),
                    expected: N,
                    got,
                },
                name.span,
            )
        })
    }

    /// Reassemble an argument list as visible content:
    /// `( a1, a2, ... )` in one group. The punctuation is synthesised, so
    /// it carries no spans.
    fn parenthesized_args(&self, args: Vec<Vec<Node>>) -> Node {
        let mut body = Vec::with_capacity(args.len() * 2 + 1);
        body.push(self.symbols.make_symbol(self.mode, "(", None));
        for (i, arg) in args.into_iter().enumerate() {
            if i > 0 {
                body.push(self.symbols.make_symbol(self.mode, ",", None));
            }
            body.push(argify(arg));
        }
        body.push(self.symbols.make_symbol(self.mode, ")", None));
        Node::OrdGroup { body }
    }

    // =========================================================================
    // CASES
    // =========================================================================

    /// `cases(c11, c12, ...; c21, ...)`: commas separate cells, semicolons
    /// separate rows. A trailing empty row is dropped.
    fn parse_cases(&mut self, name: Token) -> ParseResult<Vec<Node>> {
        self.consume()?; // `(`

        let mut rows: Vec<Vec<Vec<Node>>> = Vec::new();
        let mut row: Vec<Vec<Node>> = Vec::new();
        loop {
            let cell = self.parse_expression(StopSet::CASES_CELL)?;
            let token = self.fetch()?.clone();

            if token.is_punct(",") {
                self.consume()?;
                row.push(cell);
            } else if token.is_punct(";") {
                self.consume()?;
                row.push(cell);
                rows.push(std::mem::take(&mut row));
            } else if token.is_punct(")") {
                self.consume()?;
                // Drop a trailing empty row; keep a non-empty one.
                if !(row.is_empty() && cell.is_empty()) {
                    row.push(cell);
                    rows.push(row);
                }
                break;
            } else if token.is_eof() {
                return Err(ParseError::new(ParseErrorKind::UnexpectedEnd, token.span));
            } else {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedToken(")".to_string()),
                    token.span,
                ));
            }
        }

        if rows.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyCases, name.span));
        }
        Ok(vec![self.build_cases(rows)])
    }

    fn build_cases(&self, rows: Vec<Vec<Vec<Node>>>) -> Node {
        let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        // All columns left-aligned; only the first column gets a gap after
        // it, and only when something follows it.
        let cols = (0..max_cols)
            .map(|i| ColumnSpec {
                align: ColumnAlign::Left,
                pregap: 0.0,
                postgap: if i == 0 && max_cols > 1 { 1.0 } else { 0.0 },
            })
            .collect();

        let body: Vec<Vec<Node>> = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<Node> = row
                    .into_iter()
                    .map(|cell| Node::Styling {
                        style: Style::Text,
                        body: vec![argify(cell)],
                    })
                    .collect();
                // Pad short rows with empty cells.
                while cells.len() < max_cols {
                    cells.push(Node::Styling {
                        style: Style::Text,
                        body: vec![argify(Vec::new())],
                    });
                }
                cells
            })
            .collect();

        let n_rows = body.len();
        let array = Node::Array(ArrayNode {
            cols,
            body,
            row_gaps: vec![None; n_rows.saturating_sub(1)],
            h_lines_before_row: vec![Vec::new(); n_rows + 1],
            arraystretch: 1.2,
        });

        // Visible opening brace, invisible right side.
        Node::LeftRight {
            left: "\\{".to_string(),
            right: ".".to_string(),
            body: vec![array],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Family, Mode};
    use crate::functions::FunctionRegistry;
    use crate::Settings;

    fn parse(input: &str) -> ParseResult<Vec<Node>> {
        let settings = Settings::default();
        Parser::new(input, &settings).parse()
    }

    fn parse_stripped(input: &str) -> Vec<Node> {
        let mut nodes = parse(input).unwrap_or_else(|e| panic!("parse error in {input:?}: {e}"));
        crate::ast::strip_spans(&mut nodes);
        nodes
    }

    fn mathord(text: &str) -> Node {
        Node::MathOrd {
            mode: Mode::Math,
            text: text.to_string(),
            span: None,
        }
    }

    fn atom(family: Family, text: &str) -> Node {
        Node::Atom {
            family,
            mode: Mode::Math,
            text: text.to_string(),
            span: None,
        }
    }

    #[test]
    fn test_frac_call() {
        let nodes = parse_stripped("frac(a, b)");
        assert_eq!(nodes.len(), 1);
        let Node::GenFrac(frac) = &nodes[0] else {
            panic!("expected GenFrac, got {nodes:?}");
        };
        assert_eq!(*frac.numer, mathord("a"));
        assert_eq!(*frac.denom, mathord("b"));
    }

    #[test]
    fn test_scenario_frac_of_sum_and_sqrt() {
        // frac(a + 1, sqrt(b)) → numerator is a group, denominator is the
        // sqrt handler's output.
        let nodes = parse_stripped("frac(a + 1, sqrt(b))");
        let Node::GenFrac(frac) = &nodes[0] else {
            panic!("expected GenFrac");
        };
        let Node::OrdGroup { body } = frac.numer.as_ref() else {
            panic!("expected grouped numerator");
        };
        assert_eq!(body.len(), 3);
        let Node::Sqrt { body, index } = frac.denom.as_ref() else {
            panic!("expected Sqrt denominator");
        };
        assert_eq!(**body, mathord("b"));
        assert!(index.is_none());
    }

    #[test]
    fn test_frac_arity() {
        let err = parse("frac(a)").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ArityMismatch {
                name: "frac".to_string(),
                expected: 2,
                got: 1,
            }
        );
        // The error points at the call-site name.
        assert_eq!(err.span, mexc_util::Span::new(0, 4));
    }

    #[test]
    fn test_root_call() {
        // root(index, radicand): arg order swaps into the sqrt handler.
        let nodes = parse_stripped("root(3, x)");
        let Node::Sqrt { body, index } = &nodes[0] else {
            panic!("expected Sqrt, got {nodes:?}");
        };
        assert_eq!(**body, mathord("x"));
        assert_eq!(
            *index.as_deref().unwrap(),
            Node::TextOrd {
                mode: Mode::Math,
                text: "3".to_string(),
                span: None,
            }
        );
    }

    #[test]
    fn test_accent_short_forms() {
        let nodes = parse_stripped("hat(x)");
        assert!(matches!(&nodes[0], Node::Accent { label, .. } if label == "\\hat"));

        let nodes = parse_stripped("vec(v)");
        assert!(matches!(&nodes[0], Node::Accent { label, .. } if label == "\\vec"));

        let nodes = parse_stripped("overline(x + y)");
        let Node::Overline { body } = &nodes[0] else {
            panic!("expected Overline");
        };
        assert!(matches!(body.as_ref(), Node::OrdGroup { .. }));
    }

    #[test]
    fn test_scenario_accent_arrow_aliases_vec() {
        let nodes = parse_stripped("accent(a, arrow)");
        let Node::Accent { label, base } = &nodes[0] else {
            panic!("expected Accent, got {nodes:?}");
        };
        assert_eq!(label, "\\vec");
        assert_eq!(**base, mathord("a"));
    }

    #[test]
    fn test_accent_kind_from_string_trimmed_case_insensitive() {
        let nodes = parse_stripped("accent(a, \" Hat \")");
        assert!(matches!(&nodes[0], Node::Accent { label, .. } if label == "\\hat"));
    }

    #[test]
    fn test_scenario_accent_arity() {
        let err = parse("accent(x)").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ArityMismatch {
                name: "accent".to_string(),
                expected: 2,
                got: 1,
            }
        );
    }

    #[test]
    fn test_unsupported_accent() {
        let err = parse("accent(a, wiggly)").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnsupportedAccent("wiggly".to_string())
        );
    }

    #[test]
    fn test_accent_kind_must_be_text() {
        let err = parse("accent(a, b / c)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::AccentKindMustBeText);
    }

    #[test]
    fn test_delimiter_wrappers() {
        let nodes = parse_stripped("abs(a + b)");
        let Node::LeftRight { left, right, body } = &nodes[0] else {
            panic!("expected LeftRight, got {nodes:?}");
        };
        assert_eq!(left, "|");
        assert_eq!(right, "|");
        assert_eq!(body.len(), 3);

        let nodes = parse_stripped("norm(v)");
        assert!(
            matches!(&nodes[0], Node::LeftRight { left, right, .. } if left == "\\|" && right == "\\|")
        );

        let nodes = parse_stripped("floor(x)");
        assert!(
            matches!(&nodes[0], Node::LeftRight { left, right, .. } if left == "\\lfloor" && right == "\\rfloor")
        );

        let nodes = parse_stripped("ceil(x)");
        assert!(
            matches!(&nodes[0], Node::LeftRight { left, right, .. } if left == "\\lceil" && right == "\\rceil")
        );
    }

    #[test]
    fn test_named_operator_call_keeps_parens() {
        let nodes = parse_stripped("sin(x)");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], Node::Op { name, .. } if name == "\\sin"));
        let Node::OrdGroup { body } = &nodes[1] else {
            panic!("expected args group");
        };
        assert_eq!(body[0], atom(Family::Open, "("));
        assert_eq!(body[1], mathord("x"));
        assert_eq!(body[2], atom(Family::Close, ")"));
    }

    #[test]
    fn test_named_operator_multiple_args() {
        let nodes = parse_stripped("max(a, b)");
        let Node::OrdGroup { body } = &nodes[1] else {
            panic!("expected args group");
        };
        assert_eq!(
            body,
            &vec![
                atom(Family::Open, "("),
                mathord("a"),
                atom(Family::Punct, ","),
                mathord("b"),
                atom(Family::Close, ")"),
            ]
        );
    }

    #[test]
    fn test_unknown_call_fallback() {
        let nodes = parse_stripped("foo(x)");
        assert_eq!(nodes.len(), 1);
        let Node::OrdGroup { body } = &nodes[0] else {
            panic!("expected OrdGroup, got {nodes:?}");
        };
        // f o o ( x )
        assert_eq!(body.len(), 4);
        assert_eq!(body[0], mathord("f"));
        assert_eq!(body[2], mathord("o"));
        assert!(matches!(&body[3], Node::OrdGroup { .. }));
    }

    #[test]
    fn test_empty_argument_list_allowed() {
        let nodes = parse_stripped("foo()");
        let Node::OrdGroup { body } = &nodes[0] else {
            panic!("expected OrdGroup");
        };
        let Node::OrdGroup { body: args } = &body[3] else {
            panic!("expected args group");
        };
        assert_eq!(args.len(), 2); // just ( )
    }

    #[test]
    fn test_trailing_comma_rejected() {
        let err = parse("frac(a, b,)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyArgument);
    }

    #[test]
    fn test_leading_empty_argument_rejected() {
        let err = parse("frac(, b)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyArgument);
    }

    #[test]
    fn test_unsupported_function_without_handler() {
        // With an empty registry even `/` has nothing to lower through.
        let settings = Settings::default();
        let err = Parser::with_functions("a / b", &settings, FunctionRegistry::empty())
            .parse()
            .unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnsupportedFunction("\\frac".to_string())
        );
    }

    #[test]
    fn test_bound_name_call_still_lowers_as_call() {
        // Rule order: a following `(` wins over the binding.
        let nodes = parse_stripped("let f = x; f(2)");
        let Node::OrdGroup { body } = &nodes[0] else {
            panic!("expected OrdGroup, got {nodes:?}");
        };
        assert_eq!(body[0], mathord("f"));
    }

    // =========================================================================
    // CASES
    // =========================================================================

    #[test]
    fn test_scenario_cases() {
        // cases(x, "if x >= 0"; -x, "otherwise")
        let nodes = parse_stripped("cases(x, \"if x >= 0\"; -x, \"otherwise\")");
        assert_eq!(nodes.len(), 1);
        let Node::LeftRight { left, right, body } = &nodes[0] else {
            panic!("expected LeftRight, got {nodes:?}");
        };
        assert_eq!(left, "\\{");
        assert_eq!(right, ".");

        let Node::Array(array) = &body[0] else {
            panic!("expected Array");
        };
        assert_eq!(array.body.len(), 2);
        assert_eq!(array.cols.len(), 2);
        assert_eq!(array.cols[0].align, ColumnAlign::Left);
        assert_eq!(array.cols[0].postgap, 1.0);
        assert_eq!(array.cols[0].pregap, 0.0);
        assert_eq!(array.cols[1].postgap, 0.0);
        assert!((array.arraystretch - 1.2).abs() < f64::EPSILON);
        assert_eq!(array.row_gaps, vec![None]);
        assert_eq!(array.h_lines_before_row, vec![vec![], vec![], vec![]]);

        // Cell (1,2) is a text node with the literal string.
        let Node::Styling { style, body } = &array.body[0][1] else {
            panic!("expected Styling cell");
        };
        assert_eq!(*style, Style::Text);
        let Node::Text { body: chars, .. } = &body[0] else {
            panic!("expected Text cell content, got {body:?}");
        };
        let text: String = chars
            .iter()
            .filter_map(|c| c.text().map(str::to_string))
            .collect();
        assert_eq!(text, "if x >= 0");
    }

    #[test]
    fn test_cases_single_cell() {
        let nodes = parse_stripped("cases(a)");
        let Node::LeftRight { body, .. } = &nodes[0] else {
            panic!("expected LeftRight");
        };
        let Node::Array(array) = &body[0] else {
            panic!("expected Array");
        };
        assert_eq!(array.body.len(), 1);
        assert_eq!(array.cols.len(), 1);
        // Single column: no postgap.
        assert_eq!(array.cols[0].postgap, 0.0);
        assert_eq!(array.row_gaps, Vec::<Option<f64>>::new());
        assert_eq!(array.h_lines_before_row.len(), 2);
    }

    #[test]
    fn test_cases_trailing_semicolon_dropped() {
        assert_eq!(parse_stripped("cases(a, b;)"), parse_stripped("cases(a, b)"));
    }

    #[test]
    fn test_cases_short_rows_padded() {
        let nodes = parse_stripped("cases(a; b, c)");
        let Node::LeftRight { body, .. } = &nodes[0] else {
            panic!("expected LeftRight");
        };
        let Node::Array(array) = &body[0] else {
            panic!("expected Array");
        };
        assert_eq!(array.body.len(), 2);
        assert_eq!(array.body[0].len(), 2);
        // The padding cell is an empty styled group.
        let Node::Styling { body, .. } = &array.body[0][1] else {
            panic!("expected Styling pad cell");
        };
        assert_eq!(body, &vec![Node::OrdGroup { body: Vec::new() }]);
    }

    #[test]
    fn test_empty_cases_rejected() {
        let err = parse("cases()").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyCases);
        assert_eq!(err.span, mexc_util::Span::new(0, 5));
    }

    #[test]
    fn test_cases_unclosed() {
        let err = parse("cases(a; b").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd);
    }

    #[test]
    fn test_plain_text_extraction() {
        // Through groups and multi-letter identifiers.
        let nodes = parse_stripped("accent(x, {hat})");
        assert!(matches!(&nodes[0], Node::Accent { label, .. } if label == "\\hat"));
    }
}
