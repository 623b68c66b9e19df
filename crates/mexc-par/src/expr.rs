//! Expression parsing: the precedence levels.
//!
//! Levels from loosest to tightest binding:
//!
//! 1. comparison — `= == != < <= > >= -> <- <-> => <=>`, left-chaining
//! 2. additive — `+`, `-`
//! 3. multiplicative — `*`, `/` (fraction lowering), juxtaposition
//! 4. unary — leading `+` (no-op) and `-`
//! 5. postfix — `^` / `_` attachments
//! 6. primary — literals, identifiers, delimited groups
//!
//! Unlike a conventional expression parser, levels build flat node
//! *sequences*, not operator trees: `a + b` is three sibling nodes
//! (`a`, a `+` atom, `b`), because that is the shape math layout engines
//! consume. The two exceptions are `/`, which swallows the accumulated
//! left sequence into a fraction node, and `^`/`_`, which fold their base
//! into a `SupSub`.
//!
//! Every level takes a [`StopSet`]; a stop token (or EOF) ends the level
//! without being consumed.

use mexc_lex::{Token, TokenKind};
use mexc_util::{ParseError, ParseErrorKind, ParseResult, Span};

use crate::ast::{argify, Mode, Node};
use crate::parser::{Parser, StopSet};
use crate::symbols::{named_operator, named_symbol, normalize_delimiter, operator_symbol};

/// Comparison-level operators.
const COMPARISON_OPS: [&str; 12] = [
    "=", "==", "!=", "<", "<=", ">", ">=", "->", "<-", "<->", "=>", "<=>",
];

/// Tokens that can never begin a primary; the primary level returns
/// nothing (rather than erroring) when it sees one, so the caller's level
/// decides what they mean.
const NON_PREFIX_TOKENS: [&str; 13] = [
    "+", "-", "*", "/", "^", "_", "=", "==", "!=", "<", "<=", ">", ">=",
];

fn is_comparison_op(token: &Token) -> bool {
    token.kind == TokenKind::Op && COMPARISON_OPS.contains(&token.text.as_str())
}

fn is_additive_op(token: &Token) -> bool {
    token.kind == TokenKind::Op && matches!(token.text.as_str(), "+" | "-")
}

/// Can this token start a primary? Gates implicit juxtaposition: a
/// dangling closer must never be misread as an operand.
fn can_start_primary(token: &Token) -> bool {
    match token.kind {
        TokenKind::Ident | TokenKind::Number | TokenKind::Str => true,
        TokenKind::Punct => matches!(token.text.as_str(), "(" | "[" | "{"),
        _ => false,
    }
}

impl<'a> Parser<'a> {
    /// Entry point for one expression body: the comparison level.
    pub(crate) fn parse_expression(&mut self, stop: StopSet) -> ParseResult<Vec<Node>> {
        let mut nodes = self.parse_additive(stop)?;

        loop {
            let token = self.fetch()?.clone();
            if stop.stops(&token) || !is_comparison_op(&token) {
                break;
            }
            self.consume()?;
            nodes.push(self.binary_symbol(&token));
            let rhs = self.parse_additive(stop)?;
            if rhs.is_empty() {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedExpressionAfterOperator,
                    token.span,
                ));
            }
            nodes.extend(rhs);
        }

        Ok(nodes)
    }

    fn parse_additive(&mut self, stop: StopSet) -> ParseResult<Vec<Node>> {
        let mut nodes = self.parse_multiplicative(stop)?;

        loop {
            let token = self.fetch()?.clone();
            if stop.stops(&token) || !is_additive_op(&token) {
                break;
            }
            self.consume()?;
            nodes.push(self.binary_symbol(&token));
            let rhs = self.parse_multiplicative(stop)?;
            if rhs.is_empty() {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedExpressionAfterOperator,
                    token.span,
                ));
            }
            nodes.extend(rhs);
        }

        Ok(nodes)
    }

    fn parse_multiplicative(&mut self, stop: StopSet) -> ParseResult<Vec<Node>> {
        let mut nodes = self.parse_unary(stop)?;

        loop {
            let token = self.fetch()?.clone();
            if stop.stops(&token) {
                break;
            }

            if token.is_op("*") {
                self.consume()?;
                nodes.push(self.binary_symbol(&token));
                let rhs = self.parse_unary(stop)?;
                if rhs.is_empty() {
                    return Err(ParseError::new(
                        ParseErrorKind::ExpectedExpressionAfterOperator,
                        token.span,
                    ));
                }
                nodes.extend(rhs);
            } else if token.is_op("/") {
                // Fraction lowering: the accumulated left sequence becomes
                // the numerator, and the fraction node becomes the new left
                // operand for further chaining.
                self.consume()?;
                let numer = argify(std::mem::take(&mut nodes));
                let denom_seq = self.parse_unary(stop)?;
                if denom_seq.is_empty() {
                    return Err(ParseError::new(
                        ParseErrorKind::ExpectedExpressionAfterOperator,
                        token.span,
                    ));
                }
                let frac =
                    self.call_handler("\\frac", &token, vec![numer, argify(denom_seq)], Vec::new())?;
                nodes.push(frac);
            } else if can_start_primary(&token) && !is_comparison_op(&token) && !is_additive_op(&token)
            {
                // Implicit juxtaposition.
                let rhs = self.parse_unary(stop)?;
                nodes.extend(rhs);
            } else {
                break;
            }
        }

        Ok(nodes)
    }

    fn parse_unary(&mut self, stop: StopSet) -> ParseResult<Vec<Node>> {
        let token = self.fetch()?.clone();

        // Leading signs are part of the unary production itself, ahead of
        // the stop check, so `x^-1` gets its minus.
        if token.is_op("+") {
            self.consume()?;
            return self.parse_unary(stop);
        }
        if token.is_op("-") {
            self.consume()?;
            let mut nodes = vec![self.symbol_node("-", token.span)];
            nodes.extend(self.parse_unary(stop)?);
            return Ok(nodes);
        }

        self.parse_postfix(stop)
    }

    fn parse_postfix(&mut self, stop: StopSet) -> ParseResult<Vec<Node>> {
        let base = self.parse_primary(stop)?;

        let mut sup: Option<Node> = None;
        let mut sub: Option<Node> = None;
        loop {
            let token = self.fetch()?.clone();
            if stop.stops(&token) {
                break;
            }
            if token.is_op("^") {
                if sup.is_some() {
                    return Err(ParseError::new(
                        ParseErrorKind::DoubleSuperscript,
                        token.span,
                    ));
                }
                self.consume()?;
                sup = Some(self.parse_script()?);
            } else if token.is_op("_") {
                if sub.is_some() {
                    return Err(ParseError::new(ParseErrorKind::DoubleSubscript, token.span));
                }
                self.consume()?;
                sub = Some(self.parse_script()?);
            } else {
                break;
            }
        }

        if sup.is_none() && sub.is_none() {
            return Ok(base);
        }
        Ok(vec![Node::SupSub {
            base: Box::new(argify(base)),
            sup: sup.map(Box::new),
            sub: sub.map(Box::new),
        }])
    }

    /// One script argument: a braced expression, or a single
    /// unary-precedence expression under the narrow script stop set.
    fn parse_script(&mut self) -> ParseResult<Node> {
        let token = self.fetch()?.clone();

        if token.is_punct("{") {
            self.consume()?;
            let body = self.parse_expression(StopSet::BRACE)?;
            self.expect_punct("}")?;
            return Ok(argify(body));
        }

        let nodes = self.parse_unary(StopSet::SCRIPT)?;
        if nodes.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedScriptArgument,
                token.span,
            ));
        }
        Ok(argify(nodes))
    }

    fn parse_primary(&mut self, stop: StopSet) -> ParseResult<Vec<Node>> {
        let token = self.fetch()?.clone();
        if stop.stops(&token) {
            return Ok(Vec::new());
        }

        match token.kind {
            TokenKind::Eof => Ok(Vec::new()),

            TokenKind::Ident => {
                self.consume()?;
                self.lower_identifier(token)
            }

            TokenKind::Number => {
                self.consume()?;
                Ok(vec![Node::TextOrd {
                    mode: self.mode,
                    text: token.text,
                    span: Some(token.span),
                }])
            }

            TokenKind::Str => {
                self.consume()?;
                Ok(vec![self.string_node(token)])
            }

            TokenKind::Op | TokenKind::Punct => match token.text.as_str() {
                "(" => self.parse_visible_group(")"),
                "[" => self.parse_visible_group("]"),
                "{" => self.parse_braced_group(),

                // A closer: the caller's level will stop on it.
                ")" | "]" | "}" => Ok(Vec::new()),

                text if NON_PREFIX_TOKENS.contains(&text) => Ok(Vec::new()),

                // Anything else is content: emit a symbol node for the
                // literal text (symbol-table fallback keeps unknowns).
                _ => {
                    self.consume()?;
                    Ok(vec![self.symbol_node(&token.text, token.span)])
                }
            },
        }
    }

    // =========================================================================
    // IDENTIFIER LOWERING
    // =========================================================================

    /// Lower a just-consumed identifier token.
    fn lower_identifier(&mut self, token: Token) -> ParseResult<Vec<Node>> {
        // A following `(` always means a call, even for bound names.
        if self.fetch()?.is_punct("(") {
            return self.parse_call(token);
        }

        if let Some(value) = self.env.lookup(&token.text) {
            return Ok(vec![argify(value)]);
        }

        if let Some(command) = named_symbol(&token.text) {
            return Ok(vec![self.symbol_node(command, token.span)]);
        }

        if let Some(command) = named_operator(&token.text) {
            let op = self.call_handler(command, &token, Vec::new(), Vec::new())?;
            return Ok(vec![op]);
        }

        if token.text.chars().count() == 1 {
            return Ok(vec![self.symbol_node(&token.text, token.span)]);
        }

        // Multi-letter identifiers render as concatenated letters.
        Ok(vec![Node::OrdGroup {
            body: self.spell_out(&token),
        }])
    }

    /// Per-character symbol nodes for an identifier's text.
    pub(crate) fn spell_out(&self, token: &Token) -> Vec<Node> {
        token
            .text
            .chars()
            .enumerate()
            .map(|(i, c)| {
                // Identifiers are ASCII, so char index == byte offset.
                let start = token.span.start + i;
                self.symbol_node(&c.to_string(), Span::new(start, start + 1))
            })
            .collect()
    }

    // =========================================================================
    // GROUPS AND LITERALS
    // =========================================================================

    /// `( ... )` or `[ ... ]`: the delimiters stay in the output.
    fn parse_visible_group(&mut self, closer: &'static str) -> ParseResult<Vec<Node>> {
        let open = self.consume()?;
        let stop = if closer == ")" {
            StopSet::PAREN
        } else {
            StopSet::BRACKET
        };
        let inner = self.parse_expression(stop)?;
        let close = self.expect_punct(closer)?;

        let mut body = Vec::with_capacity(inner.len() + 2);
        body.push(self.symbol_node(normalize_delimiter(&open.text), open.span));
        body.extend(inner);
        body.push(self.symbol_node(normalize_delimiter(closer), close.span));
        Ok(vec![Node::OrdGroup { body }])
    }

    /// `{ ... }`: semantic grouping only, no visible delimiters.
    fn parse_braced_group(&mut self) -> ParseResult<Vec<Node>> {
        self.consume()?;
        let inner = self.parse_expression(StopSet::BRACE)?;
        self.expect_punct("}")?;
        Ok(vec![Node::OrdGroup { body: inner }])
    }

    /// A string literal: a text node whose body is one text-mode ordinary
    /// per character. The node itself keeps the surrounding (math) mode.
    fn string_node(&self, token: Token) -> Node {
        let body = token
            .text
            .chars()
            .map(|c| Node::TextOrd {
                mode: Mode::Text,
                text: c.to_string(),
                span: Some(token.span),
            })
            .collect();
        Node::Text {
            mode: self.mode,
            body,
        }
    }

    /// The symbol node for a binary/relation operator token, routed
    /// through the operator-to-symbol map.
    fn binary_symbol(&self, token: &Token) -> Node {
        self.symbol_node(operator_symbol(&token.text), token.span)
    }
}
