//! Edge case tests for mexc-lex

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token, TokenKind};
    use mexc_util::ParseResult;

    fn lex_all(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .collect::<ParseResult<Vec<_>>>()
            .unwrap_or_else(|e| panic!("lex error in {source:?}: {e}"))
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_whitespace_only() {
        assert!(lex_all(" \t\r\n ").is_empty());
    }

    #[test]
    fn test_edge_comment_only() {
        assert!(lex_all("// nothing here").is_empty());
        assert!(lex_all("/* nothing here */").is_empty());
    }

    #[test]
    fn test_edge_single_char_ident() {
        let t = lex_all("x");
        assert_eq!(t[0], Token::new(TokenKind::Ident, "x", t[0].span));
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10000);
        let t = lex_all(&name);
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].text, name);
    }

    #[test]
    fn test_edge_let_is_not_a_keyword() {
        let t = lex_all("let letx");
        assert_eq!(t[0].kind, TokenKind::Ident);
        assert_eq!(t[0].text, "let");
        assert_eq!(t[1].text, "letx");
    }

    #[test]
    fn test_edge_empty_string_literal() {
        let t = lex_all("\"\"");
        assert_eq!(t[0].kind, TokenKind::Str);
        assert_eq!(t[0].text, "");
    }

    #[test]
    fn test_edge_number_without_leading_digit() {
        let t = lex_all(".25");
        assert_eq!(t[0].kind, TokenKind::Number);
        assert_eq!(t[0].text, ".25");
    }

    #[test]
    fn test_edge_trailing_dot_number() {
        let t = lex_all("1.");
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].text, "1.");
    }

    #[test]
    fn test_edge_operator_runs() {
        // No whitespace needed between operators; longest match is applied
        // left to right.
        let t = lex_all("a<=>b");
        let texts: Vec<_> = t.iter().map(|x| x.text.as_str()).collect();
        assert_eq!(texts, ["a", "<=>", "b"]);
    }

    #[test]
    fn test_edge_bang_equals_vs_bang() {
        let t = lex_all("!! !=");
        let texts: Vec<_> = t.iter().map(|x| x.text.as_str()).collect();
        assert_eq!(texts, ["!", "!", "!="]);
    }

    #[test]
    fn test_edge_comment_inside_expression() {
        let t = lex_all("a /* gap */ + b // tail");
        let texts: Vec<_> = t.iter().map(|x| x.text.as_str()).collect();
        assert_eq!(texts, ["a", "+", "b"]);
    }

    #[test]
    fn test_edge_line_comment_at_eof_without_newline() {
        assert!(lex_all("// last line").is_empty());
    }

    #[test]
    fn test_edge_slash_is_an_operator() {
        let t = lex_all("a / b");
        assert_eq!(t[1].kind, TokenKind::Op);
        assert_eq!(t[1].text, "/");
    }

    #[test]
    fn test_edge_nested_delimiters() {
        let t = lex_all("((()))");
        assert_eq!(t.iter().filter(|x| x.is_punct("(")).count(), 3);
        assert_eq!(t.iter().filter(|x| x.is_punct(")")).count(), 3);
    }

    #[test]
    fn test_edge_string_with_newline_content() {
        let t = lex_all("\"a\nb\"");
        assert_eq!(t[0].text, "a\nb");
    }

    // ==================== PROPERTIES ====================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Lex a source, stopping at the first error. Never panics.
        fn try_lex(source: &str) -> ParseResult<Vec<Token>> {
            Lexer::new(source).collect()
        }

        proptest! {
            /// The lexer terminates without panicking on arbitrary input.
            #[test]
            fn prop_lexer_never_panics(source in "\\PC{0,64}") {
                let _ = try_lex(&source);
            }

            /// Token spans are in order and never overlap.
            #[test]
            fn prop_spans_monotone(source in "[a-z0-9_+*/^<>=!(),;. -]{0,64}") {
                if let Ok(tokens) = try_lex(&source) {
                    let mut last_end = 0;
                    for token in tokens {
                        prop_assert!(token.span.start >= last_end);
                        prop_assert!(token.span.end >= token.span.start);
                        last_end = token.span.end;
                    }
                }
            }

            /// Lexing is deterministic: a second pass reproduces the same
            /// tokens and offsets.
            #[test]
            fn prop_relex_is_identical(source in "\\PC{0,64}") {
                prop_assert_eq!(try_lex(&source), try_lex(&source));
            }
        }
    }
}
