//! Parser combinators for set expressions
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expression   := intersection (("∪" | "\" | "Δ") intersection)*
//! intersection := operand ("∩" operand)*
//! operand      := identifier | "(" expression ")"
//! ```
//!
//! Both repetition levels fold to the left, so operators of equal precedence evaluate
//! left to right. Chains of any length are fine; parentheses may nest at most
//! [`MAX_NESTING`] deep.

use chumsky::error::Error as _;
use chumsky::prelude::*;

use crate::setlab::error::ExpressionError;
use crate::setlab::expression::ast::{BinaryOp, SetExpr};
use crate::setlab::expression::lexer::{lex, TokenSpan};
use crate::setlab::expression::token::Token;

/// Deepest parenthesis nesting accepted
pub const MAX_NESTING: usize = 256;

/// Type alias for parser error
type ParserError = Simple<TokenSpan>;

/// Helper: match a specific token type, ignoring the span
fn token(expected: Token) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok == &expected).ignored()
}

/// Helper: a set name
fn set_name() -> impl Parser<TokenSpan, SetExpr, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Identifier(name) => Ok(SetExpr::set(name)),
        other => Err(ParserError::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

/// Helper: one of the loosely binding operators
fn loose_operator() -> impl Parser<TokenSpan, BinaryOp, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Union => Ok(BinaryOp::Union),
        Token::Difference => Ok(BinaryOp::Difference),
        Token::SymmetricDifference => Ok(BinaryOp::SymmetricDifference),
        other => Err(ParserError::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

/// Build the expression parser
pub(crate) fn expression() -> impl Parser<TokenSpan, SetExpr, Error = ParserError> + Clone {
    recursive(|expr| {
        let group = token(Token::OpenParen)
            .ignore_then(expr)
            .then_ignore(token(Token::CloseParen));

        let operand = set_name().or(group);

        let intersection = operand
            .clone()
            .then(token(Token::Intersection).ignore_then(operand).repeated())
            .foldl(|lhs, rhs| SetExpr::binary(BinaryOp::Intersection, lhs, rhs));

        intersection
            .clone()
            .then(loose_operator().then(intersection).repeated())
            .foldl(|lhs, (op, rhs)| SetExpr::binary(op, lhs, rhs))
    })
}

/// Parse an expression into a tree
pub fn parse(source: &str) -> Result<SetExpr, ExpressionError> {
    let tokens = lex(source)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }
    check_parentheses(&tokens)?;

    expression()
        .then_ignore(end())
        .parse(tokens)
        .map_err(|errors| syntax_error(source, errors))
}

/// Reject unbalanced or overly deep parentheses before the grammar sees them, so the
/// error can point at the offending bracket.
fn check_parentheses(tokens: &[TokenSpan]) -> Result<(), ExpressionError> {
    let mut open = Vec::new();
    for (tok, range) in tokens {
        match tok {
            Token::OpenParen => {
                if open.len() == MAX_NESTING {
                    return Err(ExpressionError::Syntax {
                        message: format!("parentheses nested deeper than {MAX_NESTING}"),
                        position: Some(range.start),
                    });
                }
                open.push(range.start);
            }
            Token::CloseParen => {
                if open.pop().is_none() {
                    return Err(ExpressionError::UnbalancedParenthesis {
                        position: range.start,
                    });
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(position) => Err(ExpressionError::UnbalancedParenthesis { position }),
        None => Ok(()),
    }
}

fn syntax_error(source: &str, errors: Vec<ParserError>) -> ExpressionError {
    let Some(error) = errors.into_iter().next() else {
        return ExpressionError::Syntax {
            message: "invalid expression".to_string(),
            position: None,
        };
    };

    match error.found() {
        Some((tok, range)) => {
            let message = if tok.is_operator() {
                format!("operator '{tok}' is missing an operand")
            } else {
                format!("unexpected '{tok}'")
            };
            ExpressionError::Syntax {
                message,
                position: Some(range.start),
            }
        }
        None => ExpressionError::Syntax {
            message: "unexpected end of expression".to_string(),
            position: Some(source.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(name: &str) -> SetExpr {
        SetExpr::set(name)
    }

    #[test]
    fn test_parse_single_label() {
        assert_eq!(parse("A").unwrap(), set("A"));
        assert_eq!(parse(" ( ( B ) ) ").unwrap(), set("B"));
    }

    #[test]
    fn test_intersection_binds_tighter() {
        let expected = SetExpr::binary(
            BinaryOp::Union,
            set("A"),
            SetExpr::binary(BinaryOp::Intersection, set("B"), set("C")),
        );
        assert_eq!(parse("A ∪ B ∩ C").unwrap(), expected);
    }

    #[test]
    fn test_equal_precedence_is_left_to_right() {
        let expected = SetExpr::binary(
            BinaryOp::SymmetricDifference,
            SetExpr::binary(BinaryOp::Difference, set("A"), set("B")),
            set("C"),
        );
        assert_eq!(parse("A \\ B Δ C").unwrap(), expected);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expected = SetExpr::binary(
            BinaryOp::Intersection,
            SetExpr::binary(BinaryOp::Union, set("A"), set("B")),
            set("C"),
        );
        assert_eq!(parse("(A ∪ B) ∩ C").unwrap(), expected);
    }

    #[test]
    fn test_display_reparses_to_same_tree() {
        let source = "(A ∪ B) ∩ (C \\ (D Δ A))";
        let tree = parse(source).unwrap();
        assert_eq!(parse(&tree.to_string()).unwrap(), tree);
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(parse(""), Err(ExpressionError::Empty));
        assert_eq!(parse("   "), Err(ExpressionError::Empty));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(
            parse("(A ∪ B"),
            Err(ExpressionError::UnbalancedParenthesis { position: 0 })
        );
        assert_eq!(
            parse("A)"),
            Err(ExpressionError::UnbalancedParenthesis { position: 1 })
        );
    }

    #[test]
    fn test_malformed_sequences() {
        for source in ["A ∪", "∩ A", "A B", "()", "A ∪ ∩ B", "print(A)"] {
            assert!(
                matches!(parse(source), Err(ExpressionError::Syntax { .. })),
                "expected syntax error for {source:?}"
            );
        }
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}A{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse(&nested(MAX_NESTING)).unwrap(), set("A"));
        assert_eq!(
            parse(&nested(100_000)),
            Err(ExpressionError::Syntax {
                message: format!("parentheses nested deeper than {MAX_NESTING}"),
                position: Some(MAX_NESTING),
            })
        );
    }

    #[test]
    fn test_long_chain_is_flat() {
        let tree = parse(&vec!["A"; 50_000].join(" ∪ ")).unwrap();
        let SetExpr::Chain { rest, .. } = &tree else {
            panic!("expected a chain");
        };
        assert_eq!(rest.len(), 49_999);
    }
}
