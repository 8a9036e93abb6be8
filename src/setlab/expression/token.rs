//! Token definitions for set expressions
//!
//! The alphabet is small: identifiers, the four set operators and
//! parentheses. Everything else is a lexing error.

use logos::Logos;
use std::fmt;

/// All tokens of the expression language
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(skip r"\s+")]
pub enum Token {
    #[token("∪")]
    Union,

    #[token("∩")]
    Intersection,

    #[token("\\")]
    Difference,

    #[token("Δ")]
    SymmetricDifference,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    // Whole words, so `AB` never reads as `A` followed by `B`
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
}

impl Token {
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Union | Token::Intersection | Token::Difference | Token::SymmetricDifference
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Union => write!(f, "∪"),
            Token::Intersection => write!(f, "∩"),
            Token::Difference => write!(f, "\\"),
            Token::SymmetricDifference => write!(f, "Δ"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Identifier(name) => write!(f, "{name}"),
        }
    }
}
