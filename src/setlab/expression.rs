//! Set expression language
//!
//! Expressions combine set labels with `∪` (union), `∩` (intersection), `\`
//! (difference) and `Δ` (symmetric difference), grouped with parentheses. The
//! pipeline is:
//!
//! 1. [`lexer::lex`] turns the source into tokens, rejecting any other character.
//! 2. [`parser::parse`] builds a [`SetExpr`] tree with chumsky.
//! 3. [`Evaluate`] computes the tree against concrete sets.
//!
//! Nothing is ever handed to a general-purpose interpreter: the five token classes
//! above are the whole language.

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{BinaryOp, SetExpr};
pub use eval::{evaluate, Evaluate};
pub use lexer::{lex, TokenSpan};
pub use parser::parse;
pub use token::Token;
