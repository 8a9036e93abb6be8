//! Lexer for set expressions

use crate::setlab::error::ExpressionError;
use crate::setlab::expression::token::Token;
use logos::Logos;
use std::ops::Range;

/// A token with its byte range in the source
pub type TokenSpan = (Token, Range<usize>);

/// Tokenize an expression, failing on the first character outside the alphabet
pub fn lex(source: &str) -> Result<Vec<TokenSpan>, ExpressionError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(ExpressionError::UnknownToken {
                    token: lexer.slice().to_string(),
                    position: span.start,
                })
            }
        }
    }

    Ok(tokens)
}
