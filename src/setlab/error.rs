//! Error types shared across the workbench
//!
//! `ExpressionError` covers everything the expression lexer, parser and evaluator can
//! reject. `SetlabError` is the crate-level error that wraps it together with project,
//! configuration, export and file-system failures.

use crate::setlab::formats::FormatError;
use std::fmt;

/// Errors raised while lexing, parsing or evaluating a set expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// The expression is empty or contains only whitespace
    Empty,
    /// A character outside the expression alphabet
    UnknownToken { token: String, position: usize },
    /// A `)` without its `(`, or a `(` that is never closed
    UnbalancedParenthesis { position: usize },
    /// Well-formed tokens in an order the grammar does not accept
    Syntax {
        message: String,
        position: Option<usize>,
    },
    /// A name that is not one of the active set labels
    UndefinedLabel { label: String },
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::Empty => write!(f, "Expression is empty"),
            ExpressionError::UnknownToken { token, position } => {
                write!(f, "Unknown token '{token}' at offset {position}")
            }
            ExpressionError::UnbalancedParenthesis { position } => {
                write!(f, "Unbalanced parenthesis at offset {position}")
            }
            ExpressionError::Syntax {
                message,
                position: Some(position),
            } => write!(f, "Syntax error at offset {position}: {message}"),
            ExpressionError::Syntax {
                message,
                position: None,
            } => write!(f, "Syntax error: {message}"),
            ExpressionError::UndefinedLabel { label } => {
                write!(f, "Undefined set label '{label}'")
            }
        }
    }
}

impl std::error::Error for ExpressionError {}

/// Top-level error for workbench operations
#[derive(Debug, Clone, PartialEq)]
pub enum SetlabError {
    Expression(ExpressionError),
    /// Only 2, 3 or 4 sets can be active
    InvalidSetCount(usize),
    InvalidLabel(String),
    UnknownOperation(String),
    /// A project file that is readable but not acceptable
    Project(String),
    Format(FormatError),
    Config(String),
    Io(String),
}

impl fmt::Display for SetlabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetlabError::Expression(err) => write!(f, "{err}"),
            SetlabError::InvalidSetCount(count) => {
                write!(f, "Invalid number of sets: {count} (expected 2, 3 or 4)")
            }
            SetlabError::InvalidLabel(label) => write!(f, "Invalid set label '{label}'"),
            SetlabError::UnknownOperation(name) => write!(f, "Unknown operation '{name}'"),
            SetlabError::Project(msg) => write!(f, "Project error: {msg}"),
            SetlabError::Format(err) => write!(f, "{err}"),
            SetlabError::Config(msg) => write!(f, "Configuration error: {msg}"),
            SetlabError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for SetlabError {}

impl From<ExpressionError> for SetlabError {
    fn from(err: ExpressionError) -> Self {
        SetlabError::Expression(err)
    }
}

impl From<FormatError> for SetlabError {
    fn from(err: FormatError) -> Self {
        SetlabError::Format(err)
    }
}

impl From<std::io::Error> for SetlabError {
    fn from(err: std::io::Error) -> Self {
        SetlabError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for SetlabError {
    fn from(err: config::ConfigError) -> Self {
        SetlabError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_error_messages() {
        let err = ExpressionError::UnknownToken {
            token: "=".to_string(),
            position: 2,
        };
        assert_eq!(err.to_string(), "Unknown token '=' at offset 2");

        let err = ExpressionError::UndefinedLabel {
            label: "Z".to_string(),
        };
        assert_eq!(err.to_string(), "Undefined set label 'Z'");
    }

    #[test]
    fn test_expression_error_converts_to_setlab_error() {
        let err: SetlabError = ExpressionError::Empty.into();
        assert_eq!(err, SetlabError::Expression(ExpressionError::Empty));
        assert_eq!(err.to_string(), "Expression is empty");
    }
}
