//! Evaluation of set expressions against a named-set environment

use crate::setlab::elements::ElementSet;
use crate::setlab::error::ExpressionError;
use crate::setlab::expression::ast::SetExpr;
use crate::setlab::expression::parser::parse;
use crate::setlab::sets::{Label, NamedSets};

/// Anything that yields a set when given concrete values for the labels
pub trait Evaluate {
    fn evaluate(&self, sets: &NamedSets) -> Result<ElementSet, ExpressionError>;
}

impl Evaluate for SetExpr {
    fn evaluate(&self, sets: &NamedSets) -> Result<ElementSet, ExpressionError> {
        match self {
            SetExpr::Set(name) => lookup(name, sets).cloned(),
            SetExpr::Chain { first, rest } => {
                let mut acc = first.evaluate(sets)?;
                for (op, operand) in rest {
                    acc = op.apply(&acc, &operand.evaluate(sets)?);
                }
                Ok(acc)
            }
        }
    }
}

/// Resolve a set name to its bound value
pub(crate) fn lookup<'a>(name: &str, sets: &'a NamedSets) -> Result<&'a ElementSet, ExpressionError> {
    name.parse::<Label>()
        .ok()
        .and_then(|label| sets.get(label))
        .ok_or_else(|| ExpressionError::UndefinedLabel {
            label: name.to_string(),
        })
}

/// Parse and evaluate an expression in one step
pub fn evaluate(source: &str, sets: &NamedSets) -> Result<ElementSet, ExpressionError> {
    parse(source)?.evaluate(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> ElementSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn env() -> NamedSets {
        NamedSets::from_inputs([(Label::A, "1 2 3"), (Label::B, "2 3 4")])
    }

    #[test]
    fn test_evaluate_basic_expressions() {
        let sets = env();
        assert_eq!(evaluate("A ∪ B", &sets).unwrap(), set(&["1", "2", "3", "4"]));
        assert_eq!(evaluate("A ∩ B", &sets).unwrap(), set(&["2", "3"]));
        assert_eq!(evaluate("A \\ B", &sets).unwrap(), set(&["1"]));
        assert_eq!(evaluate("A Δ B", &sets).unwrap(), set(&["1", "4"]));
        assert_eq!(evaluate("A ∩ (B ∪ A)", &sets).unwrap(), set(&["2", "3"]));
    }

    #[test]
    fn test_evaluate_undefined_label() {
        let sets = env();
        assert_eq!(
            evaluate("A ∪ Z", &sets),
            Err(ExpressionError::UndefinedLabel {
                label: "Z".to_string()
            })
        );
        // Valid label letter, but not bound in this environment
        assert!(matches!(
            evaluate("C", &sets),
            Err(ExpressionError::UndefinedLabel { .. })
        ));
        assert!(matches!(
            evaluate("AB", &sets),
            Err(ExpressionError::UndefinedLabel { .. })
        ));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let sets = env();
        let first = evaluate("(A Δ B) ∪ (A ∩ B)", &sets).unwrap();
        let second = evaluate("(A Δ B) ∪ (A ∩ B)", &sets).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, set(&["1", "2", "3", "4"]));
    }

    #[test]
    fn test_evaluate_very_long_chain() {
        let sets = env();
        let source = vec!["A"; 200_000].join(" ∪ ");
        assert_eq!(evaluate(&source, &sets).unwrap(), set(&["1", "2", "3"]));

        let source = format!("B{}", " Δ A \\ A".repeat(100_000));
        assert_eq!(evaluate(&source, &sets).unwrap(), set(&["4"]));
    }
}
