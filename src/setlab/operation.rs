//! Operations selectable in a workspace
//!
//! The four fixed operations are direct set folds and never touch the expression
//! grammar. Free-form expressions carry both their source and the parsed tree.

use crate::setlab::elements::ElementSet;
use crate::setlab::error::{ExpressionError, SetlabError};
use crate::setlab::expression::eval::lookup;
use crate::setlab::expression::{parse, BinaryOp, Evaluate, SetExpr};
use crate::setlab::sets::{Label, NamedSets};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An operation ready to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Union of all active sets
    Union,
    /// Intersection of all active sets
    Intersection,
    Difference {
        first: Label,
        second: Label,
    },
    SymmetricDifference {
        first: Label,
        second: Label,
    },
    Expression {
        source: String,
        tree: SetExpr,
    },
}

impl Operation {
    /// Parse a free-form expression into an operation
    pub fn expression(source: &str) -> Result<Self, ExpressionError> {
        let tree = parse(source)?;
        Ok(Operation::Expression {
            source: source.trim().to_string(),
            tree,
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Union => OperationKind::Union,
            Operation::Intersection => OperationKind::Intersection,
            Operation::Difference { .. } => OperationKind::Difference,
            Operation::SymmetricDifference { .. } => OperationKind::Symdiff,
            Operation::Expression { .. } => OperationKind::Expression,
        }
    }

    /// Operand labels of the binary operations
    pub fn operands(&self) -> Option<(Label, Label)> {
        match self {
            Operation::Difference { first, second }
            | Operation::SymmetricDifference { first, second } => Some((*first, *second)),
            _ => None,
        }
    }

    /// One-line description such as `DIFFERENCE: A \ B`
    pub fn describe(&self, labels: &[Label]) -> String {
        format!("{}: {}", self.kind().title(), self.formula(labels))
    }

    /// The operation written as a formula over the active labels
    pub fn formula(&self, labels: &[Label]) -> String {
        let join = |symbol: &str| {
            let separator = format!(" {symbol} ");
            labels
                .iter()
                .map(|label| label.as_str())
                .collect::<Vec<_>>()
                .join(separator.as_str())
        };
        match self {
            Operation::Union => join("∪"),
            Operation::Intersection => join("∩"),
            Operation::Difference { first, second } => format!("{first} \\ {second}"),
            Operation::SymmetricDifference { first, second } => format!("{first} Δ {second}"),
            Operation::Expression { source, .. } => source.clone(),
        }
    }
}

impl Evaluate for Operation {
    fn evaluate(&self, sets: &NamedSets) -> Result<ElementSet, ExpressionError> {
        match self {
            Operation::Union => Ok(sets.union_all()),
            Operation::Intersection => Ok(sets.intersection_all()),
            Operation::Difference { first, second } => {
                binary(sets, *first, *second, BinaryOp::Difference)
            }
            Operation::SymmetricDifference { first, second } => {
                binary(sets, *first, *second, BinaryOp::SymmetricDifference)
            }
            Operation::Expression { tree, .. } => tree.evaluate(sets),
        }
    }
}

/// Binary fixed operations; identical operands yield the empty set
fn binary(
    sets: &NamedSets,
    first: Label,
    second: Label,
    op: BinaryOp,
) -> Result<ElementSet, ExpressionError> {
    let lhs = lookup(first.as_str(), sets)?;
    let rhs = lookup(second.as_str(), sets)?;
    if first == second {
        return Ok(ElementSet::new());
    }
    Ok(op.apply(lhs, rhs))
}

/// Operation names as stored in project files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    Union,
    Intersection,
    Difference,
    Symdiff,
    Expression,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Union,
        OperationKind::Intersection,
        OperationKind::Difference,
        OperationKind::Symdiff,
        OperationKind::Expression,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Union => "union",
            OperationKind::Intersection => "intersection",
            OperationKind::Difference => "difference",
            OperationKind::Symdiff => "symdiff",
            OperationKind::Expression => "expression",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            OperationKind::Union => "UNION",
            OperationKind::Intersection => "INTERSECTION",
            OperationKind::Difference => "DIFFERENCE",
            OperationKind::Symdiff => "SYMMETRIC DIFFERENCE",
            OperationKind::Expression => "EXPRESSION",
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, OperationKind::Difference | OperationKind::Symdiff)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = SetlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SetlabError::UnknownOperation(s.to_string()))
    }
}

/// The operation as selected by a user, before the expression is parsed
///
/// Workspaces and project files store this form so that an invalid expression can be
/// kept, saved and corrected later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationChoice {
    pub kind: OperationKind,
    pub first: Label,
    pub second: Label,
    pub expression: String,
}

impl OperationChoice {
    pub fn new(kind: OperationKind) -> Self {
        OperationChoice {
            kind,
            ..Self::default()
        }
    }

    pub fn expression(source: impl Into<String>) -> Self {
        OperationChoice {
            kind: OperationKind::Expression,
            expression: source.into(),
            ..Self::default()
        }
    }

    pub fn with_operands(mut self, first: Label, second: Label) -> Self {
        self.first = first;
        self.second = second;
        self
    }

    /// Turn the choice into an evaluable operation
    pub fn resolve(&self) -> Result<Operation, ExpressionError> {
        Ok(match self.kind {
            OperationKind::Union => Operation::Union,
            OperationKind::Intersection => Operation::Intersection,
            OperationKind::Difference => Operation::Difference {
                first: self.first,
                second: self.second,
            },
            OperationKind::Symdiff => Operation::SymmetricDifference {
                first: self.first,
                second: self.second,
            },
            OperationKind::Expression => Operation::expression(&self.expression)?,
        })
    }
}

impl Default for OperationChoice {
    fn default() -> Self {
        OperationChoice {
            kind: OperationKind::Union,
            first: Label::A,
            second: Label::B,
            expression: String::new(),
        }
    }
}
