//! Expression tree

use crate::setlab::elements::ElementSet;
use std::fmt;

/// The four binary set operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Union => "∪",
            BinaryOp::Intersection => "∩",
            BinaryOp::Difference => "\\",
            BinaryOp::SymmetricDifference => "Δ",
        }
    }

    /// Binding strength; intersection binds tighter than the other three
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Intersection => 2,
            BinaryOp::Union | BinaryOp::Difference | BinaryOp::SymmetricDifference => 1,
        }
    }

    pub fn apply(self, lhs: &ElementSet, rhs: &ElementSet) -> ElementSet {
        match self {
            BinaryOp::Union => lhs.union(rhs).cloned().collect(),
            BinaryOp::Intersection => lhs.intersection(rhs).cloned().collect(),
            BinaryOp::Difference => lhs.difference(rhs).cloned().collect(),
            BinaryOp::SymmetricDifference => lhs.symmetric_difference(rhs).cloned().collect(),
        }
    }
}

/// A parsed set expression
///
/// Runs of operators at one precedence level are stored flat, so `A ∪ B ∪ C ∪ …` is a
/// single [`SetExpr::Chain`] however long it is. Only parentheses add depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetExpr {
    /// Reference to a named set
    Set(String),
    /// `first op₁ x₁ op₂ x₂ …`, applied left to right; every op shares one precedence
    Chain {
        first: Box<SetExpr>,
        rest: Vec<(BinaryOp, SetExpr)>,
    },
}

impl SetExpr {
    pub fn set(name: impl Into<String>) -> Self {
        SetExpr::Set(name.into())
    }

    /// `lhs op rhs`; extends `lhs` in place when it is a chain at the same level
    pub fn binary(op: BinaryOp, lhs: SetExpr, rhs: SetExpr) -> Self {
        match lhs {
            SetExpr::Chain { first, mut rest }
                if rest
                    .first()
                    .is_some_and(|(chained, _)| chained.precedence() == op.precedence()) =>
            {
                rest.push((op, rhs));
                SetExpr::Chain { first, rest }
            }
            lhs => SetExpr::Chain {
                first: Box::new(lhs),
                rest: vec![(op, rhs)],
            },
        }
    }

    /// Set names referenced by the expression, in order of first appearance
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            SetExpr::Set(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            SetExpr::Chain { first, rest } => {
                first.collect_names(names);
                for (_, operand) in rest {
                    operand.collect_names(names);
                }
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            SetExpr::Set(_) => u8::MAX,
            SetExpr::Chain { rest, .. } => rest
                .first()
                .map_or(u8::MAX, |(op, _)| op.precedence()),
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>, level: u8) -> fmt::Result {
        // Left to right at one level: an operand at the same level needs grouping
        if self.precedence() <= level {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Prints the expression with the minimal parentheses needed to reparse it
impl fmt::Display for SetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetExpr::Set(name) => write!(f, "{name}"),
            SetExpr::Chain { first, rest } => {
                let level = self.precedence();
                first.write_operand(f, level)?;
                for (op, operand) in rest {
                    write!(f, " {} ", op.symbol())?;
                    operand.write_operand(f, level)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> ElementSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_apply_operators() {
        let a = set(&["1", "2", "3"]);
        let b = set(&["2", "3", "4"]);
        assert_eq!(BinaryOp::Union.apply(&a, &b), set(&["1", "2", "3", "4"]));
        assert_eq!(BinaryOp::Intersection.apply(&a, &b), set(&["2", "3"]));
        assert_eq!(BinaryOp::Difference.apply(&a, &b), set(&["1"]));
        assert_eq!(BinaryOp::SymmetricDifference.apply(&a, &b), set(&["1", "4"]));
    }

    #[test]
    fn test_display_minimal_parentheses() {
        let expr = SetExpr::binary(
            BinaryOp::Intersection,
            SetExpr::set("A"),
            SetExpr::binary(BinaryOp::Union, SetExpr::set("B"), SetExpr::set("A")),
        );
        assert_eq!(expr.to_string(), "A ∩ (B ∪ A)");

        let left_nested = SetExpr::binary(
            BinaryOp::Difference,
            SetExpr::binary(BinaryOp::Difference, SetExpr::set("A"), SetExpr::set("B")),
            SetExpr::set("C"),
        );
        assert_eq!(left_nested.to_string(), "A \\ B \\ C");

        let right_nested = SetExpr::binary(
            BinaryOp::Difference,
            SetExpr::set("A"),
            SetExpr::binary(BinaryOp::Difference, SetExpr::set("B"), SetExpr::set("C")),
        );
        assert_eq!(right_nested.to_string(), "A \\ (B \\ C)");
    }

    #[test]
    fn test_names_in_order_without_duplicates() {
        let expr = SetExpr::binary(
            BinaryOp::Union,
            SetExpr::binary(BinaryOp::Intersection, SetExpr::set("B"), SetExpr::set("A")),
            SetExpr::set("B"),
        );
        assert_eq!(expr.names(), vec!["B", "A"]);
    }

    #[test]
    fn test_same_level_operators_extend_one_chain() {
        let mut expr = SetExpr::set("A");
        for op in [BinaryOp::Union, BinaryOp::Difference, BinaryOp::SymmetricDifference] {
            expr = SetExpr::binary(op, expr, SetExpr::set("B"));
        }
        let SetExpr::Chain { first, rest } = &expr else {
            panic!("expected a chain, got {expr:?}");
        };
        assert_eq!(**first, SetExpr::set("A"));
        assert_eq!(rest.len(), 3);
        assert_eq!(expr.to_string(), "A ∪ B \\ B Δ B");

        // A looser operator after a tighter run starts a new chain around it
        let mixed = SetExpr::binary(
            BinaryOp::Union,
            SetExpr::binary(BinaryOp::Intersection, SetExpr::set("A"), SetExpr::set("B")),
            SetExpr::set("C"),
        );
        assert_eq!(mixed.to_string(), "A ∩ B ∪ C");
        let SetExpr::Chain { rest, .. } = &mixed else {
            panic!("expected a chain, got {mixed:?}");
        };
        assert_eq!(rest.len(), 1);
    }
}
