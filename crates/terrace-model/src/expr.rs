//! Filter expressions.
//!
//! A minimal predicate language for overwrite-by-filter requests: column
//! references, literal values, and binary operations. The store only
//! interprets equality predicates joined by AND; everything else is
//! rejected at the matching stage rather than approximated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A binary operator in a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Equality.
    Eq,
    /// Inequality.
    NotEq,
    /// Less than.
    Lt,
    /// Less than or equal.
    LtEq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    GtEq,
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        };
        write!(f, "{}", op)
    }
}

/// A filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference by name.
    Column(String),
    /// Literal value.
    Literal(Value),
    /// Binary operation.
    BinaryOp {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
}

impl Expr {
    /// Creates a column reference.
    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    /// Creates a literal expression.
    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Combines two expressions with a binary operator.
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Builds `self = other`.
    pub fn eq(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOp::Eq, other)
    }

    /// Builds `self != other`.
    pub fn not_eq(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOp::NotEq, other)
    }

    /// Builds `self < other`.
    pub fn lt(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOp::Lt, other)
    }

    /// Builds `self > other`.
    pub fn gt(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOp::Gt, other)
    }

    /// Builds `self AND other`.
    pub fn and(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOp::And, other)
    }

    /// Builds `self OR other`.
    pub fn or(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOp::Or, other)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{}", name),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::BinaryOp { left, op, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_builders() {
        let expr = Expr::col("a").eq(Expr::lit(Value::int(1)));
        assert_eq!(
            expr,
            Expr::BinaryOp {
                left: Box::new(Expr::Column("a".to_string())),
                op: BinaryOp::Eq,
                right: Box::new(Expr::Literal(Value::Int(1))),
            }
        );
    }

    #[test]
    fn test_expr_and_chain() {
        let expr = Expr::col("a")
            .eq(Expr::lit(Value::int(1)))
            .and(Expr::col("b").eq(Expr::lit(Value::string("x"))));
        match expr {
            Expr::BinaryOp { op: BinaryOp::And, .. } => {}
            other => panic!("expected AND, got {:?}", other),
        }
    }

    #[test]
    fn test_expr_display() {
        let expr = Expr::col("a").eq(Expr::lit(Value::int(1)));
        assert_eq!(expr.to_string(), "(a = 1)");

        let expr = Expr::col("a").lt(Expr::lit(Value::int(5))).or(Expr::col("b").not_eq(Expr::lit(Value::Null)));
        assert_eq!(expr.to_string(), "((a < 5) OR (b != NULL))");
    }
}
