use std::fmt::{self, Display, Formatter};

use scanner::{Literal, Token};

/// An expression tree. Every node owns its children; trees are built bottom-up by the parser
/// and never mutated afterwards.
///
/// Operations over the tree (printing, evaluation) are written as exhaustive matches on this
/// enum, so a new operation never touches the variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary { left: Box<Expr>, operator: Token, right: Box<Expr> },
    Grouping(Box<Expr>),
    Unary { operator: Token, right: Box<Expr> },
    Literal(LiteralValue),
}

impl Expr {
    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn grouping(expression: Expr) -> Self {
        Expr::Grouping(Box::new(expression))
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary { operator, right: Box::new(right) }
    }
}

/// Renders the tree in fully parenthesized prefix form, e.g. `(* (- 123) (group 45.67))`.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
            Expr::Unary { operator, right } => {
                write!(f, "({} {})", operator, right)
            }
            Expr::Literal(value) => {
                write!(f, "{}", value)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    Boolean(bool),
    Nil,
}

impl From<Literal> for LiteralValue {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Number(n) => LiteralValue::Number(n),
            Literal::Str(s) => LiteralValue::Str(s),
        }
    }
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Str(s) => write!(f, "{}", s),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}
