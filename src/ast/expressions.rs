use std::fmt;

use crate::ast::BinOp;

/// Abstract Syntax Tree node representing a parsed filter expression.
///
/// The parser builds the whole tree before anything is evaluated, so an
/// expression can be checked statically or evaluated any number of times
/// against different records.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Number literal
    ///
    /// # Example
    /// ```text
    /// 75.0
    /// ```
    Number(f64),

    /// String literal, quotes removed
    ///
    /// # Example
    /// ```text
    /// "grocery"
    /// ```
    String(String),

    // References
    /// Record field reference
    ///
    /// # Example
    /// ```text
    /// amt
    /// ```
    Field(String),

    // Operations
    /// Unary minus, applied to the first term of an expression
    ///
    /// # Example
    /// ```text
    /// -amt + 10
    /// ```
    Negate(Box<Expr>),

    /// Unary plus
    Plus(Box<Expr>),

    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Renders the tree fully parenthesized, which is handy in debug logs.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::String(s) => write!(f, "{:?}", s),
            Expr::Field(name) => f.write_str(name),
            Expr::Negate(inner) => write!(f, "(-{})", inner),
            Expr::Plus(inner) => write!(f, "(+{})", inner),
            Expr::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
