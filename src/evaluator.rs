use std::cmp::Ordering;

use regex::RegexBuilder;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use tracing::{debug, trace};

use crate::{
    ast::{BinOp, Expr},
    context::EvalContext,
    value::{Operand, OperandKind},
};

/// Knobs that change how an expression is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalOptions {
    /// Reject numeric fields whose text is not a number instead of reading
    /// them as `0`.
    pub strict_numbers: bool,
}

/// Evaluates parsed filter expressions against a record.
///
/// The evaluator holds no per-record state; the record is borrowed for the
/// duration of one [`Evaluator::evaluate`] call, so one evaluator and one
/// context can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

/// Errors that can occur during expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Operator applied to operands of a kind it does not support
    TypeError(String),

    /// Division by zero
    DivisionByZero,

    /// Right-hand side of `=~` is not a valid regular expression
    InvalidPattern(String),

    /// Numeric field holding non-numeric text (strict mode only)
    InvalidNumber { field: String, text: String },
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::InvalidPattern(msg) => write!(f, "Invalid pattern: {}", msg),
            EvalError::InvalidNumber { field, text } => {
                write!(f, "Field '{}' is numeric but holds '{}'", field, text)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Returns a human-readable type name for an Operand
fn type_name(v: &Operand) -> &'static str {
    match v.kind() {
        OperandKind::Num => "number",
        OperandKind::Str => "string",
    }
}

/// Longest string a repetition may produce (1 GiB).
pub const MAX_REPEAT_LEN: usize = 1 << 30;

/// Converts `x` to a decimal only when the decimal keeps its value; tiny
/// magnitudes that `Decimal` would round away stay in `f64`.
fn to_decimal(x: f64) -> Option<Decimal> {
    let d = Decimal::from_f64(x)?;
    let back = d.to_f64()?;
    if (back - x).abs() > x.abs() * 1e-12 {
        return None;
    }
    Some(d)
}

/// Applies `op` in decimal arithmetic, so results such as `0.1 + 0.2` come
/// out exact. Falls back to `fallback` when either side has no faithful
/// decimal form or the decimal operation overflows.
fn decimal_arith(
    a: f64,
    b: f64,
    op: fn(Decimal, Decimal) -> Option<Decimal>,
    fallback: fn(f64, f64) -> f64,
) -> f64 {
    if let Some(ad) = to_decimal(a)
        && let Some(bd) = to_decimal(b)
        && let Some(rd) = op(ad, bd)
        && let Some(r) = rd.to_f64()
    {
        return r;
    }
    fallback(a, b)
}

fn repeat_text(s: &str, times: f64) -> Result<Operand, EvalError> {
    let count = if times >= 1.0 { times.floor() as usize } else { 0 };
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(Operand::Text(s.repeat(count))),
        _ => Err(EvalError::TypeError(format!(
            "Cannot repeat string {} times",
            times
        ))),
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Evaluator { options }
    }

    /// Evaluates an expression against one record.
    ///
    /// Both sides of every operator are evaluated before the operator is
    /// applied, including `and` and `or`, so an error anywhere in the
    /// expression fails the whole call.
    ///
    /// # Examples
    ///
    /// ```
    /// use sift_lang::{EvalContext, Evaluator, FieldType, Operand, Parser};
    ///
    /// let ctx = EvalContext::new()
    ///     .with_field("amt", "99.00", FieldType::Numeric)
    ///     .with_value("cat", "grocery");
    ///
    /// let expr = Parser::from_source(r#"amt >= 100.0 or cat = "grocery""#)
    ///     .parse()
    ///     .unwrap();
    ///
    /// let result = Evaluator::new().evaluate(&expr, &ctx).unwrap();
    /// assert_eq!(result, Operand::TRUE);
    /// ```
    pub fn evaluate(&self, expr: &Expr, ctx: &EvalContext) -> Result<Operand, EvalError> {
        let result = self.eval_expr(expr, ctx)?;
        debug!(kind = %result.kind(), value = %result, "evaluated expression");
        Ok(result)
    }

    fn eval_expr(&self, expr: &Expr, ctx: &EvalContext) -> Result<Operand, EvalError> {
        match expr {
            Expr::Number(n) => Ok(Operand::Number(*n)),
            Expr::String(s) => Ok(Operand::Text(s.clone())),
            Expr::Field(name) => self.field(name, ctx),
            Expr::Negate(inner) => match self.eval_expr(inner, ctx)? {
                Operand::Number(n) => Ok(Operand::Number(-n)),
                Operand::Text(s) => Err(EvalError::TypeError(format!(
                    "Cannot negate string '{}'",
                    s
                ))),
            },
            Expr::Plus(inner) => match self.eval_expr(inner, ctx)? {
                n @ Operand::Number(_) => Ok(n),
                Operand::Text(s) => Err(EvalError::TypeError(format!(
                    "Cannot apply unary plus to string '{}'",
                    s
                ))),
            },
            Expr::BinaryOp { op, left, right } => {
                let left_val = self.eval_expr(left, ctx)?;
                let right_val = self.eval_expr(right, ctx)?;
                self.apply_binop(*op, &left_val, &right_val)
            }
        }
    }

    fn field(&self, name: &str, ctx: &EvalContext) -> Result<Operand, EvalError> {
        let Some(text) = ctx.value(name) else {
            trace!(field = name, "field not in record");
            return Ok(Operand::Text(String::new()));
        };

        if !ctx.is_numeric(name) {
            return Ok(Operand::Text(text.to_string()));
        }

        match text.parse::<f64>() {
            Ok(n) => Ok(Operand::Number(n)),
            Err(_) if self.options.strict_numbers => Err(EvalError::InvalidNumber {
                field: name.to_string(),
                text: text.to_string(),
            }),
            Err(_) => {
                trace!(field = name, text, "non-numeric text in numeric field read as 0");
                Ok(Operand::Number(0.0))
            }
        }
    }

    fn apply_binop(&self, op: BinOp, left: &Operand, right: &Operand) -> Result<Operand, EvalError> {
        match op {
            BinOp::Add => match (left, right) {
                (Operand::Number(a), Operand::Number(b)) => Ok(Operand::Number(decimal_arith(
                    *a,
                    *b,
                    Decimal::checked_add,
                    |a, b| a + b,
                ))),
                (a, b) => Ok(Operand::Text(format!("{}{}", a, b))),
            },
            BinOp::Subtract => match (left, right) {
                (Operand::Number(a), Operand::Number(b)) => Ok(Operand::Number(decimal_arith(
                    *a,
                    *b,
                    Decimal::checked_sub,
                    |a, b| a - b,
                ))),
                (a, b) => Err(EvalError::TypeError(format!(
                    "Cannot subtract {} from {}",
                    type_name(b),
                    type_name(a)
                ))),
            },
            BinOp::Multiply => match (left, right) {
                (Operand::Text(s), Operand::Number(n)) => repeat_text(s, *n),
                (Operand::Number(a), Operand::Number(b)) => Ok(Operand::Number(decimal_arith(
                    *a,
                    *b,
                    Decimal::checked_mul,
                    |a, b| a * b,
                ))),
                (a, b) => Err(EvalError::TypeError(format!(
                    "Cannot multiply {} by {}",
                    type_name(a),
                    type_name(b)
                ))),
            },
            BinOp::Divide => match (left, right) {
                (_, Operand::Text(_)) => Err(EvalError::TypeError(format!(
                    "Cannot divide {} by string",
                    type_name(left)
                ))),
                (_, Operand::Number(b)) if *b == 0.0 => Err(EvalError::DivisionByZero),
                (Operand::Text(_), _) => Err(EvalError::TypeError(
                    "Cannot do division on string".to_string(),
                )),
                (Operand::Number(a), Operand::Number(b)) => Ok(Operand::Number(decimal_arith(
                    *a,
                    *b,
                    Decimal::checked_div,
                    |a, b| a / b,
                ))),
            },
            BinOp::And => Ok(Operand::from_bool(left.is_truthy() && right.is_truthy())),
            BinOp::Or => Ok(Operand::from_bool(left.is_truthy() || right.is_truthy())),
            cmp => self.compare(cmp, left, right),
        }
    }

    fn compare(&self, op: BinOp, left: &Operand, right: &Operand) -> Result<Operand, EvalError> {
        if left.kind() != right.kind() {
            return Err(EvalError::TypeError(format!(
                "Cannot compare {} {} {}",
                type_name(left),
                op,
                type_name(right)
            )));
        }

        if op == BinOp::Matches {
            let pattern = right.as_text();
            let re = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| EvalError::InvalidPattern(e.to_string()))?;
            return Ok(Operand::from_bool(re.is_match(&left.as_text())));
        }

        let ordering = match (left, right) {
            (Operand::Number(a), Operand::Number(b)) => a.partial_cmp(b),
            (Operand::Text(a), Operand::Text(b)) => Some(a.cmp(b)),
            _ => unreachable!("operand kinds checked above"),
        };

        // NaN compares unequal to everything
        let result = match ordering {
            Some(ord) => match op {
                BinOp::Equal => ord == Ordering::Equal,
                BinOp::NotEqual => ord != Ordering::Equal,
                BinOp::LessThan => ord == Ordering::Less,
                BinOp::GreaterThan => ord == Ordering::Greater,
                BinOp::LessEqual => ord != Ordering::Greater,
                BinOp::GreaterEqual => ord != Ordering::Less,
                other => {
                    return Err(EvalError::TypeError(format!(
                        "'{}' is not a comparison",
                        other
                    )));
                }
            },
            None => op == BinOp::NotEqual,
        };
        Ok(Operand::from_bool(result))
    }
}
