//! Static kind inference over a parsed expression.
//!
//! Field kinds come from the context's declared types, so type errors can be
//! reported before any record is evaluated. Errors that depend on runtime
//! values (division by zero, bad patterns, malformed numbers) are left to the
//! evaluator.

use crate::{
    ast::{BinOp, Expr},
    context::EvalContext,
    evaluator::EvalError,
    value::OperandKind,
};

fn kind_name(kind: OperandKind) -> &'static str {
    match kind {
        OperandKind::Num => "number",
        OperandKind::Str => "string",
    }
}

/// Infers the kind `expr` evaluates to, or the type error evaluating it
/// would raise.
///
/// # Examples
///
/// ```
/// use sift_lang::{EvalContext, FieldType, OperandKind, Parser, typecheck};
///
/// let ctx = EvalContext::new().declare("amt", FieldType::Numeric);
///
/// let ok = Parser::from_source("amt * 2 > 10").parse().unwrap();
/// assert_eq!(typecheck::check(&ok, &ctx), Ok(OperandKind::Num));
///
/// let bad = Parser::from_source(r#"amt = "ten""#).parse().unwrap();
/// assert!(typecheck::check(&bad, &ctx).is_err());
/// ```
pub fn check(expr: &Expr, ctx: &EvalContext) -> Result<OperandKind, EvalError> {
    match expr {
        Expr::Number(_) => Ok(OperandKind::Num),
        Expr::String(_) => Ok(OperandKind::Str),
        Expr::Field(name) if ctx.is_numeric(name) => Ok(OperandKind::Num),
        Expr::Field(_) => Ok(OperandKind::Str),
        Expr::Negate(inner) | Expr::Plus(inner) => match check(inner, ctx)? {
            OperandKind::Num => Ok(OperandKind::Num),
            OperandKind::Str => Err(EvalError::TypeError(
                "Cannot apply a sign to a string".to_string(),
            )),
        },
        Expr::BinaryOp { op, left, right } => {
            let l = check(left, ctx)?;
            let r = check(right, ctx)?;
            check_binop(*op, l, r)
        }
    }
}

fn check_binop(op: BinOp, l: OperandKind, r: OperandKind) -> Result<OperandKind, EvalError> {
    use OperandKind::{Num, Str};

    match op {
        BinOp::Add if l == Str || r == Str => Ok(Str),
        BinOp::Add => Ok(Num),
        BinOp::Subtract => match (l, r) {
            (Num, Num) => Ok(Num),
            _ => Err(EvalError::TypeError(format!(
                "Cannot subtract {} from {}",
                kind_name(r),
                kind_name(l)
            ))),
        },
        BinOp::Multiply => match (l, r) {
            (Str, Num) => Ok(Str),
            (Num, Num) => Ok(Num),
            _ => Err(EvalError::TypeError(format!(
                "Cannot multiply {} by {}",
                kind_name(l),
                kind_name(r)
            ))),
        },
        BinOp::Divide => match (l, r) {
            (Num, Num) => Ok(Num),
            (_, Str) => Err(EvalError::TypeError(format!(
                "Cannot divide {} by string",
                kind_name(l)
            ))),
            (Str, _) => Err(EvalError::TypeError(
                "Cannot do division on string".to_string(),
            )),
        },
        BinOp::And | BinOp::Or => Ok(Num),
        cmp if l != r => Err(EvalError::TypeError(format!(
            "Cannot compare {} {} {}",
            kind_name(l),
            cmp,
            kind_name(r)
        ))),
        _ => Ok(Num),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{context::FieldType, parser::Parser};

    fn kind_of(src: &str, ctx: &EvalContext) -> Result<OperandKind, EvalError> {
        let expr = Parser::from_source(src).parse().unwrap();
        check(&expr, ctx)
    }

    #[test]
    fn string_arithmetic() {
        let ctx = EvalContext::new();
        assert_eq!(kind_of(r#""ab" * 3"#, &ctx), Ok(OperandKind::Str));
        assert_eq!(kind_of(r#"title + 1"#, &ctx), Ok(OperandKind::Str));
        assert!(kind_of(r#"3 * "ab""#, &ctx).is_err());
        assert!(kind_of(r#"-title"#, &ctx).is_err());
    }

    #[test]
    fn division_by_zero_is_not_static() {
        let ctx = EvalContext::new().declare("amt", FieldType::Numeric);
        assert_eq!(kind_of("amt / 0", &ctx), Ok(OperandKind::Num));
    }

    #[test]
    fn mismatch_inside_logic() {
        let ctx = EvalContext::new().declare("amt", FieldType::Numeric);
        let err = kind_of(r#"cat = "x" or amt = "5""#, &ctx).unwrap_err();
        assert_eq!(
            err,
            EvalError::TypeError("Cannot compare number = string".to_string())
        );
    }
}
