//! Validate sift expressions without evaluating them

use crate::{OperandKind, Parser, typecheck};

use super::{CliError, build_context};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to validate
    pub expression: String,
    /// Sample JSON record supplying field types
    pub record: Option<String>,
    /// Fields to treat as numeric
    pub numeric: Vec<String>,
    /// Only validate syntax, skip type checking
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Syntax and types are valid; the expression produces this kind
    Typed(OperandKind),
}

/// Execute a sift check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expr = Parser::from_source(&options.expression).parse()?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let ctx = build_context(options.record.as_deref(), &options.numeric)?;
    let kind = typecheck::check(&expr, &ctx)?;
    Ok(CheckResult::Typed(kind))
}
