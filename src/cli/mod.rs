//! CLI support for sift
//!
//! Provides programmatic access to the `sift` subcommands so they can be
//! driven from tests or embedded in other tools.

mod check;
mod eval;
mod filter;
mod record;
mod tokens;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use eval::{RunOptions, execute_eval, format_operand};
pub use filter::{FilterOptions, FilterStats, run_filter};
pub use record::build_context;
pub use tokens::list_tokens;

use std::io;

use crate::ContextError;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Parser error
    Parse(crate::ParseError),
    /// Evaluation or type error
    Eval(crate::EvalError),
    /// Record could not be turned into fields
    Context(ContextError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No expression provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Parse(e) => write!(f, "Parse error: {}", e),
            CliError::Eval(e) => write!(f, "Evaluation error: {}", e),
            CliError::Context(e) => write!(f, "Invalid record: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(
                f,
                "No expression provided. Pass it as an argument or pipe it to stdin."
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Parse(e) => Some(e),
            CliError::Eval(e) => Some(e),
            CliError::Context(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoInput => None,
        }
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<crate::EvalError> for CliError {
    fn from(e: crate::EvalError) -> Self {
        CliError::Eval(e)
    }
}

impl From<crate::Error> for CliError {
    fn from(e: crate::Error) -> Self {
        match e {
            crate::Error::Parse(e) => CliError::Parse(e),
            crate::Error::Eval(e) => CliError::Eval(e),
        }
    }
}

impl From<ContextError> for CliError {
    fn from(e: ContextError) -> Self {
        CliError::Context(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
