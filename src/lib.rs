pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod context;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod typecheck;
pub mod value;

use std::fmt;

pub use ast::{BinOp, Expr, Token, TokenKind};
pub use context::{ContextError, EvalContext, FieldType};
pub use evaluator::{EvalError, EvalOptions, Evaluator};
pub use lexer::{Lexer, TokenStream};
pub use parser::{MAX_NESTING, ParseError, Parser};
pub use value::{Operand, OperandKind};

/// Either stage of [`evaluate`] failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Eval(e) => write!(f, "Evaluation error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Eval(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Eval(e)
    }
}

/// Tokenizes, parses and evaluates `source` against `ctx` with default
/// options.
///
/// # Examples
///
/// ```
/// use sift_lang::{EvalContext, Operand, evaluate};
///
/// let result = evaluate(r#""foo" + "bar""#, &EvalContext::new()).unwrap();
/// assert_eq!(result, Operand::Text("foobar".to_string()));
/// ```
pub fn evaluate(source: &str, ctx: &EvalContext) -> Result<Operand, Error> {
    evaluate_with(source, ctx, EvalOptions::default())
}

pub fn evaluate_with(source: &str, ctx: &EvalContext, options: EvalOptions) -> Result<Operand, Error> {
    let expr = Parser::from_source(source).parse()?;
    Ok(Evaluator::with_options(options).evaluate(&expr, ctx)?)
}
