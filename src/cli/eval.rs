//! Evaluate one expression against one record

use crate::{EvalOptions, Operand, evaluate_with};

use super::{CliError, build_context};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON object whose fields the expression can reference
    pub record: Option<String>,
    /// Fields to treat as numeric
    pub numeric: Vec<String>,
    /// Fail on numeric fields holding non-numeric text
    pub strict_numbers: bool,
}

pub fn execute_eval(options: &RunOptions) -> Result<Operand, CliError> {
    let ctx = build_context(options.record.as_deref(), &options.numeric)?;
    let eval_options = EvalOptions {
        strict_numbers: options.strict_numbers,
    };
    Ok(evaluate_with(&options.expression, &ctx, eval_options)?)
}

/// Renders a result as bare text or as `{"kind": .., "value": ..}`.
pub fn format_operand(operand: &Operand, json: bool) -> String {
    if json {
        serde_json::json!({
            "kind": operand.kind().name(),
            "value": operand.to_string(),
        })
        .to_string()
    } else {
        operand.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_against_record() {
        let opts = RunOptions {
            expression: r#"amt >= 100.0 or cat = "grocery""#.to_string(),
            record: Some(r#"{"amt": 99.0, "cat": "grocery"}"#.to_string()),
            ..Default::default()
        };
        assert_eq!(execute_eval(&opts).unwrap(), Operand::TRUE);
    }

    #[test]
    fn strict_numbers_flag() {
        let mut opts = RunOptions {
            expression: "age + 1".to_string(),
            record: Some(r#"{"age": "forty"}"#.to_string()),
            numeric: vec!["age".to_string()],
            ..Default::default()
        };
        assert_eq!(execute_eval(&opts).unwrap(), Operand::Number(1.0));

        opts.strict_numbers = true;
        assert!(matches!(execute_eval(&opts), Err(CliError::Eval(_))));
    }

    #[test]
    fn json_output() {
        assert_eq!(
            format_operand(&Operand::TRUE, true),
            r#"{"kind":"NUM","value":"1"}"#
        );
        assert_eq!(format_operand(&Operand::from("foobar"), false), "foobar");
    }
}
