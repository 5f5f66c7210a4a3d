//! Turning CLI record arguments into an evaluation context

use crate::{EvalContext, FieldType};

use super::CliError;

/// Builds the context for a JSON record string, then marks every field in
/// `numeric` as numeric regardless of how it appeared in the record.
pub fn build_context(record: Option<&str>, numeric: &[String]) -> Result<EvalContext, CliError> {
    let mut ctx = match record {
        Some(json) => {
            let value: serde_json::Value = serde_json::from_str(json)?;
            EvalContext::from_json(&value)?
        }
        None => EvalContext::new(),
    };
    ctx.declare_all(numeric.iter().cloned(), FieldType::Numeric);
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_override() {
        let ctx = build_context(Some(r#"{"age": "41"}"#), &["age".to_string()]).unwrap();
        assert!(ctx.is_numeric("age"));
        assert_eq!(ctx.value("age"), Some("41"));
    }

    #[test]
    fn bad_json() {
        assert!(matches!(
            build_context(Some("{not json"), &[]),
            Err(CliError::Json(_))
        ));
    }
}
