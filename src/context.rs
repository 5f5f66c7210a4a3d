//! The record an expression is evaluated against.

use std::collections::HashMap;
use std::fmt;

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    Numeric,
    #[default]
    String,
}

/// Errors building an [`EvalContext`] from JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextError {
    /// The record was not a JSON object
    NotAnObject,

    /// A field held an array or object
    UnsupportedValue { field: String },
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::NotAnObject => write!(f, "Record must be a JSON object"),
            ContextError::UnsupportedValue { field } => write!(
                f,
                "Field '{}' must be a number, string, boolean or null",
                field
            ),
        }
    }
}

impl std::error::Error for ContextError {}

/// Field values and declared field types for one record.
///
/// Values are kept as text; a field only becomes a number during evaluation,
/// and only when its declared type is [`FieldType::Numeric`]. Fields without
/// a declared type are strings.
///
/// # Examples
///
/// ```
/// use sift_lang::{EvalContext, FieldType};
///
/// let ctx = EvalContext::new()
///     .with_field("amt", "99.00", FieldType::Numeric)
///     .with_value("cat", "grocery");
///
/// assert_eq!(ctx.value("cat"), Some("grocery"));
/// assert_eq!(ctx.field_type("amt"), FieldType::Numeric);
/// assert_eq!(ctx.field_type("missing"), FieldType::String);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalContext {
    values: HashMap<String, String>,
    types: HashMap<String, FieldType>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from a field-to-text map and a field-to-type map.
    /// Fields missing from `types` are strings.
    pub fn from_maps(values: HashMap<String, String>, types: HashMap<String, FieldType>) -> Self {
        EvalContext { values, types }
    }

    /// Builds a context from a JSON object record.
    ///
    /// Numbers become numeric fields, strings become string fields, booleans
    /// become the strings `"true"`/`"false"`, and `null` leaves the field out.
    pub fn from_json(record: &serde_json::Value) -> Result<Self, ContextError> {
        let obj = record.as_object().ok_or(ContextError::NotAnObject)?;
        let mut ctx = EvalContext::new();

        for (name, value) in obj {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Number(n) => {
                    ctx.insert(name, n.to_string(), FieldType::Numeric);
                }
                serde_json::Value::String(s) => {
                    ctx.insert(name, s.clone(), FieldType::String);
                }
                serde_json::Value::Bool(b) => {
                    ctx.insert(name, b.to_string(), FieldType::String);
                }
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(ContextError::UnsupportedValue {
                        field: name.clone(),
                    });
                }
            }
        }
        Ok(ctx)
    }

    /// Adds a field with the default string type.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        self.insert(name, value, field_type);
        self
    }

    /// Declares a field's type without giving it a value.
    pub fn declare(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.types.insert(name.into(), field_type);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        field_type: FieldType,
    ) {
        let name = name.into();
        self.types.insert(name.clone(), field_type);
        self.values.insert(name, value.into());
    }

    /// Overrides the type of every listed field.
    pub fn declare_all<I, S>(&mut self, names: I, field_type: FieldType)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.types.insert(name.into(), field_type);
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn field_type(&self, name: &str) -> FieldType {
        self.types.get(name).copied().unwrap_or_default()
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.field_type(name) == FieldType::Numeric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_two_maps() {
        let values = HashMap::from([
            ("amt".to_string(), "99.00".to_string()),
            ("cat".to_string(), "grocery".to_string()),
        ]);
        let types = HashMap::from([
            ("amt".to_string(), FieldType::Numeric),
            ("limit".to_string(), FieldType::Numeric),
        ]);
        let ctx = EvalContext::from_maps(values, types);

        assert_eq!(ctx.value("amt"), Some("99.00"));
        assert!(ctx.is_numeric("amt"));
        assert_eq!(ctx.field_type("cat"), FieldType::String);
        assert!(ctx.is_numeric("limit"));
        assert_eq!(ctx.value("limit"), None);
    }

    #[test]
    fn json_record_types() {
        let ctx = EvalContext::from_json(&json!({
            "amt": 99.5,
            "cat": "grocery",
            "paid": true,
            "note": null,
        }))
        .unwrap();

        assert_eq!(ctx.value("amt"), Some("99.5"));
        assert!(ctx.is_numeric("amt"));
        assert_eq!(ctx.value("cat"), Some("grocery"));
        assert!(!ctx.is_numeric("cat"));
        assert_eq!(ctx.value("paid"), Some("true"));
        assert_eq!(ctx.value("note"), None);
    }

    #[test]
    fn json_record_rejects_nesting() {
        let err = EvalContext::from_json(&json!({"tags": ["a", "b"]})).unwrap_err();
        assert_eq!(
            err,
            ContextError::UnsupportedValue {
                field: "tags".to_string()
            }
        );
        assert_eq!(
            EvalContext::from_json(&json!([1, 2])).unwrap_err(),
            ContextError::NotAnObject
        );
    }

    #[test]
    fn declared_type_overrides() {
        let mut ctx = EvalContext::new().with_value("age", "41");
        assert!(!ctx.is_numeric("age"));
        ctx.declare_all(["age"], FieldType::Numeric);
        assert!(ctx.is_numeric("age"));
    }
}
