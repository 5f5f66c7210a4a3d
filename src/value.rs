use std::fmt;

/// The kind of an [`Operand`], as reported in diagnostics and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    Num,
    Str,
}

impl OperandKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperandKind::Num => "NUM",
            OperandKind::Str => "STR",
        }
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value produced while evaluating a filter expression.
///
/// There is no boolean type: comparisons and logical operators produce
/// `Number(1.0)` for true and `Number(0.0)` for false.
///
/// Numbers display in their shortest form, and negative zero displays as
/// `0`. A numeric field holding `"99.00"` therefore concatenates and matches
/// `=~` as `99`; declare the field as a string to work with its raw text.
///
/// # Examples
///
/// ```
/// use sift_lang::Operand;
///
/// let yes = Operand::from_bool(true);
/// assert_eq!(yes.to_string(), "1");
/// assert!(yes.is_truthy());
///
/// let text = Operand::Text("0".to_string());
/// assert!(!text.is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// 64-bit floating point number
    Number(f64),

    /// UTF-8 string
    Text(String),
}

impl Operand {
    pub const TRUE: Operand = Operand::Number(1.0);
    pub const FALSE: Operand = Operand::Number(0.0);

    pub fn from_bool(b: bool) -> Self {
        if b { Operand::TRUE } else { Operand::FALSE }
    }

    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Number(_) => OperandKind::Num,
            Operand::Text(_) => OperandKind::Str,
        }
    }

    /// A value is true unless its text is exactly `"0"`.
    ///
    /// The only numbers displaying as `"0"` are `0.0` and `-0.0`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Operand::Number(n) => *n != 0.0,
            Operand::Text(s) => s != "0",
        }
    }

    /// Text of the value: strings as-is, numbers in their shortest form.
    pub fn as_text(&self) -> String {
        match self {
            Operand::Number(_) => self.to_string(),
            Operand::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) if *n == 0.0 => f.write_str("0"),
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Operand::Number(n)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Text(s.to_string())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Text(s)
    }
}
