use std::fmt;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Comparison
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Gte,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Lte,
    /// Equality (`=`)
    Eq,
    /// Case-insensitive pattern match (`=~`)
    ///
    /// # Examples
    /// ```text
    /// body =~ "todo"
    /// ```
    RegEq,
    /// Inequality (`<>`)
    Ne,

    // Delimiters
    /// Left parenthesis, for grouping conditions or arithmetic
    LParen,
    /// Right parenthesis
    RParen,

    // Arithmetic
    /// Addition, concatenation or unary plus
    Plus,
    /// Subtraction or unary minus
    Minus,
    /// Multiplication or string repetition
    Mult,
    /// Division
    Div,

    // Logical
    /// Logical AND (word, not symbol)
    ///
    /// # Examples
    /// ```text
    /// amt > 10 and cat = "grocery"
    /// ```
    And,
    /// Logical OR (word, not symbol)
    Or,

    // Literals and names
    /// Number literal: digits with at most one decimal point
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 100.0
    /// ```
    Num,
    /// String literal in single or double quotes
    ///
    /// # Examples
    /// ```text
    /// "grocery"
    /// 'household'
    /// ```
    Str,
    /// Field name
    ///
    /// Starts with a letter, followed by letters, digits, or underscores.
    Ident,

    /// A character no other rule matched. Left for the parser to reject.
    Undef,
}

impl TokenKind {
    /// Upper-case name used in diagnostics and the `tokens` listing.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Gt => "GT",
            TokenKind::Gte => "GTE",
            TokenKind::Lt => "LT",
            TokenKind::Lte => "LTE",
            TokenKind::Eq => "EQ",
            TokenKind::RegEq => "REG_EQ",
            TokenKind::Ne => "NE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mult => "MULT",
            TokenKind::Div => "DIV",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Num => "NUM",
            TokenKind::Str => "STR",
            TokenKind::Ident => "IDENT",
            TokenKind::Undef => "UNDEF",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::Gt
                | TokenKind::Gte
                | TokenKind::Lt
                | TokenKind::Lte
                | TokenKind::Eq
                | TokenKind::RegEq
                | TokenKind::Ne
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or)
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Mult | TokenKind::Div
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexical token: its kind and the exact source text it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Token {
            kind,
            literal: literal.into(),
        }
    }

    /// Contents of a string literal with its quotes removed.
    ///
    /// The closing quote is only stripped when the literal was terminated;
    /// an unterminated literal keeps everything after the opening quote.
    /// For other kinds this is the literal itself.
    pub fn string_value(&self) -> &str {
        if self.kind != TokenKind::Str {
            return &self.literal;
        }
        let mut chars = self.literal.chars();
        let Some(quote) = chars.next() else {
            return "";
        };
        let body = chars.as_str();
        body.strip_suffix(quote).unwrap_or(body)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.literal)
    }
}
