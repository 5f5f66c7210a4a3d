use std::fmt;

use tracing::debug;

use crate::{
    ast::{BinOp, Expr, Token, TokenKind},
    lexer::{Lexer, TokenStream},
};

/// Errors that can occur while parsing a token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A token of the wrong kind was found
    Expected {
        expected: String,
        found: Token,
        position: usize,
    },

    /// The input ended where more tokens were required
    UnexpectedEof { expected: String },

    /// The expression ended but tokens were left over
    TrailingTokens { found: Token, position: usize },

    /// A number literal could not be read as a number
    InvalidNumber { literal: String, position: usize },

    /// Parentheses nested deeper than [`MAX_NESTING`]
    TooDeep { position: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Expected {
                expected,
                found,
                position,
            } => write!(
                f,
                "{} expected, found {} '{}' at token {}",
                expected, found.kind, found.literal, position
            ),
            ParseError::UnexpectedEof { expected } => {
                write!(f, "{} expected, found end of input", expected)
            }
            ParseError::TrailingTokens { found, position } => write!(
                f,
                "Unexpected {} '{}' at token {} after end of expression",
                found.kind, found.literal, position
            ),
            ParseError::InvalidNumber { literal, position } => {
                write!(f, "Invalid number '{}' at token {}", literal, position)
            }
            ParseError::TooDeep { position } => write!(
                f,
                "Parentheses nested deeper than {} at token {}",
                MAX_NESTING, position
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Deepest parenthesis nesting the parser accepts.
pub const MAX_NESTING: usize = 128;

/// What a parenthesized group turned out to contain.
struct Group {
    /// Offset of the matching `)` from the `(`, if the group is closed
    close: Option<usize>,
    /// The group holds a comparison or `and`/`or`
    is_condition: bool,
}

/// Recursive descent parser for filter expressions.
///
/// Grammar, loosest rule first:
///
/// ```text
/// compoundCondition := condition ( (AND|OR) condition )*
/// condition         := LPAREN compoundCondition RPAREN
///                    | comparison ( (AND|OR) comparison )*
/// comparison        := expr ( cmpOp expr )?
/// expr              := (PLUS|MINUS)? exprTerm ( (PLUS|MINUS) exprTerm )*
/// exprTerm          := atom ( (MULT|DIV) atom )*
/// atom              := IDENT | NUM | STR | LPAREN (compoundCondition | expr) RPAREN
/// ```
pub struct Parser {
    tokens: TokenStream,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: TokenStream) -> Self {
        Parser { tokens, depth: 0 }
    }

    /// Tokenizes `source` and wraps the result in a parser.
    pub fn from_source(source: &str) -> Self {
        Parser::new(Lexer::new(source).tokenize())
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.peek().map(|t| t.kind)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn advance(&mut self) -> Option<Token> {
        self.tokens.advance().cloned()
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.tokens.peek() {
            Some(token) => ParseError::Expected {
                expected: expected.to_string(),
                found: token.clone(),
                position: self.tokens.position(),
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if !self.check(kind) {
            return Err(self.unexpected(kind.name()));
        }
        self.advance().ok_or_else(|| self.unexpected(kind.name()))
    }

    /// Consumes a `(` and records one more level of nesting.
    fn open_group(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep {
                position: self.tokens.position(),
            });
        }
        self.expect(TokenKind::LParen)?;
        self.depth += 1;
        Ok(())
    }

    fn close_group(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::RParen)?;
        self.depth -= 1;
        Ok(())
    }

    fn logical_op(&self) -> Option<BinOp> {
        match self.peek_kind()? {
            TokenKind::And => Some(BinOp::And),
            TokenKind::Or => Some(BinOp::Or),
            _ => None,
        }
    }

    fn comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind()? {
            TokenKind::Eq => Some(BinOp::Equal),
            TokenKind::Ne => Some(BinOp::NotEqual),
            TokenKind::Lt => Some(BinOp::LessThan),
            TokenKind::Gt => Some(BinOp::GreaterThan),
            TokenKind::Lte => Some(BinOp::LessEqual),
            TokenKind::Gte => Some(BinOp::GreaterEqual),
            TokenKind::RegEq => Some(BinOp::Matches),
            _ => None,
        }
    }

    /// Scans the group opened by the next token without consuming anything.
    fn scan_group(&self) -> Group {
        let mut depth = 0usize;
        let mut is_condition = false;
        let mut offset = 0;

        while let Some(token) = self.tokens.peek_nth(offset) {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Group {
                            close: Some(offset),
                            is_condition,
                        };
                    }
                }
                kind if kind.is_comparison() || kind.is_logical() => is_condition = true,
                _ => {}
            }
            offset += 1;
        }

        Group {
            close: None,
            is_condition,
        }
    }

    /// A `(` at condition scope opens a whole condition unless the group is
    /// arithmetic or is followed by more of an expression, as in
    /// `(a = 1) = (b = 1)`.
    fn starts_condition_group(&self) -> bool {
        if !self.check(TokenKind::LParen) {
            return false;
        }
        let group = self.scan_group();
        if !group.is_condition {
            return false;
        }
        match group.close {
            Some(close) => !self
                .tokens
                .peek_nth(close + 1)
                .is_some_and(|t| t.kind.is_arithmetic() || t.kind.is_comparison()),
            None => true,
        }
    }

    fn parse_compound_condition(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_condition()?;

        while let Some(op) = self.logical_op() {
            self.advance();
            let right = self.parse_condition()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        if self.starts_condition_group() {
            self.open_group()?;
            let inner = self.parse_compound_condition()?;
            self.close_group()?;
            return Ok(inner);
        }

        let mut left = self.parse_comparison()?;

        while let Some(op) = self.logical_op() {
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_expr()?;

        match self.comparison_op() {
            Some(op) => {
                self.advance();
                let right = self.parse_expr()?;
                Ok(Expr::binary(op, left, right))
            }
            None => Ok(left),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.advance();
                Expr::Negate(Box::new(self.parse_term()?))
            }
            Some(TokenKind::Plus) => {
                self.advance();
                Expr::Plus(Box::new(self.parse_term()?))
            }
            _ => self.parse_term()?,
        };

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Subtract,
                _ => break,
            };

            self.advance();
            let right = self.parse_term()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_atom()?;

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Mult) => BinOp::Multiply,
                Some(TokenKind::Div) => BinOp::Divide,
                _ => break,
            };

            self.advance();
            let right = self.parse_atom()?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        const EXPECTED: &str = "field, number or string";

        let position = self.tokens.position();
        match self.peek_kind() {
            Some(TokenKind::Ident) => {
                let token = self.expect(TokenKind::Ident)?;
                Ok(Expr::Field(token.literal))
            }
            Some(TokenKind::Num) => {
                let token = self.expect(TokenKind::Num)?;
                token
                    .literal
                    .parse::<f64>()
                    .map(Expr::Number)
                    .map_err(|_| ParseError::InvalidNumber {
                        literal: token.literal.clone(),
                        position,
                    })
            }
            Some(TokenKind::Str) => {
                let token = self.expect(TokenKind::Str)?;
                Ok(Expr::String(token.string_value().to_string()))
            }
            Some(TokenKind::LParen) => {
                let is_condition = self.scan_group().is_condition;
                self.open_group()?;
                let inner = if is_condition {
                    self.parse_compound_condition()?
                } else {
                    self.parse_expr()?
                };
                self.close_group()?;
                Ok(inner)
            }
            _ => Err(self.unexpected(EXPECTED)),
        }
    }

    /// Parses the whole token stream as one filter expression.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_compound_condition()?;

        if let Some(token) = self.tokens.peek() {
            return Err(ParseError::TrailingTokens {
                found: token.clone(),
                position: self.tokens.position(),
            });
        }

        debug!(expr = %expr, "parsed expression");
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<Expr, ParseError> {
        Parser::from_source(src).parse()
    }

    #[test]
    fn arithmetic_group_at_condition_scope() {
        let expr = parse("(a + 1) * 2 > 3").unwrap();
        assert_eq!(expr.to_string(), "(((a + 1) * 2) > 3)");
    }

    #[test]
    fn condition_group_followed_by_comparison() {
        let expr = parse("(a = 1) = (b = 1)").unwrap();
        assert_eq!(expr.to_string(), "((a = 1) = (b = 1))");
    }

    #[test]
    fn unclosed_condition_group() {
        assert_eq!(
            parse("(a = 1 and b = 2"),
            Err(ParseError::UnexpectedEof {
                expected: "RPAREN".to_string()
            })
        );
    }
}
