use tracing::trace;

use crate::ast::{Token, TokenKind};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Text consumed since `start`.
    fn slice(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.slice(start)
    }

    /// Reads a quoted string. The returned literal keeps the quotes; there
    /// are no escape sequences, and a missing closing quote swallows the
    /// rest of the input.
    fn read_string(&mut self, quote: char) -> String {
        let start = self.position;
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == quote {
                break;
            }
        }
        self.slice(start)
    }

    fn read_number(&mut self) -> String {
        let start = self.position;
        let mut seen_point = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !seen_point {
                seen_point = true;
                self.advance();
            } else {
                // A second '.' stays in the input: 123.45.67
                break;
            }
        }
        self.slice(start)
    }

    fn operator(&mut self, kind: TokenKind, width: usize) -> Token {
        let start = self.position;
        for _ in 0..width {
            self.advance();
        }
        Token::new(kind, self.slice(start))
    }

    /// Returns the next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let ch = self.current_char()?;
        let token = match (ch, self.peek_char(1)) {
            ('>', Some('=')) => self.operator(TokenKind::Gte, 2),
            ('<', Some('=')) => self.operator(TokenKind::Lte, 2),
            ('<', Some('>')) => self.operator(TokenKind::Ne, 2),
            ('=', Some('~')) => self.operator(TokenKind::RegEq, 2),
            ('>', _) => self.operator(TokenKind::Gt, 1),
            ('<', _) => self.operator(TokenKind::Lt, 1),
            ('=', _) => self.operator(TokenKind::Eq, 1),
            ('(', _) => self.operator(TokenKind::LParen, 1),
            (')', _) => self.operator(TokenKind::RParen, 1),
            ('+', _) => self.operator(TokenKind::Plus, 1),
            ('-', _) => self.operator(TokenKind::Minus, 1),
            ('*', _) => self.operator(TokenKind::Mult, 1),
            ('/', _) => self.operator(TokenKind::Div, 1),
            (c, _) if c.is_ascii_digit() => Token::new(TokenKind::Num, self.read_number()),
            (c, _) if c.is_alphabetic() => {
                let ident = self.read_identifier();
                let kind = match ident.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    _ => TokenKind::Ident,
                };
                Token::new(kind, ident)
            }
            ('"', _) => Token::new(TokenKind::Str, self.read_string('"')),
            ('\'', _) => Token::new(TokenKind::Str, self.read_string('\'')),
            _ => self.operator(TokenKind::Undef, 1),
        };
        Some(token)
    }

    /// Consumes the whole input into a token stream.
    pub fn tokenize(mut self) -> TokenStream {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        trace!(count = tokens.len(), "tokenized input");
        TokenStream::new(tokens)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// A fully materialized token sequence with a forward-only read cursor.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens,
            position: 0,
        }
    }

    /// The next unread token.
    pub fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    /// The unread token `offset` places past the cursor.
    pub fn peek_nth(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }

    /// Returns the next unread token and moves past it.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Index of the next unread token.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or And OR android");
    assert_eq!(lexer.next_token(), Some(Token::new(TokenKind::And, "and")));
    assert_eq!(lexer.next_token(), Some(Token::new(TokenKind::Or, "or")));
    assert_eq!(lexer.next_token(), Some(Token::new(TokenKind::Ident, "And")));
    assert_eq!(lexer.next_token(), Some(Token::new(TokenKind::Ident, "OR")));
    assert_eq!(lexer.next_token(), Some(Token::new(TokenKind::Ident, "android")));
    assert_eq!(lexer.next_token(), None);
}

#[test]
fn test_condition() {
    let kinds: Vec<TokenKind> = Lexer::new("(amt >= 100.0 or cat = 'grocery')")
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::Gte,
            TokenKind::Num,
            TokenKind::Or,
            TokenKind::Ident,
            TokenKind::Eq,
            TokenKind::Str,
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_stream_peek_does_not_advance() {
    let mut stream = Lexer::new("a = 1").tokenize();
    assert_eq!(stream.peek().map(|t| t.kind), Some(TokenKind::Ident));
    assert_eq!(stream.peek_nth(2).map(|t| t.kind), Some(TokenKind::Num));
    assert_eq!(stream.position(), 0);
    stream.advance();
    stream.advance();
    stream.advance();
    assert!(stream.is_exhausted());
    assert_eq!(stream.advance(), None);
    assert_eq!(stream.position(), 3);
}
