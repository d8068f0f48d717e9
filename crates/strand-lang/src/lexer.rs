//! Hand-written lexer.
//!
//! Scans bytes, tracking line numbers for diagnostics. `//` comments run
//! to end of line. Numbers are integers or decimals; a trailing `.` with
//! no digit after it is not consumed as part of the number.

use crate::error::ParseError;
use crate::token::{Token, TokenKind};

/// Tokenizer over source text.
pub struct Lexer<'a> {
    source: &'a str,
    start: usize,
    pos: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            pos: 0,
            line: 1,
        }
    }

    /// Scan and return the next token.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, "", self.line));
        };

        if c.is_ascii_digit() {
            return self.number();
        }
        if c.is_ascii_alphabetic() || c == b'_' {
            return Ok(self.identifier());
        }

        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b',' => TokenKind::Comma,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'=' => TokenKind::Equal,
            other => {
                return Err(ParseError::UnexpectedChar {
                    ch: other as char,
                    line: self.line,
                });
            }
        };

        Ok(self.make_token(kind))
    }

    /// Tokenize the remaining input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                b' ' | b'\t' | b'\r' => {
                    self.pos += 1;
                }
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'/' if self.peek_next() == Some(b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => return,
            }
        }
    }

    fn number(&mut self) -> Result<Token, ParseError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }

        // Decimal part only when a digit follows the dot.
        if self.peek() == Some(b'.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let lexeme = &self.source[self.start..self.pos];
        let value: f64 = lexeme.parse().map_err(|_| ParseError::InvalidNumber {
            lexeme: lexeme.to_string(),
            line: self.line,
        })?;

        Ok(Token::number(lexeme, value, self.line))
    }

    fn identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }

        let kind = match &self.source[self.start..self.pos] {
            "let" => TokenKind::Let,
            "fn" => TokenKind::Fn,
            "return" => TokenKind::Return,
            "vec3" => TokenKind::Vec3,
            _ => TokenKind::Ident,
        };
        self.make_token(kind)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, &self.source[self.start..self.pos], self.line)
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos + 1).copied()
    }
}
