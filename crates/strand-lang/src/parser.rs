//! Recursive-descent parser.
//!
//! Precedence climbing for expressions: addition and subtraction bind
//! looser than multiplication and division, unary minus binds tighter,
//! calls and primaries tightest.

use crate::ast::{BinOp, Expr, FnDecl, Program, Stmt};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Parser over a token stream, with one token of lookahead.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
}

impl<'a> Parser<'a> {
    /// Parse a whole program from source text.
    pub fn parse(source: &'a str) -> Result<Program, ParseError> {
        let mut parser = Self::new(source)?;
        let mut stmts = Vec::new();
        while !parser.check(TokenKind::Eof) {
            stmts.push(parser.statement()?);
        }
        Ok(Program { stmts })
    }

    fn new(source: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        let peek = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            peek,
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.eat(TokenKind::Let)? {
            return self.let_stmt();
        }
        if self.eat(TokenKind::Fn)? {
            return self.fn_decl();
        }
        if self.eat(TokenKind::Return)? {
            return Ok(Stmt::Return(self.expression()?));
        }
        Err(self.expected("a statement"))
    }

    fn let_stmt(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_ident("variable name after 'let'")?;
        self.expect(TokenKind::Equal, "'=' after variable name")?;
        let value = self.expression()?;
        Ok(Stmt::Let { name, value })
    }

    fn fn_decl(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_ident("function name after 'fn'")?;
        self.expect(TokenKind::LParen, "'(' after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.expect_ident("parameter name")?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after parameters")?;
        self.expect(TokenKind::LBrace, "'{' before function body")?;

        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            body.push(self.statement()?);
        }
        self.expect(TokenKind::RBrace, "'}' after function body")?;

        Ok(Stmt::Fn(FnDecl { name, params, body }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.addition()
    }

    fn addition(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.multiplication()?;
        loop {
            let op = if self.eat(TokenKind::Plus)? {
                BinOp::Add
            } else if self.eat(TokenKind::Minus)? {
                BinOp::Sub
            } else {
                return Ok(expr);
            };
            let rhs = self.multiplication()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
    }

    fn multiplication(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;
        loop {
            let op = if self.eat(TokenKind::Star)? {
                BinOp::Mul
            } else if self.eat(TokenKind::Slash)? {
                BinOp::Div
            } else {
                return Ok(expr);
            };
            let rhs = self.unary()?;
            expr = Expr::Binary {
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(TokenKind::Minus)? {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.call()
    }

    fn call(&mut self) -> Result<Expr, ParseError> {
        let expr = self.primary()?;

        if self.check(TokenKind::LParen) {
            let Expr::Ident(callee) = expr else {
                return Err(ParseError::BadCallTarget {
                    line: self.current.line,
                });
            };
            self.advance()?; // consume '('
            let args = self.arguments()?;
            self.expect(TokenKind::RParen, "')' after arguments")?;
            return Ok(Expr::Call { callee, args });
        }

        Ok(expr)
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if !self.eat(TokenKind::Comma)? {
                return Ok(args);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Number) {
            let value = self.current.value;
            self.advance()?;
            return Ok(Expr::Number(value));
        }

        if self.check(TokenKind::Ident) {
            let name = self.current.lexeme.clone();
            self.advance()?;
            return Ok(Expr::Ident(name));
        }

        if self.eat(TokenKind::Vec3)? {
            self.expect(TokenKind::LParen, "'(' after 'vec3'")?;
            let x = self.expression()?;
            self.expect(TokenKind::Comma, "',' after x component")?;
            let y = self.expression()?;
            self.expect(TokenKind::Comma, "',' after y component")?;
            let z = self.expression()?;
            self.expect(TokenKind::RParen, "')' after z component")?;
            return Ok(Expr::Vec3 {
                x: Box::new(x),
                y: Box::new(y),
                z: Box::new(z),
            });
        }

        if self.eat(TokenKind::LParen)? {
            let expr = self.expression()?;
            self.expect(TokenKind::RParen, "')' after expression")?;
            return Ok(expr);
        }

        Err(self.expected("an expression"))
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consume the current token if it matches.
    fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if !self.eat(kind)? {
            return Err(self.expected(what));
        }
        Ok(())
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        if !self.check(TokenKind::Ident) {
            return Err(self.expected(what));
        }
        let name = self.current.lexeme.clone();
        self.advance()?;
        Ok(name)
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        let next = self.lexer.next_token()?;
        self.current = std::mem::replace(&mut self.peek, next);
        Ok(())
    }

    fn expected(&self, what: &str) -> ParseError {
        let found = if self.current.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            self.current.lexeme.clone()
        };
        ParseError::Expected {
            expected: what.to_string(),
            found,
            line: self.current.line,
        }
    }
}
