//! Statement parsing.
//!
//! Two tokens of lookahead disambiguate statement-initial identifiers:
//! `IDENT :=` is an assignment, `IDENT (` a call, anything else is not a
//! statement. Inside a block the semicolon is an optional separator:
//! zero or one after each statement, so a trailing `;` before `END` is
//! accepted and a missing one between statements is too.

use super::{ExprParsing, ParseResult, Parser};
use crate::ast::Stmt;
use crate::error::ParseErrorKind;
use crate::token::TokenKind;

/// Statement-grammar methods on [`Parser`].
pub trait StmtParsing<'a> {
    /// `block := BEGIN stmt ( ';' stmt )* END`, empty blocks allowed.
    fn parse_block(&mut self) -> ParseResult<Stmt<'a>>;
    /// `stmt := assign | if | while | block | call`
    fn parse_statement(&mut self) -> ParseResult<Stmt<'a>>;
    /// `assign := ident ':=' expr`
    fn parse_assignment(&mut self) -> ParseResult<Stmt<'a>>;
    /// `if := IF expr THEN stmt ( ELSE stmt )?`
    fn parse_if(&mut self) -> ParseResult<Stmt<'a>>;
    /// `while := WHILE expr DO stmt`
    fn parse_while(&mut self) -> ParseResult<Stmt<'a>>;
    /// `call := (READ|WRITE|ident) '(' args? ')'`
    fn parse_call_statement(&mut self) -> ParseResult<Stmt<'a>>;
}

impl<'a, 'int> StmtParsing<'a> for Parser<'a, 'int> {
    fn parse_block(&mut self) -> ParseResult<Stmt<'a>> {
        self.expect(TokenKind::Begin)?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::End) {
            if self.is_at_end() {
                return Err(self.error_here(ParseErrorKind::UnexpectedEof));
            }
            statements.push(self.parse_statement()?);
            if self.check(TokenKind::Semi) {
                self.advance();
            }
        }
        self.expect(TokenKind::End)?;
        Ok(Stmt::Compound {
            statements: self.ctx.stmts.alloc_slice(statements),
        })
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt<'a>> {
        match self.peek().kind {
            TokenKind::Ident => match self.peek_next().kind {
                TokenKind::OpAssign => self.parse_assignment(),
                TokenKind::LParen => self.parse_call_statement(),
                _ => {
                    let token = self.peek();
                    let lexeme = self.interner.resolve(token.lexeme).to_string();
                    Err(self.error_here(ParseErrorKind::ExpectedStatement {
                        found: TokenKind::Ident,
                        lexeme,
                    }))
                }
            },
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Begin => self.parse_block(),
            TokenKind::Read | TokenKind::Write => self.parse_call_statement(),
            TokenKind::Eof => Err(self.error_here(ParseErrorKind::UnexpectedEof)),
            found => {
                let lexeme = self.interner.resolve(self.peek().lexeme).to_string();
                Err(self.error_here(ParseErrorKind::ExpectedStatement { found, lexeme }))
            }
        }
    }

    fn parse_assignment(&mut self) -> ParseResult<Stmt<'a>> {
        let target = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::OpAssign)?;
        let value = self.parse_expression()?;
        self.check_assignment(&target, value);
        Ok(Stmt::Assign {
            target: target.lexeme,
            value,
        })
    }

    fn parse_if(&mut self) -> ParseResult<Stmt<'a>> {
        self.expect(TokenKind::If)?;
        let cond = self.parse_expression()?;
        self.check_condition(cond, "if");
        self.expect(TokenKind::Then)?;
        let then_stmt = self.parse_statement()?;
        let then_branch = &*self.ctx.stmts.alloc(then_stmt);
        let else_branch = if self.check(TokenKind::Else) {
            self.advance();
            let else_stmt = self.parse_statement()?;
            Some(&*self.ctx.stmts.alloc(else_stmt))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt<'a>> {
        self.expect(TokenKind::While)?;
        let cond = self.parse_expression()?;
        self.check_condition(cond, "while");
        self.expect(TokenKind::Do)?;
        let body_stmt = self.parse_statement()?;
        Ok(Stmt::While {
            cond,
            body: self.ctx.stmts.alloc(body_stmt),
        })
    }

    fn parse_call_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let name = if self.check_any(&[TokenKind::Read, TokenKind::Write]) {
            self.advance().clone()
        } else {
            self.expect(TokenKind::Ident)?
        };
        let args = self.parse_call_args()?;
        self.check_call(&name, &args);
        Ok(Stmt::Call {
            name: name.lexeme,
            args,
        })
    }
}
