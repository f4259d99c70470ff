//! Declaration-section parsing.
//!
//! The four sections may appear in any order and repeat:
//! `const` entries (`name := expr;`), `type` entries (`name = typeref;`),
//! `var` groups (`idlist : typeref;`), and `function` declarations. A
//! function introduces the only nested scope in the language; the scope
//! is entered after the function symbol lands in the enclosing scope and
//! is exited on every control path out of the function body, including
//! parse failures.

use super::{ExprParsing, ParseResult, Parser, StmtParsing};
use crate::ast::{Decl, Param, Stmt};
use crate::error::ParseErrorKind;
use crate::token::{Token, TokenKind};
use pascaline_base::Symbol;

/// Declaration-grammar methods on [`Parser`].
pub trait DeclParsing<'a> {
    /// `decls := ( const_sec | type_sec | var_sec | func_sec )*`
    fn parse_declarations(&mut self) -> ParseResult<Vec<Decl<'a>>>;
    fn parse_const_section(&mut self) -> ParseResult<Vec<Decl<'a>>>;
    fn parse_type_section(&mut self) -> ParseResult<Vec<Decl<'a>>>;
    fn parse_var_section(&mut self) -> ParseResult<Vec<Decl<'a>>>;
    fn parse_function_section(&mut self) -> ParseResult<Decl<'a>>;
    /// `params := idlist ':' typeref` (one group)
    fn parse_param(&mut self) -> ParseResult<Param>;
    /// `idlist := ident ( ',' ident )*`
    fn parse_idlist(&mut self) -> ParseResult<Vec<Symbol>>;
    /// `typeref := primitive_type | ident`
    fn parse_typeref(&mut self) -> ParseResult<Token>;
}

impl<'a, 'int> DeclParsing<'a> for Parser<'a, 'int> {
    fn parse_declarations(&mut self) -> ParseResult<Vec<Decl<'a>>> {
        let mut decls = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Const => decls.extend(self.parse_const_section()?),
                TokenKind::Type => decls.extend(self.parse_type_section()?),
                TokenKind::Var => decls.extend(self.parse_var_section()?),
                TokenKind::Function => decls.push(self.parse_function_section()?),
                _ => return Ok(decls),
            }
        }
    }

    fn parse_const_section(&mut self) -> ParseResult<Vec<Decl<'a>>> {
        self.expect(TokenKind::Const)?;
        let mut consts = Vec::new();
        while self.check(TokenKind::Ident) {
            let name = self.advance().clone();
            self.expect(TokenKind::OpAssign)?;
            let value = self.parse_expression()?;
            self.expect(TokenKind::Semi)?;
            self.declare_const(&name, value);
            consts.push(Decl::Const {
                name: name.lexeme,
                value,
            });
        }
        Ok(consts)
    }

    fn parse_type_section(&mut self) -> ParseResult<Vec<Decl<'a>>> {
        self.expect(TokenKind::Type)?;
        let mut types = Vec::new();
        while self.check(TokenKind::Ident) {
            let name = self.advance().clone();
            self.expect_lexeme(TokenKind::OpRel, "=")?;
            let definition = self.parse_typeref()?;
            self.expect(TokenKind::Semi)?;
            self.declare_type(&name, &definition);
            types.push(Decl::Type {
                name: name.lexeme,
                definition: definition.lexeme,
            });
        }
        Ok(types)
    }

    fn parse_var_section(&mut self) -> ParseResult<Vec<Decl<'a>>> {
        self.expect(TokenKind::Var)?;
        let mut vars = Vec::new();
        while self.check(TokenKind::Ident) {
            let names = self.parse_idlist()?;
            self.expect(TokenKind::Colon)?;
            let type_token = self.parse_typeref()?;
            self.expect(TokenKind::Semi)?;
            self.declare_vars(&names, &type_token);
            vars.push(Decl::Var {
                names,
                type_name: type_token.lexeme,
            });
        }
        Ok(vars)
    }

    fn parse_function_section(&mut self) -> ParseResult<Decl<'a>> {
        self.expect(TokenKind::Function)?;
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            params.push(self.parse_param()?);
            while self.check(TokenKind::Semi) {
                self.advance();
                params.push(self.parse_param()?);
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let return_type = self.parse_typeref()?;
        self.expect(TokenKind::Semi)?;

        self.declare_function(&name, &params, &return_type);

        // The scope must unwind even when body parsing fails, so the
        // fallible part runs between paired enter/exit calls.
        self.symbols.enter_scope();
        let scoped = parse_function_scope(self, &params);
        self.symbols.exit_scope();
        let (locals, body) = scoped?;

        Ok(Decl::Function {
            name: name.lexeme,
            params,
            return_type: return_type.lexeme,
            locals,
            body,
        })
    }

    fn parse_param(&mut self) -> ParseResult<Param> {
        let names = self.parse_idlist()?;
        self.expect(TokenKind::Colon)?;
        let type_token = self.parse_typeref()?;
        Ok(Param {
            names,
            type_name: type_token.lexeme,
        })
    }

    fn parse_idlist(&mut self) -> ParseResult<Vec<Symbol>> {
        let mut names = vec![self.expect(TokenKind::Ident)?.lexeme];
        while self.check(TokenKind::Comma) {
            self.advance();
            names.push(self.expect(TokenKind::Ident)?.lexeme);
        }
        Ok(names)
    }

    fn parse_typeref(&mut self) -> ParseResult<Token> {
        if self.peek().kind.is_type_name() {
            return Ok(self.advance().clone());
        }
        let found = self.peek().kind;
        if found == TokenKind::Eof {
            return Err(self.error_here(ParseErrorKind::UnexpectedEof));
        }
        let lexeme = self.interner.resolve(self.peek().lexeme).to_string();
        Err(self.error_here(ParseErrorKind::ExpectedTypeName { found, lexeme }))
    }
}

/// Parameter declarations, optional locals, and the body: everything
/// that lives inside the function's scope.
fn parse_function_scope<'a, 'int>(
    parser: &mut Parser<'a, 'int>,
    params: &[Param],
) -> ParseResult<(Vec<Decl<'a>>, &'a Stmt<'a>)> {
    parser.declare_params(params);
    let locals = if parser.check(TokenKind::Var) {
        parser.parse_var_section()?
    } else {
        Vec::new()
    };
    let body_stmt = parser.parse_block()?;
    parser.expect(TokenKind::Semi)?;
    Ok((locals, &*parser.ctx.stmts.alloc(body_stmt)))
}
