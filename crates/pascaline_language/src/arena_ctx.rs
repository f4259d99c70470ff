//! Arena context for AST allocation.
//!
//! [`AstContext`] bundles the typed arenas the parser allocates into. The
//! caller owns the arenas so the tree outlives the parser:
//!
//! ```
//! use pascaline_base::{Arena, Interner};
//! use pascaline_language::{ast, AstContext, Parser};
//! use pascaline_language::lexer::tokenize;
//!
//! let mut interner = Interner::new();
//! let tokens = tokenize("program p; begin end.", &mut interner).unwrap();
//!
//! let exprs: Arena<ast::Expr> = Arena::new();
//! let stmts: Arena<ast::Stmt> = Arena::new();
//! let ctx = AstContext::new(&exprs, &stmts);
//!
//! let program = Parser::new(tokens, &mut interner, ctx).parse().unwrap();
//! assert_eq!(interner.resolve(program.name), "p");
//! ```

use crate::ast::{Expr, Stmt};
use pascaline_base::Arena;

/// The typed arenas backing one parsed program.
#[derive(Clone, Copy)]
pub struct AstContext<'a> {
    /// Arena for expression nodes.
    pub exprs: &'a Arena<Expr<'a>>,
    /// Arena for statement nodes and block slices.
    pub stmts: &'a Arena<Stmt<'a>>,
}

impl<'a> AstContext<'a> {
    pub fn new(exprs: &'a Arena<Expr<'a>>, stmts: &'a Arena<Stmt<'a>>) -> Self {
        AstContext { exprs, stmts }
    }
}
