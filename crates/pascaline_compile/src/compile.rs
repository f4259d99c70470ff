//! One-call compilation pipeline.
//!
//! [`compile`] owns the arenas internally and runs scanner → parser →
//! generator → optimizer, returning a [`Compilation`] with both the raw
//! and the optimized instruction lists plus the interner needed to
//! render them. Callers that need the AST itself (exporters, tooling)
//! drive the `pascaline-language` API directly with their own arenas.

use crate::codegen;
use crate::optimize;
use crate::tac::Tac;
use pascaline_base::{Arena, Interner};
use pascaline_language::ast::{Expr, Stmt};
use pascaline_language::lexer::tokenize;
use pascaline_language::{AstContext, LexError, ParseError, Parser, SemanticMode};
use std::fmt;

/// Everything a front-end consumer needs from one compile.
pub struct Compilation {
    /// Interner that resolves every symbol in the instruction lists.
    pub interner: Interner,
    /// Generator output, before optimization.
    pub tac: Vec<Tac>,
    /// Fixed-point optimizer output.
    pub optimized: Vec<Tac>,
}

/// A failure from the front end.
#[derive(Debug, Clone)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lex(err) => err.fmt(f),
            CompileError::Parse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::Lex(err)
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

/// Compiles source text with full semantic analysis.
pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    compile_with_mode(source, SemanticMode::Checked)
}

/// Compiles source text with an explicit [`SemanticMode`].
pub fn compile_with_mode(
    source: &str,
    mode: SemanticMode,
) -> Result<Compilation, CompileError> {
    let mut interner = Interner::new();
    let tokens = tokenize(source, &mut interner)?;

    let exprs: Arena<Expr> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let ctx = AstContext::new(&exprs, &stmts);

    let program = Parser::with_mode(tokens, &mut interner, ctx, mode).parse()?;

    let tac = codegen::generate(&program, &mut interner);
    let optimized = optimize::optimize(tac.clone(), &mut interner);

    Ok(Compilation {
        interner,
        tac,
        optimized,
    })
}
