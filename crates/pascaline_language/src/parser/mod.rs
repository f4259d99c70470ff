//! Recursive-descent parser with interleaved semantic analysis.
//!
//! The parser consumes the token stream with one token of lookahead (two
//! only to split `IDENT :=` from `IDENT (` in statement position and
//! `IDENT (` from a bare variable reference in factor position) and
//! builds the arena-allocated AST. Semantic analysis runs during parsing
//! when the mode is [`SemanticMode::Checked`]: declarations populate the
//! scope-stacked [`SymbolTable`], uses resolve against it, and expression
//! types are inferred on the fly.
//!
//! Failure model:
//!
//! - Syntax problems abort immediately with a [`ParseError`].
//! - Semantic findings accumulate as [`Diagnostic`]s; parsing continues,
//!   and a non-empty list fails [`Parser::parse`] at the very end with
//!   [`ParseErrorKind::Semantic`].
//!
//! Parsing is split across sibling modules by grammar area, each a trait
//! implemented on [`Parser`]: [`DeclParsing`], [`StmtParsing`],
//! [`ExprParsing`]. Type inference lives in `sema`.

mod decl;
mod expr;
mod sema;
mod stmt;

pub use decl::DeclParsing;
pub use expr::ExprParsing;
pub use stmt::StmtParsing;

use crate::arena_ctx::AstContext;
use crate::ast::Program;
use crate::error::{Diagnostic, DiagnosticKind, ParseError, ParseErrorKind};
use crate::symbols::SymbolTable;
use crate::token::{Token, TokenKind};
use pascaline_base::{Interner, Symbol, SymbolEq};

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Whether semantic analysis runs alongside parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SemanticMode {
    /// Full analysis: declarations, resolution, type checking.
    #[default]
    Checked,
    /// Pure syntax: the symbol table is never consulted and no
    /// diagnostics are produced.
    SyntaxOnly,
}

pub struct Parser<'a, 'int> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) current: usize,
    pub(crate) ctx: AstContext<'a>,
    pub(crate) interner: &'int mut Interner,
    pub(crate) symbols: SymbolTable,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) mode: SemanticMode,
    /// Canonical symbols for the two builtin procedures.
    pub(crate) builtin_read: Symbol,
    pub(crate) builtin_write: Symbol,
}

impl<'a, 'int> Parser<'a, 'int> {
    /// Creates a parser with semantic analysis enabled.
    pub fn new(tokens: Vec<Token>, interner: &'int mut Interner, ctx: AstContext<'a>) -> Self {
        Self::with_mode(tokens, interner, ctx, SemanticMode::Checked)
    }

    /// Creates a parser with an explicit [`SemanticMode`].
    pub fn with_mode(
        mut tokens: Vec<Token>,
        interner: &'int mut Interner,
        ctx: AstContext<'a>,
        mode: SemanticMode,
    ) -> Self {
        // The helpers index `tokens[current]` unconditionally, so make
        // sure the stream carries its EOF sentinel even when the caller
        // built the vector by hand.
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column))
                .unwrap_or((1, 1));
            tokens.push(Token::new(
                TokenKind::Eof,
                Symbol::EMPTY,
                line,
                column,
                Default::default(),
            ));
        }

        let symbols = SymbolTable::new(interner);
        let builtin_read = interner.intern("read");
        let builtin_write = interner.intern("write");

        Parser {
            tokens,
            current: 0,
            ctx,
            interner,
            symbols,
            diagnostics: Vec::new(),
            mode,
            builtin_read,
            builtin_write,
        }
    }

    /// Parses a whole `program ... .` source.
    ///
    /// Returns the AST, or the first lexical/syntactic failure, or the
    /// batched semantic findings when parsing itself succeeded.
    pub fn parse(&mut self) -> ParseResult<Program<'a>> {
        self.expect(TokenKind::Program)?;
        let name = self.expect(TokenKind::Ident)?.lexeme;
        self.expect(TokenKind::Semi)?;

        let decls = self.parse_declarations()?;
        let body_stmt = self.parse_block()?;
        let body = self.ctx.stmts.alloc(body_stmt);
        self.expect(TokenKind::Dot)?;

        if !self.diagnostics.is_empty() {
            let token = self.previous().clone();
            return Err(ParseError {
                kind: ParseErrorKind::Semantic {
                    diagnostics: std::mem::take(&mut self.diagnostics),
                },
                line: token.line,
                column: token.column,
            });
        }

        Ok(Program { name, decls, body })
    }

    /// Diagnostics collected so far. Drained by [`Parser::parse`] on
    /// semantic failure; useful for inspection in between.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // ---- token stream helpers -------------------------------------------

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// One extra token of lookahead, saturating at the EOF sentinel.
    pub(crate) fn peek_next(&self) -> &Token {
        let index = (self.current + 1).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek().kind)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// Consumes a token of the given kind or fails with
    /// expected-vs-found (or unexpected-EOF at the end of the stream).
    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        let found = self.peek();
        let error_kind = if found.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnexpectedToken {
                expected: kind,
                found: found.kind,
                lexeme: self.interner.resolve(found.lexeme).to_string(),
            }
        };
        Err(self.error_here(error_kind))
    }

    /// Consumes a token of `kind` whose lexeme is exactly `text`
    /// (used for the `=` of a type definition, an OP_REL).
    pub(crate) fn expect_lexeme(&mut self, kind: TokenKind, text: &'static str) -> ParseResult<Token> {
        let token = self.expect(kind)?;
        if !token.lexeme.is(self.interner, text) {
            let found = self.interner.resolve(token.lexeme).to_string();
            return Err(ParseError {
                kind: ParseErrorKind::UnexpectedOperator {
                    expected: text,
                    found,
                },
                line: token.line,
                column: token.column,
            });
        }
        Ok(token)
    }

    /// Builds a [`ParseError`] at the current token.
    pub(crate) fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        let token = self.peek();
        ParseError {
            kind,
            line: token.line,
            column: token.column,
        }
    }

    // ---- semantic plumbing ----------------------------------------------

    pub(crate) fn semantics_on(&self) -> bool {
        self.mode == SemanticMode::Checked
    }

    /// Records a semantic finding (no-op in [`SemanticMode::SyntaxOnly`]).
    pub(crate) fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        if self.semantics_on() {
            self.diagnostics.push(Diagnostic::new(kind, message));
        }
    }

    /// Canonical lowercase symbol for case-insensitive comparison.
    pub(crate) fn canon(&mut self, sym: Symbol) -> Symbol {
        self.interner.lowercase_symbol(sym)
    }

    /// Resolves a symbol's text into an owned string for diagnostics.
    pub(crate) fn text(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }
}
