//! # pascaline-language
//!
//! Front end for the pascaline Pascal subset: scanning, parsing, and
//! semantic analysis.
//!
//! ## Pipeline
//!
//! 1. **Scanner** ([`lexer`]): turns source text into a [`Token`]
//!    stream with longest-match rules and 1-based positions. Keywords
//!    are case-insensitive; identifiers keep their casing.
//!
//! 2. **Parser** ([`parser`]): recursive descent over the token stream,
//!    building the arena-allocated AST ([`ast`]). With
//!    [`SemanticMode::Checked`] (the default) it simultaneously runs
//!    declaration tracking, scope management ([`symbols`]), and type
//!    inference ([`types`]), batching findings into [`Diagnostic`]s.
//!
//! ## Quick start
//!
//! ```
//! use pascaline_base::{Arena, Interner};
//! use pascaline_language::{ast, lexer::tokenize, AstContext, Parser};
//!
//! let source = "program demo; var x: integer; begin x := 1 end.";
//!
//! let mut interner = Interner::new();
//! let tokens = tokenize(source, &mut interner).unwrap();
//!
//! let exprs: Arena<ast::Expr> = Arena::new();
//! let stmts: Arena<ast::Stmt> = Arena::new();
//! let ctx = AstContext::new(&exprs, &stmts);
//!
//! let program = Parser::new(tokens, &mut interner, ctx).parse().unwrap();
//! assert_eq!(interner.resolve(program.name), "demo");
//! ```
//!
//! ## Failure model
//!
//! Lexical and syntactic errors are fail-fast ([`LexError`],
//! [`ParseError`]); semantic findings accumulate and fail the parse at
//! the end as one combined [`ParseErrorKind::Semantic`] report. Code
//! generation (in `pascaline-compile`) assumes a successfully parsed
//! program.

// Re-export base types used throughout the public API
pub use pascaline_base::{Arena, Interner, Span, Symbol, SymbolEq};

pub mod arena_ctx;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod token;
pub mod types;

pub use arena_ctx::AstContext;
pub use error::{Diagnostic, DiagnosticKind, LexError, ParseError, ParseErrorKind};
pub use lexer::{tokenize, Lexer};
pub use parser::{DeclParsing, ExprParsing, Parser, SemanticMode, StmtParsing};
pub use symbols::{SymbolInfo, SymbolKind, SymbolTable};
pub use token::{Token, TokenKind};
pub use types::Ty;
