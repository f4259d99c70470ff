//! Shared helpers for the integration suites.
//!
//! Arenas and interners are leaked to `'static` so parsed programs can
//! be returned from helper functions; tests are short-lived processes.

#![allow(dead_code)]

use pascaline_base::{Arena, Interner};
use pascaline_compile::{compile, Compilation, Opcode, Tac};
use pascaline_language::ast::{Expr, Program, Stmt};
use pascaline_language::lexer::tokenize;
use pascaline_language::{
    AstContext, Diagnostic, ParseError, ParseErrorKind, Parser, SemanticMode,
};

/// Compiles source through the full pipeline, panicking on any failure.
pub fn compile_ok(source: &str) -> Compilation {
    compile(source).unwrap_or_else(|err| panic!("compile failed: {err}\nsource:\n{source}"))
}

/// Parses source to a `'static` AST plus its interner.
pub fn parse_static(source: &str) -> (Program<'static>, &'static mut Interner) {
    match parse_with_mode(source, SemanticMode::Checked) {
        (Ok(program), interner) => (program, interner),
        (Err(err), _) => panic!("parse failed: {err}\nsource:\n{source}"),
    }
}

/// Parses source, returning whatever the parser produced.
pub fn parse_with_mode(
    source: &str,
    mode: SemanticMode,
) -> (Result<Program<'static>, ParseError>, &'static mut Interner) {
    let interner: &'static mut Interner = Box::leak(Box::new(Interner::new()));
    let exprs: &'static Arena<Expr<'static>> = Box::leak(Box::new(Arena::new()));
    let stmts: &'static Arena<Stmt<'static>> = Box::leak(Box::new(Arena::new()));

    let tokens = tokenize(source, interner).expect("scan failed");
    let ctx = AstContext::new(exprs, stmts);
    let mut parser = Parser::with_mode(tokens, &mut *interner, ctx, mode);
    let result = parser.parse();
    drop(parser);
    (result, interner)
}

/// Parses source expecting a syntax failure.
pub fn parse_err(source: &str) -> ParseError {
    match parse_with_mode(source, SemanticMode::Checked) {
        (Err(err), _) => err,
        (Ok(_), _) => panic!("expected a parse error\nsource:\n{source}"),
    }
}

/// Parses source expecting batched semantic findings.
pub fn semantic_diagnostics(source: &str) -> Vec<Diagnostic> {
    let err = parse_err(source);
    match err.kind {
        ParseErrorKind::Semantic { diagnostics } => diagnostics,
        other => panic!("expected semantic findings, got {other:?}"),
    }
}

/// The opcode sequence of an instruction list.
pub fn mnemonics(instructions: &[Tac]) -> Vec<&'static str> {
    instructions.iter().map(|i| i.op.mnemonic()).collect()
}

pub fn count_op(instructions: &[Tac], op: Opcode) -> usize {
    instructions.iter().filter(|i| i.op == op).count()
}

/// Renders one instruction compactly: mnemonic and operands separated
/// by single spaces (listing columns are padded, which is awkward to
/// assert against).
pub fn line(instruction: &Tac, interner: &Interner) -> String {
    let mut parts = vec![instruction.op.mnemonic().to_string()];
    for addr in [instruction.a1, instruction.a2, instruction.a3]
        .into_iter()
        .flatten()
    {
        parts.push(addr.render(interner));
    }
    parts.join(" ")
}

/// Compact rendering of a whole instruction list.
pub fn lines(instructions: &[Tac], interner: &Interner) -> Vec<String> {
    instructions.iter().map(|i| line(i, interner)).collect()
}

/// The observable-instruction subsequence (op kinds only).
pub fn observable_ops(instructions: &[Tac]) -> Vec<Opcode> {
    instructions
        .iter()
        .map(|i| i.op)
        .filter(|op| {
            matches!(
                op,
                Opcode::Read
                    | Opcode::Write
                    | Opcode::Call
                    | Opcode::Param
                    | Opcode::Return
                    | Opcode::Halt
            )
        })
        .collect()
}
