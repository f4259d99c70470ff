//! Batch driver for the pascaline front end.
//!
//! Runs the full pipeline on one `.pas` file and prints the optimized
//! instruction listing; flags select additional artifacts (token dump,
//! AST as JSON or Graphviz DOT, the unoptimized listing). Errors print
//! through their `Display` impls and exit nonzero.

use clap::Parser as CliParser;
use pascaline_base::{Arena, Interner};
use pascaline_compile::{ast_to_json_string, codegen, optimize, render_listing, DotExporter};
use pascaline_language::ast::{Expr, Stmt};
use pascaline_language::lexer::tokenize;
use pascaline_language::{AstContext, Parser, SemanticMode, TokenKind};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(CliParser)]
#[command(
    name = "pascaline",
    version,
    about = "Compiler front end for a Pascal subset: tokens, AST, and optimized three-address code"
)]
struct Cli {
    /// Source file (.pas)
    input: PathBuf,

    /// Print the token stream before compiling
    #[arg(long)]
    tokens: bool,

    /// Write the AST as JSON
    #[arg(long, value_name = "FILE")]
    ast_json: Option<PathBuf>,

    /// Write the AST as Graphviz DOT
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Write the unoptimized instruction listing
    #[arg(long, value_name = "FILE")]
    tac: Option<PathBuf>,

    /// Write the optimized instruction listing
    #[arg(long, value_name = "FILE")]
    opt_tac: Option<PathBuf>,

    /// Skip the optimizer and print the raw listing
    #[arg(long)]
    no_optimize: bool,

    /// Parse without semantic analysis
    #[arg(long)]
    syntax_only: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let source = std::fs::read_to_string(&cli.input)
        .map_err(|err| format!("cannot read {}: {err}", cli.input.display()))?;

    let mut interner = Interner::new();
    let tokens = tokenize(&source, &mut interner).map_err(|err| err.to_string())?;

    if cli.tokens {
        for token in &tokens {
            if token.kind == TokenKind::Eof {
                continue;
            }
            println!(
                "{:>4}:{:<4} {:<10} {}",
                token.line,
                token.column,
                token.kind.name(),
                interner.resolve(token.lexeme)
            );
        }
    }

    let mode = if cli.syntax_only {
        SemanticMode::SyntaxOnly
    } else {
        SemanticMode::Checked
    };

    let exprs: Arena<Expr> = Arena::new();
    let stmts: Arena<Stmt> = Arena::new();
    let ctx = AstContext::new(&exprs, &stmts);
    let program = Parser::with_mode(tokens, &mut interner, ctx, mode)
        .parse()
        .map_err(|err| err.to_string())?;

    if let Some(path) = &cli.ast_json {
        let json = ast_to_json_string(&program, &interner);
        std::fs::write(path, json).map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    }
    if let Some(path) = &cli.dot {
        let dot = DotExporter::new().export(&program, &interner);
        std::fs::write(path, dot).map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    }

    let tac = codegen::generate(&program, &mut interner);
    if let Some(path) = &cli.tac {
        let listing = render_listing(&tac, &interner);
        std::fs::write(path, listing)
            .map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    }

    if cli.no_optimize {
        print!("{}", render_listing(&tac, &interner));
        return Ok(());
    }

    let optimized = optimize::optimize(tac, &mut interner);
    if let Some(path) = &cli.opt_tac {
        let listing = render_listing(&optimized, &interner);
        std::fs::write(path, listing)
            .map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    }

    print!("{}", render_listing(&optimized, &interner));
    Ok(())
}
