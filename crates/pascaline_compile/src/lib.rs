//! # pascaline-compile
//!
//! Middle end for pascaline: three-address code generation and a
//! fixed-point local optimizer.
//!
//! ## Pipeline position
//!
//! ```text
//! typed AST  ──►  codegen (TAC)  ──►  optimize  ──►  optimized TAC
//! ```
//!
//! [`codegen`] lowers a parsed program into a linear [`Tac`] instruction
//! list with fresh temporaries (`T1, T2, …`) and labels (`L1, L2, …`).
//! [`optimize`] then iterates constant folding, constant propagation,
//! copy propagation, dead-code elimination, and common-subexpression
//! elimination until nothing changes (bounded at
//! [`optimize::MAX_PASSES`] iterations).
//!
//! ## Quick start
//!
//! ```
//! use pascaline_compile::{compile, render_listing};
//!
//! let result = compile("program p; var x: integer; begin x := 5 + 3; write(x) end.").unwrap();
//! let listing = render_listing(&result.optimized, &result.interner);
//! assert!(listing.contains("ATR"));
//! assert!(!listing.contains("ADD")); // 5 + 3 folded away
//! ```
//!
//! [`export`] holds the AST JSON and Graphviz exporters consumed by
//! external tooling; [`render_listing`] produces the numbered textual
//! instruction format.

pub mod codegen;
pub mod compile;
pub mod export;
pub mod optimize;
pub mod tac;

pub use codegen::{generate, TacGen};
pub use compile::{compile, CompileError, Compilation};
pub use export::{ast_to_json, ast_to_json_string, DotExporter};
pub use optimize::optimize;
pub use tac::{render_listing, Addr, Label, Opcode, Tac};
