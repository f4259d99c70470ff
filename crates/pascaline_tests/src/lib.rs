//! Integration test suite for the pascaline compiler.
//!
//! This crate exists only to run the cross-crate tests in `tests/`;
//! all actual test code lives there.
//!
//! # Test Organization
//!
//! | Suite | Covers |
//! |-------|--------|
//! | `e2e_scanner` | token kinds, positions, comments, lexical errors |
//! | `e2e_parser` | grammar shape, separators, syntax errors, syntax-only mode |
//! | `e2e_semantics` | declarations, scopes, type inference, diagnostic batching |
//! | `e2e_codegen` | TAC lowering shapes, labels, temporaries, call protocol |
//! | `e2e_optimizer` | the five passes, fixed point, observable-order preservation |
//!
//! # Running
//!
//! ```bash
//! cargo test -p pascaline-tests
//! cargo test -p pascaline-tests --test e2e_optimizer
//! ```
