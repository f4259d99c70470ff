//! # pascaline-base
//!
//! Pure structural atoms shared by every pascaline crate: bump-allocated
//! arenas for AST nodes, string interning for identifier comparison, and
//! byte spans for source tracking.
//!
//! Nothing in this crate knows about Pascal syntax. It exists so that the
//! language and compile crates agree on the handful of types that cross
//! their boundary.

pub mod arena;
pub mod intern;
pub mod span;

pub use arena::Arena;
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::Span;
