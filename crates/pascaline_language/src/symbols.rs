//! Scope-stacked symbol table.
//!
//! One map per scope, pushed on function entry and popped on exit. Keys
//! are canonical lowercase symbols (Pascal identifiers compare
//! case-insensitively); the stored [`SymbolInfo`] keeps the declared
//! casing for diagnostics. Scope 0 is preloaded with the primitive types
//! `integer`, `real`, `boolean`, `string`.
//!
//! Lookup walks from the innermost scope down to 0. Declaration inserts
//! into the innermost scope only and refuses a name already present
//! there. Shadowing an outer-scope name is allowed; redeclaring within a
//! scope is not.

use crate::types::Ty;
use pascaline_base::{Interner, Symbol};
use std::collections::HashMap;

/// What a declared name is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Type,
    Const,
    Var,
    Param,
    Function,
}

/// Everything the analyzer knows about one declared name.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    /// The name as written at the declaration site.
    pub name: Symbol,
    /// Declared type; for `Type` symbols this is the definition, which
    /// may itself be an alias.
    pub ty: Ty,
    pub kind: SymbolKind,
    /// Scope depth the symbol was declared at (0 = program scope).
    pub scope_level: usize,
    /// For functions: parameter names and declared types, in order.
    pub params: Vec<(Symbol, Ty)>,
    /// For functions: the declared return type.
    pub return_type: Option<Ty>,
}

impl SymbolInfo {
    /// A non-function symbol with empty parameter info.
    pub fn new(name: Symbol, ty: Ty, kind: SymbolKind, scope_level: usize) -> Self {
        SymbolInfo {
            name,
            ty,
            kind,
            scope_level,
            params: Vec::new(),
            return_type: None,
        }
    }
}

/// The scope stack.
pub struct SymbolTable {
    scopes: Vec<HashMap<Symbol, SymbolInfo>>,
    sym_integer: Symbol,
    sym_real: Symbol,
    sym_boolean: Symbol,
    sym_string: Symbol,
}

impl SymbolTable {
    /// Creates a table whose outermost scope holds the primitive types.
    pub fn new(interner: &mut Interner) -> Self {
        let sym_integer = interner.intern("integer");
        let sym_real = interner.intern("real");
        let sym_boolean = interner.intern("boolean");
        let sym_string = interner.intern("string");

        let mut globals = HashMap::new();
        for (key, ty) in [
            (sym_integer, Ty::Integer),
            (sym_real, Ty::Real),
            (sym_boolean, Ty::Boolean),
            (sym_string, Ty::Text),
        ] {
            globals.insert(key, SymbolInfo::new(key, ty, SymbolKind::Type, 0));
        }

        SymbolTable {
            scopes: vec![globals],
            sym_integer,
            sym_real,
            sym_boolean,
            sym_string,
        }
    }

    /// Current scope depth (0 = program scope).
    pub fn level(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope. The program scope is never popped.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares `info` under the canonical `key` in the innermost scope.
    ///
    /// Returns `false` (and leaves the table unchanged) when the key is
    /// already declared at this level.
    pub fn declare(&mut self, key: Symbol, mut info: SymbolInfo) -> bool {
        let level = self.level();
        let scope = self.scopes.last_mut().expect("scope stack is never empty");
        if scope.contains_key(&key) {
            return false;
        }
        info.scope_level = level;
        scope.insert(key, info);
        true
    }

    /// Finds `key` in the innermost scope that declares it.
    pub fn lookup(&self, key: Symbol) -> Option<&SymbolInfo> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&key))
    }

    /// Maps a canonical type name to its [`Ty`]: primitives directly,
    /// anything else as an [`Ty::Alias`].
    pub fn type_for_name(&self, key: Symbol) -> Ty {
        if key == self.sym_integer {
            Ty::Integer
        } else if key == self.sym_real {
            Ty::Real
        } else if key == self.sym_boolean {
            Ty::Boolean
        } else if key == self.sym_string {
            Ty::Text
        } else {
            Ty::Alias(key)
        }
    }

    /// Resolves an alias chain to its base type.
    ///
    /// An alias that does not name a `Type` symbol resolves to itself, so
    /// two uses of the same undeclared name still compare equal.
    /// Declaration order makes cycles impossible: a type definition must
    /// name an already-declared type.
    pub fn resolve(&self, ty: Ty) -> Ty {
        match ty {
            Ty::Alias(key) => match self.lookup(key) {
                Some(info) if info.kind == SymbolKind::Type && info.ty != ty => {
                    self.resolve(info.ty)
                }
                _ => ty,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(interner: &mut Interner) -> SymbolTable {
        SymbolTable::new(interner)
    }

    #[test]
    fn primitives_are_preloaded() {
        let mut interner = Interner::new();
        let t = table(&mut interner);
        let key = interner.intern("integer");
        let info = t.lookup(key).unwrap();
        assert_eq!(info.kind, SymbolKind::Type);
        assert_eq!(info.ty, Ty::Integer);
        assert_eq!(info.scope_level, 0);
    }

    #[test]
    fn declare_rejects_duplicates_in_same_scope() {
        let mut interner = Interner::new();
        let mut t = table(&mut interner);
        let key = interner.intern("x");
        assert!(t.declare(key, SymbolInfo::new(key, Ty::Integer, SymbolKind::Var, 0)));
        assert!(!t.declare(key, SymbolInfo::new(key, Ty::Real, SymbolKind::Var, 0)));
        assert_eq!(t.lookup(key).unwrap().ty, Ty::Integer);
    }

    #[test]
    fn inner_scope_shadows_and_unwinds() {
        let mut interner = Interner::new();
        let mut t = table(&mut interner);
        let key = interner.intern("x");
        t.declare(key, SymbolInfo::new(key, Ty::Integer, SymbolKind::Var, 0));

        t.enter_scope();
        assert!(t.declare(key, SymbolInfo::new(key, Ty::Real, SymbolKind::Param, 1)));
        assert_eq!(t.lookup(key).unwrap().ty, Ty::Real);
        assert_eq!(t.level(), 1);

        t.exit_scope();
        assert_eq!(t.lookup(key).unwrap().ty, Ty::Integer);
        assert_eq!(t.level(), 0);
    }

    #[test]
    fn program_scope_survives_extra_exits() {
        let mut interner = Interner::new();
        let mut t = table(&mut interner);
        t.exit_scope();
        assert_eq!(t.level(), 0);
        assert!(t.lookup(interner.intern("real")).is_some());
    }

    #[test]
    fn alias_chain_resolves_to_primitive() {
        let mut interner = Interner::new();
        let mut t = table(&mut interner);
        let counter = interner.intern("counter");
        let tally = interner.intern("tally");

        // type counter = integer; type tally = counter;
        t.declare(
            counter,
            SymbolInfo::new(counter, Ty::Integer, SymbolKind::Type, 0),
        );
        t.declare(
            tally,
            SymbolInfo::new(tally, Ty::Alias(counter), SymbolKind::Type, 0),
        );

        assert_eq!(t.resolve(Ty::Alias(tally)), Ty::Integer);
        assert_eq!(t.resolve(Ty::Alias(counter)), Ty::Integer);
    }

    #[test]
    fn undeclared_alias_resolves_to_itself() {
        let mut interner = Interner::new();
        let t = table(&mut interner);
        let ghost = interner.intern("ghost");
        assert_eq!(t.resolve(Ty::Alias(ghost)), Ty::Alias(ghost));
    }
}
