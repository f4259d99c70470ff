//! Interleaved semantic analysis.
//!
//! Every method here is a no-op in `SemanticMode::SyntaxOnly` (checked
//! once at the top). Findings never abort the parse: they accumulate as
//! diagnostics and surface together when `parse()` finishes.
//!
//! Type inference follows the declared rules:
//!
//! - literals type by syntactic form, variables by declaration;
//! - arithmetic requires numeric operands and is real-contagious;
//! - relationals require compatible operands and yield boolean;
//! - `and`/`or`/`not` require boolean operands;
//! - calls are checked for callee kind, arity, and per-argument
//!   compatibility; `read`/`write` accept anything.
//!
//! `Unknown` flows through inference without producing further findings,
//! so one mistake is reported once rather than at every enclosing node.
//! User type aliases are resolved to their primitives before operand
//! class checks.

use super::Parser;
use crate::ast::{BinOp, Expr, Param};
use crate::error::DiagnosticKind;
use crate::symbols::{SymbolInfo, SymbolKind};
use crate::token::Token;
use crate::types::Ty;
use pascaline_base::Symbol;

impl<'a, 'int> Parser<'a, 'int> {
    // ---- declarations ---------------------------------------------------

    /// Declares a constant; its type is the inferred initializer type.
    pub(crate) fn declare_const(&mut self, name: &Token, value: &'a Expr<'a>) {
        if !self.semantics_on() {
            return;
        }
        let ty = self.infer_expr_type(value);
        let key = self.canon(name.lexeme);
        let level = self.symbols.level();
        let info = SymbolInfo::new(name.lexeme, ty, SymbolKind::Const, level);
        if !self.symbols.declare(key, info) {
            let shown = self.text(name.lexeme);
            self.report(
                DiagnosticKind::Redeclaration,
                format!("identifier '{shown}' is already declared in this scope"),
            );
        }
    }

    /// Declares a type alias; the definition must name an existing type.
    pub(crate) fn declare_type(&mut self, name: &Token, definition: &Token) {
        if !self.semantics_on() {
            return;
        }
        let def_key = self.canon(definition.lexeme);
        let def_is_type = matches!(
            self.symbols.lookup(def_key),
            Some(info) if info.kind == SymbolKind::Type
        );
        if !def_is_type {
            let shown = self.text(definition.lexeme);
            self.report(
                DiagnosticKind::UndeclaredIdentifier,
                format!("type '{shown}' is not declared"),
            );
            return;
        }
        let ty = self.symbols.type_for_name(def_key);
        let key = self.canon(name.lexeme);
        let level = self.symbols.level();
        let info = SymbolInfo::new(name.lexeme, ty, SymbolKind::Type, level);
        if !self.symbols.declare(key, info) {
            let shown = self.text(name.lexeme);
            self.report(
                DiagnosticKind::Redeclaration,
                format!("identifier '{shown}' is already declared in this scope"),
            );
        }
    }

    /// Declares every name of one `var` group.
    pub(crate) fn declare_vars(&mut self, names: &[Symbol], type_token: &Token) {
        if !self.semantics_on() {
            return;
        }
        let Some(ty) = self.checked_type(type_token) else {
            return;
        };
        for &name in names {
            let key = self.canon(name);
            let level = self.symbols.level();
            let info = SymbolInfo::new(name, ty, SymbolKind::Var, level);
            if !self.symbols.declare(key, info) {
                let shown = self.text(name);
                self.report(
                    DiagnosticKind::Redeclaration,
                    format!("identifier '{shown}' is already declared in this scope"),
                );
            }
        }
    }

    /// Declares the function symbol in the *enclosing* scope, with its
    /// flattened parameter list and return type.
    pub(crate) fn declare_function(&mut self, name: &Token, params: &[Param], return_type: &Token) {
        if !self.semantics_on() {
            return;
        }
        // The return type must exist, but the symbol is declared either
        // way so calls to the function still resolve.
        let ret_key = self.canon(return_type.lexeme);
        let ret_is_type = matches!(
            self.symbols.lookup(ret_key),
            Some(info) if info.kind == SymbolKind::Type
        );
        if !ret_is_type {
            let shown = self.text(return_type.lexeme);
            self.report(
                DiagnosticKind::UndeclaredIdentifier,
                format!("return type '{shown}' is not declared"),
            );
        }
        let ret_ty = self.symbols.type_for_name(ret_key);

        let mut flattened = Vec::new();
        for param in params {
            let param_key = self.canon(param.type_name);
            let param_ty = self.symbols.type_for_name(param_key);
            for &param_name in &param.names {
                flattened.push((param_name, param_ty));
            }
        }

        let key = self.canon(name.lexeme);
        let level = self.symbols.level();
        let info = SymbolInfo {
            name: name.lexeme,
            ty: ret_ty,
            kind: SymbolKind::Function,
            scope_level: level,
            params: flattened,
            return_type: Some(ret_ty),
        };
        if !self.symbols.declare(key, info) {
            let shown = self.text(name.lexeme);
            self.report(
                DiagnosticKind::Redeclaration,
                format!("identifier '{shown}' is already declared in this scope"),
            );
        }
    }

    /// Declares the parameters inside the function's own scope.
    pub(crate) fn declare_params(&mut self, params: &[Param]) {
        if !self.semantics_on() {
            return;
        }
        for param in params {
            let type_key = self.canon(param.type_name);
            let type_exists = matches!(
                self.symbols.lookup(type_key),
                Some(info) if info.kind == SymbolKind::Type
            );
            if !type_exists {
                let shown = self.text(param.type_name);
                self.report(
                    DiagnosticKind::UndeclaredIdentifier,
                    format!("type '{shown}' is not declared"),
                );
                continue;
            }
            let ty = self.symbols.type_for_name(type_key);
            for &name in &param.names {
                let key = self.canon(name);
                let level = self.symbols.level();
                let info = SymbolInfo::new(name, ty, SymbolKind::Param, level);
                if !self.symbols.declare(key, info) {
                    let shown = self.text(name);
                    self.report(
                        DiagnosticKind::Redeclaration,
                        format!("identifier '{shown}' is already declared in this scope"),
                    );
                }
            }
        }
    }

    /// Resolves a type reference to its [`Ty`], reporting when it does
    /// not name a declared type.
    fn checked_type(&mut self, type_token: &Token) -> Option<Ty> {
        let key = self.canon(type_token.lexeme);
        let is_type = matches!(
            self.symbols.lookup(key),
            Some(info) if info.kind == SymbolKind::Type
        );
        if !is_type {
            let shown = self.text(type_token.lexeme);
            self.report(
                DiagnosticKind::UndeclaredIdentifier,
                format!("type '{shown}' is not declared"),
            );
            return None;
        }
        Some(self.symbols.type_for_name(key))
    }

    // ---- statement checks -----------------------------------------------

    /// Checks `target := value`: target declared, not a constant, and
    /// type-compatible with the inferred value.
    pub(crate) fn check_assignment(&mut self, target: &Token, value: &'a Expr<'a>) {
        if !self.semantics_on() {
            return;
        }
        // Infer first so problems inside the expression are reported
        // even when the target itself is broken.
        let value_ty = self.infer_expr_type(value);
        let key = self.canon(target.lexeme);
        let target_info = self.symbols.lookup(key).map(|info| (info.kind, info.ty));
        let shown = self.text(target.lexeme);
        match target_info {
            None => self.report(
                DiagnosticKind::UndeclaredIdentifier,
                format!("variable '{shown}' is not declared"),
            ),
            Some((SymbolKind::Const, _)) => self.report(
                DiagnosticKind::AssignmentToConstant,
                format!("cannot assign to constant '{shown}'"),
            ),
            Some((_, target_ty)) => {
                if !self.compatible(target_ty, value_ty) {
                    let expected = target_ty.display(self.interner);
                    let got = value_ty.display(self.interner);
                    self.report(
                        DiagnosticKind::TypeMismatch,
                        format!("'{shown}' has type '{expected}' but the expression has type '{got}'"),
                    );
                }
            }
        }
    }

    /// Checks that an `if`/`while` condition is boolean.
    pub(crate) fn check_condition(&mut self, cond: &'a Expr<'a>, construct: &'static str) {
        if !self.semantics_on() {
            return;
        }
        let ty = self.infer_expr_type(cond);
        let resolved = self.symbols.resolve(ty);
        if resolved != Ty::Boolean && resolved != Ty::Unknown {
            let got = ty.display(self.interner);
            self.report(
                DiagnosticKind::NonBooleanCondition,
                format!("the '{construct}' condition must be boolean, found '{got}'"),
            );
        }
    }

    /// Checks a statement-position call.
    pub(crate) fn check_call(&mut self, name: &Token, args: &[&'a Expr<'a>]) {
        if !self.semantics_on() {
            return;
        }
        self.infer_call_type(name.lexeme, args);
    }

    // ---- type inference -------------------------------------------------

    pub(crate) fn infer_expr_type(&mut self, expr: &Expr<'a>) -> Ty {
        match expr {
            Expr::Num { is_real, .. } => {
                if *is_real {
                    Ty::Real
                } else {
                    Ty::Integer
                }
            }
            Expr::Str { .. } => Ty::Text,
            Expr::Var { name } => {
                let key = self.canon(*name);
                match self.symbols.lookup(key).map(|info| info.ty) {
                    Some(ty) => ty,
                    None => {
                        let shown = self.text(*name);
                        self.report(
                            DiagnosticKind::UndeclaredIdentifier,
                            format!("variable '{shown}' is not declared"),
                        );
                        Ty::Unknown
                    }
                }
            }
            Expr::Binary { op, left, right } => self.infer_binary_type(*op, left, right),
            Expr::Not { operand } => {
                let ty = self.infer_expr_type(operand);
                let resolved = self.symbols.resolve(ty);
                if resolved != Ty::Boolean && resolved != Ty::Unknown {
                    let got = ty.display(self.interner);
                    self.report(
                        DiagnosticKind::TypeMismatch,
                        format!("operator 'not' requires a boolean operand, found '{got}'"),
                    );
                }
                Ty::Boolean
            }
            Expr::Call { name, args } => self.infer_call_type(*name, args),
        }
    }

    fn infer_binary_type(&mut self, op: BinOp, left: &Expr<'a>, right: &Expr<'a>) -> Ty {
        let left_ty = self.infer_expr_type(left);
        let right_ty = self.infer_expr_type(right);

        if op.is_arithmetic() {
            let lhs = self.symbols.resolve(left_ty);
            let rhs = self.symbols.resolve(right_ty);
            if lhs == Ty::Unknown || rhs == Ty::Unknown {
                return Ty::Unknown;
            }
            if !lhs.is_numeric() || !rhs.is_numeric() {
                let l = left_ty.display(self.interner);
                let r = right_ty.display(self.interner);
                self.report(
                    DiagnosticKind::TypeMismatch,
                    format!(
                        "operator '{}' requires numeric operands, found '{l}' and '{r}'",
                        op.as_str()
                    ),
                );
                return Ty::Unknown;
            }
            if lhs == Ty::Real || rhs == Ty::Real {
                Ty::Real
            } else {
                Ty::Integer
            }
        } else if op.is_relational() {
            if !self.compatible(left_ty, right_ty) {
                let l = left_ty.display(self.interner);
                let r = right_ty.display(self.interner);
                self.report(
                    DiagnosticKind::TypeMismatch,
                    format!(
                        "operator '{}' requires compatible operands, found '{l}' and '{r}'",
                        op.as_str()
                    ),
                );
            }
            Ty::Boolean
        } else {
            let lhs = self.symbols.resolve(left_ty);
            let rhs = self.symbols.resolve(right_ty);
            let lhs_bad = lhs != Ty::Boolean && lhs != Ty::Unknown;
            let rhs_bad = rhs != Ty::Boolean && rhs != Ty::Unknown;
            if lhs_bad || rhs_bad {
                let l = left_ty.display(self.interner);
                let r = right_ty.display(self.interner);
                self.report(
                    DiagnosticKind::TypeMismatch,
                    format!(
                        "operator '{}' requires boolean operands, found '{l}' and '{r}'",
                        op.as_str()
                    ),
                );
            }
            Ty::Boolean
        }
    }

    fn infer_call_type(&mut self, name: Symbol, args: &[&'a Expr<'a>]) -> Ty {
        let key = self.canon(name);
        if key == self.builtin_read || key == self.builtin_write {
            // Builtins take any number of arguments of any type; infer
            // them anyway so their own problems surface.
            for arg in args {
                self.infer_expr_type(arg);
            }
            return Ty::Void;
        }

        let callee = self
            .symbols
            .lookup(key)
            .map(|info| (info.kind, info.params.clone(), info.return_type));
        let shown = self.text(name);
        match callee {
            None => {
                self.report(
                    DiagnosticKind::UndeclaredIdentifier,
                    format!("function '{shown}' is not declared"),
                );
                Ty::Unknown
            }
            Some((kind, _, _)) if kind != SymbolKind::Function => {
                self.report(
                    DiagnosticKind::TypeMismatch,
                    format!("'{shown}' is not a function"),
                );
                Ty::Unknown
            }
            Some((_, params, return_type)) => {
                let ret = return_type.unwrap_or(Ty::Unknown);
                if params.len() != args.len() {
                    self.report(
                        DiagnosticKind::WrongArity,
                        format!(
                            "function '{shown}' expects {} argument(s) but received {}",
                            params.len(),
                            args.len()
                        ),
                    );
                    return ret;
                }
                for (index, (arg, (_, param_ty))) in args.iter().zip(params.iter()).enumerate() {
                    let arg_ty = self.infer_expr_type(arg);
                    if !self.compatible(*param_ty, arg_ty) {
                        let expected = param_ty.display(self.interner);
                        let got = arg_ty.display(self.interner);
                        self.report(
                            DiagnosticKind::TypeMismatch,
                            format!(
                                "argument {} of '{shown}' expects '{expected}' but received '{got}'",
                                index + 1
                            ),
                        );
                    }
                }
                ret
            }
        }
    }

    /// Type compatibility: `Unknown` matches anything, identical types
    /// match, `integer`/`real` promote both ways, and aliases match
    /// whatever their chains resolve to.
    pub(crate) fn compatible(&self, a: Ty, b: Ty) -> bool {
        if a == Ty::Unknown || b == Ty::Unknown {
            return true;
        }
        if a == b {
            return true;
        }
        if matches!((a, b), (Ty::Integer, Ty::Real) | (Ty::Real, Ty::Integer)) {
            return true;
        }
        self.symbols.resolve(a) == self.symbols.resolve(b)
    }
}
