//! AST export for external tooling.
//!
//! Two formats, both consumed outside the core pipeline:
//!
//! - [`ast_to_json`]: a field-per-node JSON tree (`{"type": "Num",
//!   "value": 5}`) for programmatic consumers;
//! - [`DotExporter`]: a Graphviz `digraph` for visual inspection.
//!
//! Node type names follow the AST vocabulary: `Program`, `VarDecl`,
//! `ConstDecl`, `TypeDecl`, `FuncDecl`, `Compound`, `Assign`, `If`,
//! `While`, `Call`, `Num`, `Str`, `Var`, `BinOp`, `UnaryNot`,
//! `CallExpr`.

use pascaline_base::{Interner, Symbol};
use pascaline_language::ast::{Decl, Expr, Program, Stmt};
use serde_json::{json, Value};

/// Serializes a program to a JSON tree.
pub fn ast_to_json(program: &Program<'_>, interner: &Interner) -> Value {
    json!({
        "type": "Program",
        "name": interner.resolve(program.name),
        "decls": program.decls.iter().map(|d| decl_to_json(d, interner)).collect::<Vec<_>>(),
        "body": stmt_to_json(program.body, interner),
    })
}

/// Pretty-printed JSON text for [`ast_to_json`].
pub fn ast_to_json_string(program: &Program<'_>, interner: &Interner) -> String {
    let value = ast_to_json(program, interner);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

fn names_to_json(names: &[Symbol], interner: &Interner) -> Value {
    Value::Array(
        names
            .iter()
            .map(|n| Value::String(interner.resolve(*n).to_string()))
            .collect(),
    )
}

fn decl_to_json(decl: &Decl<'_>, interner: &Interner) -> Value {
    match decl {
        Decl::Var { names, type_name } => json!({
            "type": "VarDecl",
            "names": names_to_json(names, interner),
            "typeName": interner.resolve(*type_name),
        }),
        Decl::Const { name, value } => json!({
            "type": "ConstDecl",
            "name": interner.resolve(*name),
            "value": expr_to_json(value, interner),
        }),
        Decl::Type { name, definition } => json!({
            "type": "TypeDecl",
            "name": interner.resolve(*name),
            "definition": interner.resolve(*definition),
        }),
        Decl::Function {
            name,
            params,
            return_type,
            locals,
            body,
        } => json!({
            "type": "FuncDecl",
            "name": interner.resolve(*name),
            "params": params.iter().map(|p| json!({
                "names": names_to_json(&p.names, interner),
                "typeName": interner.resolve(p.type_name),
            })).collect::<Vec<_>>(),
            "retType": interner.resolve(*return_type),
            "locals": locals.iter().map(|d| decl_to_json(d, interner)).collect::<Vec<_>>(),
            "body": stmt_to_json(body, interner),
        }),
    }
}

fn stmt_to_json(stmt: &Stmt<'_>, interner: &Interner) -> Value {
    match stmt {
        Stmt::Compound { statements } => json!({
            "type": "Compound",
            "statements": statements.iter().map(|s| stmt_to_json(s, interner)).collect::<Vec<_>>(),
        }),
        Stmt::Assign { target, value } => json!({
            "type": "Assign",
            "target": { "type": "Var", "name": interner.resolve(*target) },
            "value": expr_to_json(value, interner),
        }),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => json!({
            "type": "If",
            "cond": expr_to_json(cond, interner),
            "then": stmt_to_json(then_branch, interner),
            "else": else_branch.map(|s| stmt_to_json(s, interner)).unwrap_or(Value::Null),
        }),
        Stmt::While { cond, body } => json!({
            "type": "While",
            "cond": expr_to_json(cond, interner),
            "body": stmt_to_json(body, interner),
        }),
        Stmt::Call { name, args } => json!({
            "type": "Call",
            "name": interner.resolve(*name),
            "args": args.iter().map(|a| expr_to_json(a, interner)).collect::<Vec<_>>(),
        }),
    }
}

fn expr_to_json(expr: &Expr<'_>, interner: &Interner) -> Value {
    match expr {
        Expr::Num { raw, is_real } => {
            let text = interner.resolve(*raw);
            let value = if *is_real {
                text.parse::<f64>().map(Value::from).unwrap_or(Value::Null)
            } else {
                text.parse::<i64>().map(Value::from).unwrap_or(Value::Null)
            };
            json!({ "type": "Num", "value": value })
        }
        Expr::Str { value } => json!({
            "type": "Str",
            "value": interner.resolve(*value),
        }),
        Expr::Var { name } => json!({
            "type": "Var",
            "name": interner.resolve(*name),
        }),
        Expr::Binary { op, left, right } => json!({
            "type": "BinOp",
            "op": op.as_str(),
            "left": expr_to_json(left, interner),
            "right": expr_to_json(right, interner),
        }),
        Expr::Not { operand } => json!({
            "type": "UnaryNot",
            "operand": expr_to_json(operand, interner),
        }),
        Expr::Call { name, args } => json!({
            "type": "CallExpr",
            "name": interner.resolve(*name),
            "args": args.iter().map(|a| expr_to_json(a, interner)).collect::<Vec<_>>(),
        }),
    }
}

/// Graphviz DOT export: one box per node, edges in visit order.
pub struct DotExporter {
    lines: Vec<String>,
    counter: u32,
}

impl DotExporter {
    pub fn new() -> Self {
        DotExporter {
            lines: Vec::new(),
            counter: 0,
        }
    }

    /// Renders the whole program as a `digraph AST { ... }` document.
    pub fn export(mut self, program: &Program<'_>, interner: &Interner) -> String {
        self.lines.push("digraph AST {".to_string());
        let root = self.node(&format!("Program({})", interner.resolve(program.name)), None);
        for decl in &program.decls {
            self.visit_decl(decl, &root, interner);
        }
        self.visit_stmt(program.body, &root, interner);
        self.lines.push("}".to_string());
        self.lines.join("\n")
    }

    fn new_id(&mut self) -> String {
        self.counter += 1;
        format!("n{}", self.counter)
    }

    /// Emits one node (and the edge from its parent) and returns its id.
    fn node(&mut self, label: &str, parent: Option<&str>) -> String {
        let id = self.new_id();
        let escaped = label.replace('"', "'");
        self.lines
            .push(format!("  {id} [label=\"{escaped}\", shape=box, style=rounded];"));
        if let Some(parent) = parent {
            self.lines.push(format!("  {parent} -> {id};"));
        }
        id
    }

    fn visit_decl(&mut self, decl: &Decl<'_>, parent: &str, interner: &Interner) {
        match decl {
            Decl::Var { names, type_name } => {
                let shown: Vec<&str> = names.iter().map(|n| interner.resolve(*n)).collect();
                self.node(
                    &format!("VarDecl({}: {})", shown.join(","), interner.resolve(*type_name)),
                    Some(parent),
                );
            }
            Decl::Const { name, value } => {
                let id = self.node(&format!("ConstDecl({})", interner.resolve(*name)), Some(parent));
                self.visit_expr(value, &id, interner);
            }
            Decl::Type { name, definition } => {
                self.node(
                    &format!(
                        "TypeDecl({} = {})",
                        interner.resolve(*name),
                        interner.resolve(*definition)
                    ),
                    Some(parent),
                );
            }
            Decl::Function {
                name, locals, body, ..
            } => {
                let id = self.node(&format!("FuncDecl({})", interner.resolve(*name)), Some(parent));
                for local in locals {
                    self.visit_decl(local, &id, interner);
                }
                self.visit_stmt(body, &id, interner);
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt<'_>, parent: &str, interner: &Interner) {
        match stmt {
            Stmt::Compound { statements } => {
                let id = self.node("Compound", Some(parent));
                for statement in *statements {
                    self.visit_stmt(statement, &id, interner);
                }
            }
            Stmt::Assign { target, value } => {
                let id = self.node("Assign", Some(parent));
                self.node(&format!("Var({})", interner.resolve(*target)), Some(&id));
                self.visit_expr(value, &id, interner);
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let id = self.node("If", Some(parent));
                self.visit_expr(cond, &id, interner);
                self.visit_stmt(then_branch, &id, interner);
                if let Some(else_branch) = else_branch {
                    self.visit_stmt(else_branch, &id, interner);
                }
            }
            Stmt::While { cond, body } => {
                let id = self.node("While", Some(parent));
                self.visit_expr(cond, &id, interner);
                self.visit_stmt(body, &id, interner);
            }
            Stmt::Call { name, args } => {
                let id = self.node(&format!("Call({})", interner.resolve(*name)), Some(parent));
                for arg in args {
                    self.visit_expr(arg, &id, interner);
                }
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr<'_>, parent: &str, interner: &Interner) {
        match expr {
            Expr::Num { raw, .. } => {
                self.node(&format!("Num({})", interner.resolve(*raw)), Some(parent));
            }
            Expr::Str { value } => {
                self.node(&format!("Str({})", interner.resolve(*value)), Some(parent));
            }
            Expr::Var { name } => {
                self.node(&format!("Var({})", interner.resolve(*name)), Some(parent));
            }
            Expr::Binary { op, left, right } => {
                let id = self.node(&format!("BinOp({})", op.as_str()), Some(parent));
                self.visit_expr(left, &id, interner);
                self.visit_expr(right, &id, interner);
            }
            Expr::Not { operand } => {
                let id = self.node("UnaryNot", Some(parent));
                self.visit_expr(operand, &id, interner);
            }
            Expr::Call { name, args } => {
                let id = self.node(&format!("Call({})", interner.resolve(*name)), Some(parent));
                for arg in args {
                    self.visit_expr(arg, &id, interner);
                }
            }
        }
    }
}

impl Default for DotExporter {
    fn default() -> Self {
        Self::new()
    }
}
