//! Syntax-directed lowering from AST to three-address code.
//!
//! [`TacGen`] walks a successfully parsed [`Program`] and emits a linear
//! instruction list. Two counters mint temporaries `T1, T2, …` and
//! labels `L1, L2, …`; both restart at zero for every generation run, so
//! the same input produces byte-identical output.
//!
//! Program layout: every function body is emitted first, in declaration
//! order, each bracketed by `LABEL FUNC_<name>` … `RETURN <name>`; then
//! `LABEL MAIN`, the main block, and `HALT`.
//!
//! Pascal returns a value by assigning to the function's own name. The
//! generator emits `ATR <name> 0` right after the function label so the
//! closing `RETURN <name>` is defined even when the body never assigns
//! it.
//!
//! The generator assumes a semantically valid AST and reports nothing:
//! an inconsistency here is a caller contract violation, not a user
//! error.

use crate::tac::{Addr, Label, Opcode, Tac};
use pascaline_language::ast::{BinOp, Decl, Expr, Program, Stmt};
use pascaline_base::{Interner, Symbol};
use std::collections::HashMap;

/// Three-address code generator.
pub struct TacGen<'int> {
    interner: &'int mut Interner,
    instructions: Vec<Tac>,
    temp_counter: u32,
    label_counter: u32,
    /// Canonical (lowercase) function name → name as declared, so call
    /// sites reuse the declaration's `FUNC_<name>` spelling.
    function_names: HashMap<Symbol, Symbol>,
    retval: Symbol,
    builtin_read: Symbol,
    builtin_write: Symbol,
    zero: Symbol,
}

impl<'int> TacGen<'int> {
    pub fn new(interner: &'int mut Interner) -> Self {
        let retval = interner.intern("RETVAL");
        let builtin_read = interner.intern("read");
        let builtin_write = interner.intern("write");
        let zero = interner.intern("0");
        TacGen {
            interner,
            instructions: Vec::new(),
            temp_counter: 0,
            label_counter: 0,
            function_names: HashMap::new(),
            retval,
            builtin_read,
            builtin_write,
            zero,
        }
    }

    /// Lowers a whole program, resetting all generator state first.
    pub fn generate(&mut self, program: &Program<'_>) -> Vec<Tac> {
        self.instructions.clear();
        self.temp_counter = 0;
        self.label_counter = 0;
        self.function_names.clear();

        for decl in &program.decls {
            if let Decl::Function { name, body, .. } = decl {
                self.visit_function(*name, body);
            }
        }

        self.emit(Tac::op1(Opcode::Label, Addr::Label(Label::Main)));
        self.visit_stmt(program.body);
        self.emit(Tac::op0(Opcode::Halt));

        std::mem::take(&mut self.instructions)
    }

    fn new_temp(&mut self) -> Addr {
        self.temp_counter += 1;
        Addr::Temp(self.temp_counter)
    }

    fn new_label(&mut self) -> Label {
        self.label_counter += 1;
        Label::Seq(self.label_counter)
    }

    fn emit(&mut self, instruction: Tac) {
        self.instructions.push(instruction);
    }

    fn visit_function(&mut self, name: Symbol, body: &Stmt<'_>) {
        let key = self.interner.lowercase_symbol(name);
        self.function_names.insert(key, name);

        self.emit(Tac::op1(Opcode::Label, Addr::Label(Label::Func(name))));
        // Default the return slot so RETURN is always defined.
        self.emit(Tac::op2(Opcode::Atr, Addr::Name(name), Addr::Num(self.zero)));
        self.visit_stmt(body);
        self.emit(Tac::op1(Opcode::Return, Addr::Name(name)));
    }

    fn visit_stmt(&mut self, stmt: &Stmt<'_>) {
        match stmt {
            Stmt::Compound { statements } => {
                for statement in *statements {
                    self.visit_stmt(statement);
                }
            }
            Stmt::Assign { target, value } => {
                let value_addr = self.visit_expr(value);
                self.emit(Tac::op2(Opcode::Atr, Addr::Name(*target), value_addr));
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => self.visit_if(cond, then_branch, *else_branch),
            Stmt::While { cond, body } => self.visit_while(cond, body),
            Stmt::Call { name, args } => {
                self.visit_call(*name, args);
            }
        }
    }

    /// `if`: jump over the then-branch when the condition is false.
    /// Both labels are minted up front; without an else branch the else
    /// label simply goes unused and `Lend` doubles as the join point.
    fn visit_if(&mut self, cond: &Expr<'_>, then_branch: &Stmt<'_>, else_branch: Option<&Stmt<'_>>) {
        let label_else = self.new_label();
        let label_end = self.new_label();

        let cond_addr = self.visit_expr(cond);
        let jump_target = if else_branch.is_some() {
            label_else
        } else {
            label_end
        };
        self.emit(Tac::op2(Opcode::Jz, Addr::Label(jump_target), cond_addr));

        self.visit_stmt(then_branch);

        if let Some(else_branch) = else_branch {
            self.emit(Tac::op1(Opcode::Jmp, Addr::Label(label_end)));
            self.emit(Tac::op1(Opcode::Label, Addr::Label(label_else)));
            self.visit_stmt(else_branch);
        }

        self.emit(Tac::op1(Opcode::Label, Addr::Label(label_end)));
    }

    fn visit_while(&mut self, cond: &Expr<'_>, body: &Stmt<'_>) {
        let label_start = self.new_label();
        let label_end = self.new_label();

        self.emit(Tac::op1(Opcode::Label, Addr::Label(label_start)));
        let cond_addr = self.visit_expr(cond);
        self.emit(Tac::op2(Opcode::Jz, Addr::Label(label_end), cond_addr));

        self.visit_stmt(body);

        self.emit(Tac::op1(Opcode::Jmp, Addr::Label(label_start)));
        self.emit(Tac::op1(Opcode::Label, Addr::Label(label_end)));
    }

    /// Lowers an expression, returning the address holding its value.
    /// Literals and variables lower to themselves; compound expressions
    /// emit instructions into fresh temporaries.
    fn visit_expr(&mut self, expr: &Expr<'_>) -> Addr {
        match expr {
            Expr::Num { raw, .. } => Addr::Num(*raw),
            Expr::Str { value } => Addr::Str(*value),
            Expr::Var { name } => Addr::Name(*name),
            Expr::Binary { op, left, right } => {
                let left_addr = self.visit_expr(left);
                let right_addr = self.visit_expr(right);
                let result = self.new_temp();
                self.emit(Tac::op3(binary_opcode(*op), result, left_addr, right_addr));
                result
            }
            Expr::Not { operand } => {
                let operand_addr = self.visit_expr(operand);
                let result = self.new_temp();
                self.emit(Tac::op2(Opcode::Not, result, operand_addr));
                result
            }
            Expr::Call { name, args } => {
                self.visit_call(*name, args);
                let result = self.new_temp();
                self.emit(Tac::op2(Opcode::Atr, result, Addr::Name(self.retval)));
                result
            }
        }
    }

    /// Lowers a call. `read`/`write` become one instruction per
    /// argument; everything else pushes `PARAM`s in source order and
    /// emits `CALL FUNC_<name> <argCount>`.
    fn visit_call(&mut self, name: Symbol, args: &[&Expr<'_>]) {
        let key = self.interner.lowercase_symbol(name);

        if key == self.builtin_read {
            for arg in args {
                let addr = self.visit_expr(arg);
                self.emit(Tac::op1(Opcode::Read, addr));
            }
            return;
        }
        if key == self.builtin_write {
            for arg in args {
                let addr = self.visit_expr(arg);
                self.emit(Tac::op1(Opcode::Write, addr));
            }
            return;
        }

        for arg in args {
            let addr = self.visit_expr(arg);
            self.emit(Tac::op1(Opcode::Param, addr));
        }
        let target = *self.function_names.get(&key).unwrap_or(&name);
        let count = self.interner.intern(&args.len().to_string());
        self.emit(Tac::op2(
            Opcode::Call,
            Addr::Label(Label::Func(target)),
            Addr::Num(count),
        ));
    }
}

fn binary_opcode(op: BinOp) -> Opcode {
    match op {
        BinOp::Add => Opcode::Add,
        BinOp::Sub => Opcode::Sub,
        BinOp::Mul => Opcode::Mul,
        BinOp::Div => Opcode::Div,
        BinOp::Eq => Opcode::Eq,
        BinOp::Ne => Opcode::Ne,
        BinOp::Lt => Opcode::Lt,
        BinOp::Gt => Opcode::Gt,
        BinOp::Le => Opcode::Le,
        BinOp::Ge => Opcode::Ge,
        BinOp::And => Opcode::And,
        BinOp::Or => Opcode::Or,
    }
}

/// Convenience wrapper: lowers `program` with a fresh [`TacGen`].
pub fn generate(program: &Program<'_>, interner: &mut Interner) -> Vec<Tac> {
    TacGen::new(interner).generate(program)
}
