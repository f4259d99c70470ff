//! Three-address code.
//!
//! One [`Tac`] instruction holds an [`Opcode`] and up to three [`Addr`]
//! operands named `a1`/`a2`/`a3`. Addresses are typed, so the optimizer
//! asks "is this a numeric literal?" with a variant check instead of
//! re-parsing strings:
//!
//! | Variant | Rendered as | Meaning |
//! |---------|-------------|---------|
//! | `Name`  | `x`         | program variable, parameter, or function name |
//! | `Temp`  | `T3`        | generator temporary |
//! | `Num`   | `41`, `2.5` | numeric literal, kept as written |
//! | `Bool`  | `true`      | boolean literal (minted by the optimizer) |
//! | `Str`   | `"hi"`      | string literal |
//! | `Label` | `L2`, `MAIN`, `FUNC_f` | jump target / entry point |
//!
//! The textual listing format is one instruction per line,
//! `<N>. <op> <a1> <a2> <a3>` with tab-separated, width-padded columns
//! and `#`-prefixed header comments; see [`render_listing`].

use pascaline_base::{Interner, Symbol};

/// Instruction operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `a1 := a2`
    Atr,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    /// `a1 := not a2`
    Not,
    /// Control-flow anchor named by `a1`.
    Label,
    /// Unconditional jump to `a1`.
    Jmp,
    /// Jump to `a1` when `a2` is false/zero.
    Jz,
    /// Jump to `a1` when `a2` is true/nonzero.
    Jnz,
    /// Push actual argument `a1`.
    Param,
    /// Invoke `a1` with `a2` arguments; result lands in `RETVAL`.
    Call,
    /// Return `a1` from the current function.
    Return,
    /// Read input into `a1`.
    Read,
    /// Write `a1` to output.
    Write,
    /// End of the main program.
    Halt,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Atr => "ATR",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Eq => "EQ",
            Opcode::Ne => "NE",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Le => "LE",
            Opcode::Ge => "GE",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Label => "LABEL",
            Opcode::Jmp => "JMP",
            Opcode::Jz => "JZ",
            Opcode::Jnz => "JNZ",
            Opcode::Param => "PARAM",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Halt => "HALT",
        }
    }

    /// Arithmetic, relational, and logical operators: the ops eligible
    /// for constant folding and CSE (`NOT` and `ATR` are not).
    pub fn is_value_op(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Eq
                | Opcode::Ne
                | Opcode::Lt
                | Opcode::Gt
                | Opcode::Le
                | Opcode::Ge
                | Opcode::And
                | Opcode::Or
        )
    }

    /// Instructions at which the optimizer's per-pass state resets:
    /// labels, branches, and calls. The span between two boundaries
    /// approximates a basic block without building a CFG.
    pub fn is_block_boundary(self) -> bool {
        matches!(
            self,
            Opcode::Label | Opcode::Jmp | Opcode::Jz | Opcode::Jnz | Opcode::Call
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A jump target or entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// `MAIN`: program entry.
    Main,
    /// `FUNC_<name>`: function entry, name as declared.
    Func(Symbol),
    /// `L<n>`: generator-minted label.
    Seq(u32),
}

impl Label {
    pub fn render(self, interner: &Interner) -> String {
        match self {
            Label::Main => "MAIN".to_string(),
            Label::Func(name) => format!("FUNC_{}", interner.resolve(name)),
            Label::Seq(n) => format!("L{n}"),
        }
    }
}

/// A typed operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addr {
    /// Program variable, parameter, or function name.
    Name(Symbol),
    /// Generator temporary `T<n>`.
    Temp(u32),
    /// Numeric literal as written in source (or minted by folding).
    Num(Symbol),
    /// Boolean literal.
    Bool(bool),
    /// String literal without quotes; rendered quoted.
    Str(Symbol),
    /// Label reference.
    Label(Label),
}

impl Addr {
    /// `true` for literal operands (`Num`, `Bool`, `Str`).
    pub fn is_literal(self) -> bool {
        matches!(self, Addr::Num(_) | Addr::Bool(_) | Addr::Str(_))
    }

    /// `true` for identifiers copy propagation may track (`Name`, `Temp`).
    pub fn is_identifier(self) -> bool {
        matches!(self, Addr::Name(_) | Addr::Temp(_))
    }

    /// `true` for generator temporaries.
    pub fn is_temp(self) -> bool {
        matches!(self, Addr::Temp(_))
    }

    /// The numeric value when this is a `Num` literal.
    pub fn as_number(self, interner: &Interner) -> Option<f64> {
        match self {
            Addr::Num(raw) => interner.resolve(raw).parse().ok(),
            _ => None,
        }
    }

    pub fn render(self, interner: &Interner) -> String {
        match self {
            Addr::Name(name) => interner.resolve(name).to_string(),
            Addr::Temp(n) => format!("T{n}"),
            Addr::Num(raw) => interner.resolve(raw).to_string(),
            Addr::Bool(true) => "true".to_string(),
            Addr::Bool(false) => "false".to_string(),
            Addr::Str(value) => format!("\"{}\"", interner.resolve(value)),
            Addr::Label(label) => label.render(interner),
        }
    }
}

/// One three-address instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tac {
    pub op: Opcode,
    pub a1: Option<Addr>,
    pub a2: Option<Addr>,
    pub a3: Option<Addr>,
}

impl Tac {
    pub fn op0(op: Opcode) -> Self {
        Tac {
            op,
            a1: None,
            a2: None,
            a3: None,
        }
    }

    pub fn op1(op: Opcode, a1: Addr) -> Self {
        Tac {
            op,
            a1: Some(a1),
            a2: None,
            a3: None,
        }
    }

    pub fn op2(op: Opcode, a1: Addr, a2: Addr) -> Self {
        Tac {
            op,
            a1: Some(a1),
            a2: Some(a2),
            a3: None,
        }
    }

    pub fn op3(op: Opcode, a1: Addr, a2: Addr, a3: Addr) -> Self {
        Tac {
            op,
            a1: Some(a1),
            a2: Some(a2),
            a3: Some(a3),
        }
    }

    /// The address this instruction writes, if any. Covers `ATR`, the
    /// value ops, `NOT`, and `READ` (which stores into its operand).
    pub fn def(&self) -> Option<Addr> {
        match self.op {
            Opcode::Atr | Opcode::Not | Opcode::Read => self.a1,
            op if op.is_value_op() => self.a1,
            _ => None,
        }
    }

    /// Mutable references to the substitutable source slots (`a2`/`a3`).
    ///
    /// `a1` uses (the operands of `WRITE`/`RETURN`/`PARAM`) are
    /// deliberately not included: propagation leaves the observable
    /// sinks' operands by name, matching the reference listings.
    pub fn subst_slots_mut(&mut self) -> impl Iterator<Item = &mut Addr> {
        self.a2.iter_mut().chain(self.a3.iter_mut())
    }

    /// Every address this instruction reads: `a2`/`a3`, plus `a1` for
    /// the sink instructions that consume their first operand.
    pub fn used_addrs(&self) -> impl Iterator<Item = Addr> + '_ {
        let sink_a1 = matches!(
            self.op,
            Opcode::Jz | Opcode::Jnz | Opcode::Write | Opcode::Return | Opcode::Param
        );
        self.a2
            .into_iter()
            .chain(self.a3)
            .chain(if sink_a1 { self.a1 } else { None })
    }

    /// Renders the instruction in listing column layout (no index).
    pub fn render(&self, interner: &Interner) -> String {
        let mut parts = vec![format!("{:<8}", self.op.mnemonic())];
        for addr in [self.a1, self.a2, self.a3].into_iter().flatten() {
            parts.push(format!("{:<12}", addr.render(interner)));
        }
        let joined = parts.join("\t");
        joined.trim_end().to_string()
    }
}

/// Renders a full listing: header comments, then `<N>. <instruction>`
/// lines numbered from 1.
pub fn render_listing(instructions: &[Tac], interner: &Interner) -> String {
    let mut out = String::new();
    out.push_str("# Three-address intermediate code\n");
    out.push_str("# Generated by the pascaline compiler\n");
    out.push_str("# Format: OP ADDR1 ADDR2 ADDR3\n\n");
    for (index, instruction) in instructions.iter().enumerate() {
        out.push_str(&format!("{:4}. {}\n", index + 1, instruction.render(interner)));
    }
    out
}
