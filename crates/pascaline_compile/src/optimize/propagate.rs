//! Constant propagation.
//!
//! Tracks `name -> literal` bindings established by `ATR x <literal>`
//! and substitutes them into later source operands within the same
//! block:
//!
//! ```text
//! ATR  x   5                ATR  x   5
//! ADD  T1  x  3      =>     ADD  T1  5  3
//! ```
//!
//! Any other write to a tracked name (including `READ`) drops its
//! binding. Numeric, boolean, and string literals all propagate; the
//! identifier-to-identifier case belongs to copy propagation.

use crate::tac::{Addr, Opcode, Tac};
use std::collections::HashMap;

pub fn propagate_constants(instructions: Vec<Tac>) -> Vec<Tac> {
    let mut constants: HashMap<Addr, Addr> = HashMap::new();
    let mut out = Vec::with_capacity(instructions.len());

    for mut instruction in instructions {
        if instruction.op.is_block_boundary() {
            constants.clear();
        }

        for slot in instruction.subst_slots_mut() {
            if let Some(&literal) = constants.get(slot) {
                *slot = literal;
            }
        }

        if let Some(dest) = instruction.def() {
            constants.remove(&dest);
            if instruction.op == Opcode::Atr {
                if let Some(source) = instruction.a2 {
                    if source.is_literal() {
                        constants.insert(dest, source);
                    }
                }
            }
        }

        out.push(instruction);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pascaline_base::Interner;

    #[test]
    fn literal_binding_substitutes_into_sources() {
        let mut interner = Interner::new();
        let x = Addr::Name(interner.intern("x"));
        let five = Addr::Num(interner.intern("5"));
        let three = Addr::Num(interner.intern("3"));
        let out = propagate_constants(vec![
            Tac::op2(Opcode::Atr, x, five),
            Tac::op3(Opcode::Add, Addr::Temp(1), x, three),
        ]);
        assert_eq!(out[1], Tac::op3(Opcode::Add, Addr::Temp(1), five, three));
    }

    #[test]
    fn binding_dies_at_block_boundary() {
        let mut interner = Interner::new();
        let x = Addr::Name(interner.intern("x"));
        let five = Addr::Num(interner.intern("5"));
        let label = Addr::Label(crate::tac::Label::Seq(1));
        let add = Tac::op3(Opcode::Add, Addr::Temp(1), x, five);
        let out = propagate_constants(vec![
            Tac::op2(Opcode::Atr, x, five),
            Tac::op1(Opcode::Label, label),
            add.clone(),
        ]);
        assert_eq!(out[2], add);
    }

    #[test]
    fn any_write_invalidates_the_binding() {
        let mut interner = Interner::new();
        let x = Addr::Name(interner.intern("x"));
        let a = Addr::Name(interner.intern("a"));
        let b = Addr::Name(interner.intern("b"));
        let five = Addr::Num(interner.intern("5"));
        let use_x = Tac::op3(Opcode::Add, Addr::Temp(1), x, x);
        let out = propagate_constants(vec![
            Tac::op2(Opcode::Atr, x, five),
            Tac::op3(Opcode::Add, x, a, b), // redefines x, not a literal
            use_x.clone(),
        ]);
        assert_eq!(out[2], use_x);
    }

    #[test]
    fn read_invalidates_the_binding() {
        let mut interner = Interner::new();
        let x = Addr::Name(interner.intern("x"));
        let five = Addr::Num(interner.intern("5"));
        let use_x = Tac::op3(Opcode::Add, Addr::Temp(1), x, five);
        let out = propagate_constants(vec![
            Tac::op2(Opcode::Atr, x, five),
            Tac::op1(Opcode::Read, x),
            use_x.clone(),
        ]);
        assert_eq!(out[2], use_x);
    }

    #[test]
    fn sink_operands_are_not_rewritten() {
        let mut interner = Interner::new();
        let x = Addr::Name(interner.intern("x"));
        let five = Addr::Num(interner.intern("5"));
        let out = propagate_constants(vec![
            Tac::op2(Opcode::Atr, x, five),
            Tac::op1(Opcode::Write, x),
        ]);
        // WRITE consumes a1, which propagation leaves by name
        assert_eq!(out[1], Tac::op1(Opcode::Write, x));
    }
}
