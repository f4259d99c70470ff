//! Copy propagation.
//!
//! Tracks `name -> name` bindings established by `ATR x y` where `y` is
//! an identifier, and substitutes the original for the copy at later
//! use sites:
//!
//! ```text
//! ATR  T1  a                ATR  T1  a
//! ADD  T2  T1  b     =>     ADD  T2  a  b
//! ```
//!
//! A write to `x` drops `x`'s own binding and every binding whose value
//! is `x` (the source those copies pointed at is gone). Dead-code
//! elimination then removes the orphaned `ATR` when its target was a
//! temporary.

use crate::tac::{Addr, Opcode, Tac};
use std::collections::HashMap;

pub fn propagate_copies(instructions: Vec<Tac>) -> Vec<Tac> {
    let mut copies: HashMap<Addr, Addr> = HashMap::new();
    let mut out = Vec::with_capacity(instructions.len());

    for mut instruction in instructions {
        if instruction.op.is_block_boundary() {
            copies.clear();
        }

        for slot in instruction.subst_slots_mut() {
            if let Some(&original) = copies.get(slot) {
                *slot = original;
            }
        }

        if let Some(dest) = instruction.def() {
            copies.remove(&dest);
            copies.retain(|_, value| *value != dest);
            if instruction.op == Opcode::Atr {
                if let Some(source) = instruction.a2 {
                    if source.is_identifier() && source != dest {
                        copies.insert(dest, source);
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
    fn copy_source_replaces_the_copy() {
        let mut interner = Interner::new();
        let a = Addr::Name(interner.intern("a"));
        let b = Addr::Name(interner.intern("b"));
        let t1 = Addr::Temp(1);
        let out = propagate_copies(vec![
            Tac::op2(Opcode::Atr, t1, a),
            Tac::op3(Opcode::Add, Addr::Temp(2), t1, b),
        ]);
        assert_eq!(out[1], Tac::op3(Opcode::Add, Addr::Temp(2), a, b));
    }

    #[test]
    fn literal_assignments_are_not_copies() {
        let mut interner = Interner::new();
        let five = Addr::Num(interner.intern("5"));
        let t1 = Addr::Temp(1);
        let use_t1 = Tac::op3(Opcode::Add, Addr::Temp(2), t1, five);
        let out = propagate_copies(vec![Tac::op2(Opcode::Atr, t1, five), use_t1.clone()]);
        assert_eq!(out[1], use_t1);
    }

    #[test]
    fn redefining_the_source_kills_dependent_copies() {
        let mut interner = Interner::new();
        let a = Addr::Name(interner.intern("a"));
        let b = Addr::Name(interner.intern("b"));
        let c = Addr::Name(interner.intern("c"));
        let t1 = Addr::Temp(1);
        let use_t1 = Tac::op3(Opcode::Add, Addr::Temp(2), t1, b);
        let out = propagate_copies(vec![
            Tac::op2(Opcode::Atr, t1, a),
            Tac::op3(Opcode::Add, a, b, c), // a changes; T1 no longer mirrors it
            use_t1.clone(),
        ]);
        assert_eq!(out[2], use_t1);
    }

    #[test]
    fn chain_resolves_through_the_map() {
        let mut interner = Interner::new();
        let a = Addr::Name(interner.intern("a"));
        let t1 = Addr::Temp(1);
        let t2 = Addr::Temp(2);
        let out = propagate_copies(vec![
            Tac::op2(Opcode::Atr, t1, a),
            Tac::op2(Opcode::Atr, t2, t1),
            Tac::op1(Opcode::Param, t2),
        ]);
        // T2's copy registers the substituted source, so it points at a
        assert_eq!(out[1], Tac::op2(Opcode::Atr, t2, a));
        // PARAM consumes a1, which substitution leaves alone
        assert_eq!(out[2], Tac::op1(Opcode::Param, t2));
    }

    #[test]
    fn copies_die_at_calls() {
        let mut interner = Interner::new();
        let a = Addr::Name(interner.intern("a"));
        let f = Addr::Label(crate::tac::Label::Func(interner.intern("f")));
        let zero = Addr::Num(interner.intern("0"));
        let t1 = Addr::Temp(1);
        let use_t1 = Tac::op3(Opcode::Add, Addr::Temp(2), t1, a);
        let out = propagate_copies(vec![
            Tac::op2(Opcode::Atr, t1, a),
            Tac::op2(Opcode::Call, f, zero),
            use_t1.clone(),
        ]);
        assert_eq!(out[2], use_t1);
    }
}
