//! Dead-code elimination.
//!
//! Two linear passes: collect every address the list reads (source
//! operands everywhere, plus the consumed `a1` of `JZ`/`JNZ`/`WRITE`/
//! `RETURN`/`PARAM`), then drop each effect-free definition (`ATR`, the
//! value ops, `NOT`) whose destination is an unread *temporary*.
//!
//! Program identifiers are never eliminated: they are the observable
//! final state. `READ` also writes its operand but stays regardless,
//! because consuming input is an effect.

use crate::tac::{Opcode, Tac};
use std::collections::HashSet;

pub fn eliminate_dead_code(instructions: Vec<Tac>) -> Vec<Tac> {
    let mut used = HashSet::new();
    for instruction in &instructions {
        used.extend(instruction.used_addrs());
    }

    instructions
        .into_iter()
        .filter(|instruction| {
            let removable_def =
                matches!(instruction.op, Opcode::Atr | Opcode::Not) || instruction.op.is_value_op();
            if !removable_def {
                return true;
            }
            match instruction.a1 {
                Some(dest) if dest.is_temp() => used.contains(&dest),
                _ => true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::Addr;
    use pascaline_base::Interner;

    #[test]
    fn unread_temporary_definition_is_dropped() {
        let mut interner = Interner::new();
        let five = Addr::Num(interner.intern("5"));
        let out = eliminate_dead_code(vec![
            Tac::op2(Opcode::Atr, Addr::Temp(1), five),
            Tac::op0(Opcode::Halt),
        ]);
        assert_eq!(out, vec![Tac::op0(Opcode::Halt)]);
    }

    #[test]
    fn program_identifiers_are_never_dropped() {
        let mut interner = Interner::new();
        let x = Addr::Name(interner.intern("x"));
        let five = Addr::Num(interner.intern("5"));
        let assignment = Tac::op2(Opcode::Atr, x, five);
        let out = eliminate_dead_code(vec![assignment.clone()]);
        assert_eq!(out, vec![assignment]);
    }

    #[test]
    fn sink_a1_counts_as_a_use() {
        let mut interner = Interner::new();
        let a = Addr::Name(interner.intern("a"));
        let t1 = Addr::Temp(1);
        let program = vec![Tac::op2(Opcode::Atr, t1, a), Tac::op1(Opcode::Write, t1)];
        assert_eq!(eliminate_dead_code(program.clone()), program);
    }

    #[test]
    fn read_stays_even_when_target_temp_is_unread() {
        let input = vec![Tac::op1(Opcode::Read, Addr::Temp(1))];
        assert_eq!(eliminate_dead_code(input.clone()), input);
    }

    #[test]
    fn chain_of_dead_temps_needs_one_pass_per_link() {
        let mut interner = Interner::new();
        let a = Addr::Name(interner.intern("a"));
        let t1 = Addr::Temp(1);
        let t2 = Addr::Temp(2);
        // T2 reads T1, nothing reads T2: first pass removes T2's def,
        // the next fixed-point iteration removes T1's.
        let first = eliminate_dead_code(vec![
            Tac::op2(Opcode::Atr, t1, a),
            Tac::op3(Opcode::Add, t2, t1, a),
        ]);
        assert_eq!(first, vec![Tac::op2(Opcode::Atr, t1, a)]);
        let second = eliminate_dead_code(first);
        assert!(second.is_empty());
    }
}
