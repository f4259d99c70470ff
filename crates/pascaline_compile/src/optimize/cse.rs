//! Common-subexpression elimination.
//!
//! Within a block, the first computation of `(op, a2, a3)` is recorded
//! as available; a later identical computation becomes a copy of the
//! recorded destination:
//!
//! ```text
//! ADD  T1  a  b             ADD  T1  a  b
//! ADD  T2  a  b      =>     ATR  T2  T1
//! ```
//!
//! Replaced destinations go into a replacement map so downstream
//! operands key against the surviving temporary. A write to any name
//! invalidates every available expression mentioning it as an operand.
//! `NOT` and `ATR` are not candidates; only the binary value ops are.

use crate::tac::{Addr, Opcode, Tac};
use std::collections::HashMap;

pub fn eliminate_common_subexpressions(instructions: Vec<Tac>) -> Vec<Tac> {
    let mut available: HashMap<(Opcode, Addr, Addr), Addr> = HashMap::new();
    let mut replacements: HashMap<Addr, Addr> = HashMap::new();
    let mut out = Vec::with_capacity(instructions.len());

    for mut instruction in instructions {
        if instruction.op.is_block_boundary() {
            available.clear();
            replacements.clear();
        }

        for slot in instruction.subst_slots_mut() {
            if let Some(&replacement) = replacements.get(slot) {
                *slot = replacement;
            }
        }

        if instruction.op.is_value_op() {
            if let (Some(dest), Some(left), Some(right)) =
                (instruction.a1, instruction.a2, instruction.a3)
            {
                let key = (instruction.op, left, right);
                match available.get(&key).copied() {
                    Some(previous) => {
                        instruction = Tac::op2(Opcode::Atr, dest, previous);
                        replacements.insert(dest, previous);
                    }
                    None => {
                        available.insert(key, dest);
                    }
                }
            }
        }

        if let Some(dest) = instruction.def() {
            available.retain(|(_, left, right), _| *left != dest && *right != dest);
        }

        out.push(instruction);
    }

    out
}
