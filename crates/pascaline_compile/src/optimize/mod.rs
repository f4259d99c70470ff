//! Fixed-point peephole/dataflow optimizer.
//!
//! Five passes run in a fixed order (constant folding, constant
//! propagation, copy propagation, dead-code elimination, common-
//! subexpression elimination), and the whole sequence iterates until an
//! iteration leaves the instruction list structurally unchanged, bounded
//! by [`MAX_PASSES`] iterations.
//!
//! Every pass is block-local: its tracked state (constants map, copies
//! map, available expressions) clears at each `LABEL`, `JMP`, `JZ`,
//! `JNZ`, and `CALL` before that instruction is emitted. That
//! conservatively respects control-flow joins and call side effects
//! without building a CFG.
//!
//! Guarantees:
//!
//! - the output is never longer than the input;
//! - observable instructions (`READ`, `WRITE`, `CALL`, `PARAM`,
//!   `RETURN`, `HALT`) keep their relative order and operand values;
//! - definitions of non-temporary names are never removed;
//! - no new temporaries or labels are minted.

mod copy;
mod cse;
mod dce;
mod fold;
mod propagate;

pub use copy::propagate_copies;
pub use cse::eliminate_common_subexpressions;
pub use dce::eliminate_dead_code;
pub use fold::fold_constants;
pub use propagate::propagate_constants;

use crate::tac::Tac;
use pascaline_base::Interner;

/// Upper bound on optimizer iterations. Each pass only shrinks or
/// simplifies, so real programs converge in two or three; the bound
/// guarantees termination regardless.
pub const MAX_PASSES: usize = 10;

/// Runs the full pass sequence to a fixed point.
pub fn optimize(instructions: Vec<Tac>, interner: &mut Interner) -> Vec<Tac> {
    let mut current = instructions;
    for _ in 0..MAX_PASSES {
        let previous = current.clone();
        current = fold_constants(current, interner);
        current = propagate_constants(current);
        current = propagate_copies(current);
        current = eliminate_dead_code(current);
        current = eliminate_common_subexpressions(current);
        if current == previous {
            break;
        }
    }
    current
}
