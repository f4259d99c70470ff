//! Constant folding.
//!
//! An arithmetic, relational, or logical instruction whose source
//! operands are both literals collapses to `ATR dest <result>`:
//!
//! ```text
//! ADD  T1  5  3      =>   ATR  T1  8
//! ```
//!
//! Numeric results that come out integer-valued render without a
//! fractional part; comparisons produce `true`/`false`. Division by zero
//! is left alone for the runtime to trap. `AND`/`OR` fold over numeric
//! operands (zero is false) and over boolean literals minted by earlier
//! folds.

use crate::tac::{Addr, Opcode, Tac};
use pascaline_base::Interner;

pub fn fold_constants(instructions: Vec<Tac>, interner: &mut Interner) -> Vec<Tac> {
    instructions
        .into_iter()
        .map(|instruction| {
            if !instruction.op.is_value_op() {
                return instruction;
            }
            let (Some(dest), Some(left), Some(right)) =
                (instruction.a1, instruction.a2, instruction.a3)
            else {
                return instruction;
            };
            match eval(instruction.op, left, right, interner) {
                Some(result) => Tac::op2(Opcode::Atr, dest, result),
                None => instruction,
            }
        })
        .collect()
}

/// Evaluates one value op over literal operands, or `None` when the
/// operands are not literal (or the fold is unsafe).
fn eval(op: Opcode, left: Addr, right: Addr, interner: &mut Interner) -> Option<Addr> {
    if let (Some(l), Some(r)) = (left.as_number(interner), right.as_number(interner)) {
        return eval_numeric(op, l, r, interner);
    }
    if let (Addr::Bool(l), Addr::Bool(r)) = (left, right) {
        return eval_boolean(op, l, r);
    }
    None
}

fn eval_numeric(op: Opcode, l: f64, r: f64, interner: &mut Interner) -> Option<Addr> {
    let numeric = |value: f64, interner: &mut Interner| {
        Some(Addr::Num(interner.intern(&format_number(value))))
    };
    match op {
        Opcode::Add => numeric(l + r, interner),
        Opcode::Sub => numeric(l - r, interner),
        Opcode::Mul => numeric(l * r, interner),
        Opcode::Div if r != 0.0 => numeric(l / r, interner),
        Opcode::Div => None,
        Opcode::Eq => Some(Addr::Bool(l == r)),
        Opcode::Ne => Some(Addr::Bool(l != r)),
        Opcode::Lt => Some(Addr::Bool(l < r)),
        Opcode::Gt => Some(Addr::Bool(l > r)),
        Opcode::Le => Some(Addr::Bool(l <= r)),
        Opcode::Ge => Some(Addr::Bool(l >= r)),
        Opcode::And => Some(Addr::Bool(l != 0.0 && r != 0.0)),
        Opcode::Or => Some(Addr::Bool(l != 0.0 || r != 0.0)),
        _ => None,
    }
}

fn eval_boolean(op: Opcode, l: bool, r: bool) -> Option<Addr> {
    match op {
        Opcode::And => Some(Addr::Bool(l && r)),
        Opcode::Or => Some(Addr::Bool(l || r)),
        _ => None,
    }
}

/// Integer-valued results serialize without a fractional part.
fn format_number(value: f64) -> String {
    if value.is_finite() && value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_valued_results_have_no_fraction() {
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(10.0 / 4.0), "2.5");
    }

    #[test]
    fn folds_arithmetic_to_atr() {
        let mut interner = Interner::new();
        let five = Addr::Num(interner.intern("5"));
        let three = Addr::Num(interner.intern("3"));
        let dest = Addr::Temp(1);
        let out = fold_constants(vec![Tac::op3(Opcode::Add, dest, five, three)], &mut interner);
        let eight = Addr::Num(interner.intern("8"));
        assert_eq!(out, vec![Tac::op2(Opcode::Atr, dest, eight)]);
    }

    #[test]
    fn division_by_zero_is_not_folded() {
        let mut interner = Interner::new();
        let one = Addr::Num(interner.intern("1"));
        let zero = Addr::Num(interner.intern("0"));
        let instruction = Tac::op3(Opcode::Div, Addr::Temp(1), one, zero);
        let out = fold_constants(vec![instruction.clone()], &mut interner);
        assert_eq!(out, vec![instruction]);
    }

    #[test]
    fn comparisons_fold_to_boolean_literals() {
        let mut interner = Interner::new();
        let one = Addr::Num(interner.intern("1"));
        let two = Addr::Num(interner.intern("2"));
        let out = fold_constants(
            vec![
                Tac::op3(Opcode::Lt, Addr::Temp(1), one, two),
                Tac::op3(Opcode::Eq, Addr::Temp(2), one, two),
            ],
            &mut interner,
        );
        assert_eq!(out[0], Tac::op2(Opcode::Atr, Addr::Temp(1), Addr::Bool(true)));
        assert_eq!(out[1], Tac::op2(Opcode::Atr, Addr::Temp(2), Addr::Bool(false)));
    }

    #[test]
    fn logical_ops_fold_over_numbers_and_booleans() {
        let mut interner = Interner::new();
        let zero = Addr::Num(interner.intern("0"));
        let seven = Addr::Num(interner.intern("7"));
        let out = fold_constants(
            vec![
                Tac::op3(Opcode::And, Addr::Temp(1), seven, zero),
                Tac::op3(Opcode::Or, Addr::Temp(2), Addr::Bool(false), Addr::Bool(true)),
            ],
            &mut interner,
        );
        assert_eq!(out[0], Tac::op2(Opcode::Atr, Addr::Temp(1), Addr::Bool(false)));
        assert_eq!(out[1], Tac::op2(Opcode::Atr, Addr::Temp(2), Addr::Bool(true)));
    }

    #[test]
    fn identifier_operands_are_left_alone() {
        let mut interner = Interner::new();
        let a = Addr::Name(interner.intern("a"));
        let one = Addr::Num(interner.intern("1"));
        let instruction = Tac::op3(Opcode::Add, Addr::Temp(1), a, one);
        let out = fold_constants(vec![instruction.clone()], &mut interner);
        assert_eq!(out, vec![instruction]);
    }
}
