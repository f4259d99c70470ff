//! E2E optimizer tests: the five passes composed to a fixed point,
//! plus the ordering and idempotence guarantees.

mod common;

use common::{compile_ok, count_op, lines, observable_ops};
use pascaline_base::Interner;
use pascaline_compile::optimize::{
    eliminate_dead_code, fold_constants, optimize, propagate_constants, propagate_copies,
};
use pascaline_compile::{Addr, Opcode, Tac};

#[test]
fn folding_and_dce_collapse_a_constant_expression() {
    // x := 5 + 3 ends as a direct store; no ADD survives and WRITE
    // still names the program variable.
    let result = compile_ok(
        "program p; var x: integer;\nbegin x := 5 + 3; write(x); end.",
    );
    assert_eq!(
        lines(&result.optimized, &result.interner),
        vec!["LABEL MAIN", "ATR x 8", "WRITE x", "HALT"]
    );
    assert_eq!(count_op(&result.optimized, Opcode::Add), 0);
}

#[test]
fn common_subexpression_is_computed_once() {
    // Two `a + b` computations; one ADD survives and both targets
    // copy the same temporary.
    let result = compile_ok(
        "program p; var a,b,c,d: integer;\nbegin c := a + b; d := a + b; end.",
    );
    assert_eq!(count_op(&result.tac, Opcode::Add), 2);
    assert_eq!(count_op(&result.optimized, Opcode::Add), 1);
    assert_eq!(
        lines(&result.optimized, &result.interner),
        vec![
            "LABEL MAIN",
            "ADD T1 a b",
            "ATR c T1",
            "ATR d T1",
            "HALT",
        ]
    );
}

#[test]
fn while_loop_survives_optimization_intact() {
    // The loop keeps exactly one start label, one exit branch, one
    // back jump, and one end label.
    let result = compile_ok(
        "program p; var i: integer;\nbegin i := 0; while (i < 10) do i := i + 1; end.",
    );
    assert_eq!(result.optimized, result.tac);
    assert_eq!(count_op(&result.optimized, Opcode::Jz), 1);
    assert_eq!(count_op(&result.optimized, Opcode::Jmp), 1);
    assert_eq!(count_op(&result.optimized, Opcode::Label), 3); // MAIN + L1 + L2
}

#[test]
fn copy_propagation_feeds_dead_code_elimination() {
    // ATR T1 A; ADD T2 T1 B: after copy propagation the ADD reads A
    // directly and T1's definition is dead.
    let mut interner = Interner::new();
    let a = Addr::Name(interner.intern("A"));
    let b = Addr::Name(interner.intern("B"));
    let t1 = Addr::Temp(1);
    let t2 = Addr::Temp(2);
    let program = vec![
        Tac::op2(Opcode::Atr, t1, a),
        Tac::op3(Opcode::Add, t2, t1, b),
        Tac::op1(Opcode::Write, t2),
    ];
    let after = eliminate_dead_code(propagate_copies(program));
    assert_eq!(
        after,
        vec![Tac::op3(Opcode::Add, t2, a, b), Tac::op1(Opcode::Write, t2)]
    );
}

#[test]
fn constant_propagation_cascades_through_folding() {
    let result = compile_ok(
        "program p; var x, y: integer; begin x := 5; y := x + 3; write(y) end.",
    );
    assert_eq!(
        lines(&result.optimized, &result.interner),
        vec![
            "LABEL MAIN",
            "ATR x 5",
            "ATR y 8",
            "WRITE y",
            "HALT",
        ]
    );
}

#[test]
fn division_by_literal_zero_is_never_folded() {
    let result = compile_ok(
        "program p; var x: integer; begin x := 1 / 0; write(x) end.",
    );
    assert_eq!(count_op(&result.optimized, Opcode::Div), 1);
    assert!(lines(&result.optimized, &result.interner)
        .contains(&"DIV T1 1 0".to_string()));
}

#[test]
fn optimizer_is_idempotent() {
    let sources = [
        "program p; var x: integer; begin x := 5 + 3; write(x) end.",
        "program p; var a,b,c,d: integer; begin c := a + b; d := a + b end.",
        "program p; var i: integer; begin i := 0; while (i < 10) do i := i + 1 end.",
        "program p; var x, y: integer; begin x := 2 * 3; y := x + x; write(y) end.",
    ];
    for source in sources {
        let mut result = compile_ok(source);
        let again = optimize(result.optimized.clone(), &mut result.interner);
        assert_eq!(again, result.optimized, "not a fixed point for:\n{source}");
    }
}

#[test]
fn folding_and_propagation_commute_at_the_fixed_point() {
    let mut result = compile_ok(
        "program p; var x, y: integer; begin x := 5; y := x + 3; write(y) end.",
    );
    let fixed = result.optimized.clone();
    let fold_then_prop =
        propagate_constants(fold_constants(fixed.clone(), &mut result.interner));
    let prop_then_fold =
        fold_constants(propagate_constants(fixed.clone()), &mut result.interner);
    assert_eq!(fold_then_prop, fixed);
    assert_eq!(prop_then_fold, fixed);
}

#[test]
fn observable_instructions_keep_their_relative_order() {
    let result = compile_ok(
        "program p; var a, b: integer; \
         function f(n: integer): integer; begin f := n + 1 end; \
         begin read(a); b := f(a); write(b); write(1 + 1) end.",
    );
    let before = observable_ops(&result.tac);
    let after = observable_ops(&result.optimized);
    assert_eq!(before, after);
}

#[test]
fn optimized_output_is_never_longer() {
    let sources = [
        "program p; begin end.",
        "program p; var x: integer; begin x := 1 end.",
        "program p; var x: integer; begin x := 5 + 3; write(x) end.",
        "program p; var i: integer; begin i := 0; while (i < 10) do i := i + 1 end.",
    ];
    for source in sources {
        let result = compile_ok(source);
        assert!(
            result.optimized.len() <= result.tac.len(),
            "optimizer grew the list for:\n{source}"
        );
    }
}

#[test]
fn comparisons_fold_to_boolean_literals() {
    let result = compile_ok(
        "program p; var x: integer; begin if (2 < 3) then write(x); end.",
    );
    let rendered = lines(&result.optimized, &result.interner);
    assert!(rendered.contains(&"ATR T1 true".to_string()), "{rendered:?}");
    assert_eq!(count_op(&result.optimized, Opcode::Lt), 0);
}

#[test]
fn propagation_stops_at_labels() {
    // x := 5 happens on one side of a join; the use after the label
    // must not see the constant.
    let result = compile_ok(
        "program p; var x, y: integer; \
         begin if (x = 0) then x := 5; y := x + 1; end.",
    );
    assert_eq!(count_op(&result.optimized, Opcode::Add), 1);
    assert!(lines(&result.optimized, &result.interner)
        .contains(&"ADD T2 x 1".to_string()));
}

#[test]
fn propagation_stops_at_calls() {
    let result = compile_ok(
        "program p; var x, y: integer; \
         function f(): integer; begin f := 1 end; \
         begin x := 5; y := f(); y := x + y; write(y) end.",
    );
    // x := 5 cannot reach past CALL f; the ADD keeps reading x.
    let rendered = lines(&result.optimized, &result.interner);
    assert!(
        rendered.iter().any(|l| l.starts_with("ADD") && l.contains(" x ")),
        "{rendered:?}"
    );
}

#[test]
fn dead_temporary_chains_drain_across_iterations() {
    // y is never observed, but y is a program variable so its stores
    // stay; the intermediate temporaries behind folded math disappear.
    let result = compile_ok(
        "program p; var y: integer; begin y := 1 + 2 + 3 end.",
    );
    assert_eq!(
        lines(&result.optimized, &result.interner),
        vec!["LABEL MAIN", "ATR y 6", "HALT"]
    );
}

#[test]
fn string_constants_propagate_like_numbers() {
    let result = compile_ok(
        "program p; var s, t: string; begin s := \"hi\"; t := s; end.",
    );
    assert_eq!(
        lines(&result.optimized, &result.interner),
        vec![
            "LABEL MAIN",
            "ATR s \"hi\"",
            "ATR t \"hi\"",
            "HALT",
        ]
    );
}

#[test]
fn read_blocks_constant_propagation() {
    let result = compile_ok(
        "program p; var x, y: integer; begin x := 5; read(x); y := x + 1; write(y) end.",
    );
    let rendered = lines(&result.optimized, &result.interner);
    assert!(
        rendered.contains(&"ADD T1 x 1".to_string()),
        "READ must invalidate x's constant binding: {rendered:?}"
    );
}
