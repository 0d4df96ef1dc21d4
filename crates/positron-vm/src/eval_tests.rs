use positron_core::{Expr, Pattern, Program, Rule, Span};

use crate::{Evaluator, FuelLimits, RuntimeError};

fn rule(pattern: Pattern, body: Expr) -> Rule {
    Rule {
        pattern,
        body,
        span: Span::DUMMY,
    }
}

/// `(add [Z] y) -> y | (add [S x] y) -> [S (add x y)]`
fn add_program() -> Program {
    Program {
        rules: vec![
            rule(
                Pattern::new("add", vec![Expr::ctr("Z", vec![]), Expr::var("y")]),
                Expr::var("y"),
            ),
            rule(
                Pattern::new(
                    "add",
                    vec![Expr::ctr("S", vec![Expr::var("x")]), Expr::var("y")],
                ),
                Expr::ctr(
                    "S",
                    vec![Expr::call("add", vec![Expr::var("x"), Expr::var("y")])],
                ),
            ),
        ],
        ..Program::default()
    }
}

fn church(n: u64) -> Expr {
    let mut out = Expr::ctr("Z", vec![]);
    for _ in 0..n {
        out = Expr::ctr("S", vec![out]);
    }
    out
}

#[test]
fn normalizes_ground_addition() {
    let prog = add_program();
    let call = Expr::call("add", vec![church(2), church(3)]);
    let result = Evaluator::new(&prog).normalize(&call).unwrap();
    assert_eq!(result, church(5));
}

#[test]
fn normal_forms_do_not_step() {
    let prog = add_program();
    let evaluator = Evaluator::new(&prog);
    assert!(evaluator.step(&church(2)).is_none());
    assert!(evaluator.step(&Expr::var("x")).is_none());
    assert!(evaluator.step(&Expr::lit(7)).is_none());
}

#[test]
fn steps_inside_constructors() {
    let prog = add_program();
    let expr = Expr::ctr("Pair", vec![Expr::call("add", vec![church(0), church(1)]), church(0)]);
    let result = Evaluator::new(&prog).normalize(&expr).unwrap();
    assert_eq!(result, Expr::ctr("Pair", vec![church(1), church(0)]));
}

#[test]
fn open_calls_are_stuck() {
    // (add a b) has no matching rule for a free variable first argument.
    let prog = add_program();
    let call = Expr::call("add", vec![Expr::var("a"), Expr::var("b")]);
    let result = Evaluator::new(&prog).normalize(&call).unwrap();
    assert_eq!(result, call);
}

#[test]
fn fuel_bounds_divergent_programs() {
    let prog = Program {
        rules: vec![rule(
            Pattern::new("spin", vec![]),
            Expr::call("spin", vec![]),
        )],
        ..Program::default()
    };
    let err = Evaluator::new(&prog)
        .limits(FuelLimits::new().exec_fuel(50))
        .normalize(&Expr::call("spin", vec![]))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::FuelExhausted));
}
