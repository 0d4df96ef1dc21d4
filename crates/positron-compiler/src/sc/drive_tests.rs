use indoc::indoc;
use positron_core::{Expr, Program, TypeExpr, VarTypes};

use super::drive::{Driver, Step};
use super::tree::Contraction;
use super::EngineError;
use crate::parser::{parse_expr, parse_program};

const NAT_PROG: &str = indoc! {"
    type [Nat] : Z | S [Nat] .
    type [Bool] : True | False .

    fun (add [Nat] [Nat]) -> [Nat] :
        (add [Z] y) -> y
      | (add [S x] y) -> [S (add x y)] .

    fun (eq [Nat] [Nat]) -> [Bool] :
        (eq [Z] [Z]) -> [True]
      | (eq [Z] [S x]) -> [False]
      | (eq [S x] [Z]) -> [False]
      | (eq [S x] [S y]) -> (eq x y) .

    fun (dbl [Nat]) -> [Nat] :
        (dbl [Z]) -> [Z]
      | (dbl [S x]) -> [S [S (dbl x)]] .
"};

fn prog() -> Program {
    parse_program(NAT_PROG).unwrap()
}

fn nat_ctx(vars: &[&str]) -> VarTypes {
    let mut ctx = VarTypes::new();
    for v in vars {
        ctx.insert(v.to_string(), TypeExpr::new("Nat", vec![]));
    }
    ctx
}

fn e(text: &str) -> Expr {
    parse_expr(text).unwrap()
}

#[test]
fn passive_configurations_stop() {
    let prog = prog();
    let mut driver = Driver::new(&prog);
    assert!(matches!(driver.drive(&e("x"), &nat_ctx(&[])), Ok(Step::Stop)));
    assert!(matches!(driver.drive(&e("42"), &nat_ctx(&[])), Ok(Step::Stop)));
}

#[test]
fn constructors_decompose_into_their_arguments() {
    let prog = prog();
    let mut driver = Driver::new(&prog);
    let Ok(Step::Decompose(parts)) = driver.drive(&e("[Cons x (f y)]"), &nat_ctx(&[])) else {
        panic!("expected decompose");
    };
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1].to_string(), "(f y)");
}

#[test]
fn outright_match_is_transient() {
    let prog = prog();
    let mut driver = Driver::new(&prog);
    let Ok(Step::Transient(next)) = driver.drive(&e("(add [S [Z]] a)"), &nat_ctx(&["a"])) else {
        panic!("expected transient");
    };
    assert_eq!(next.to_string(), "[S (add [Z] a)]");
}

#[test]
fn blocked_call_branches_per_constructor_with_dedup() {
    // All four eq rules block on `a`; only one branch per constructor.
    let prog = prog();
    let mut driver = Driver::new(&prog);
    let Ok(Step::Variant(branches)) = driver.drive(&e("(eq a b)"), &nat_ctx(&["a", "b"])) else {
        panic!("expected variant");
    };
    assert_eq!(branches.len(), 2);

    match &branches[0].contraction {
        Contraction::Case { var, ctr, params } => {
            assert_eq!(var, "a");
            assert_eq!(ctr, "Z");
            assert!(params.is_empty());
        }
        other => panic!("unexpected contraction {other:?}"),
    }
    // The refinement is visible in the branch body but not yet reduced; the
    // second argument still blocks.
    assert_eq!(branches[0].expr.to_string(), "(eq [Z] b)");

    match &branches[1].contraction {
        Contraction::Case { var, ctr, params } => {
            assert_eq!(var, "a");
            assert_eq!(ctr, "S");
            assert_eq!(params.len(), 1);
        }
        other => panic!("unexpected contraction {other:?}"),
    }
}

#[test]
fn branches_reduce_eagerly_when_unblocked() {
    let prog = prog();
    let mut driver = Driver::new(&prog);
    let Ok(Step::Variant(branches)) = driver.drive(&e("(add a b)"), &nat_ctx(&["a", "b"])) else {
        panic!("expected variant");
    };
    assert_eq!(branches[0].expr.to_string(), "b");
    assert_eq!(branches[1].expr.to_string(), "[S (add v1 b)]");
    // The fresh field variable is typed in the branch context.
    assert_eq!(branches[1].var_types["v1"].name, "Nat");
}

#[test]
fn earlier_narrowings_outrank_later_matches() {
    let prog = parse_program(indoc! {"
        type [Nat] : Z | S [Nat] .
        fun (f [Nat] [Nat]) -> [Nat] :
            (f [Z] y) -> y
          | (f x y) -> x .
    "})
    .unwrap();
    let mut driver = Driver::new(&prog);
    let Ok(Step::Variant(branches)) = driver.drive(&e("(f a b)"), &nat_ctx(&["a", "b"])) else {
        panic!("expected variant");
    };
    // The later catch-all matched outright, but rule order wins: only the
    // accumulated Z branch is emitted.
    assert_eq!(branches.len(), 1);
    assert!(matches!(
        &branches[0].contraction,
        Contraction::Case { ctr, .. } if ctr == "Z"
    ));
}

#[test]
fn nested_transient_is_lifted() {
    let prog = prog();
    let mut driver = Driver::new(&prog);
    let Ok(Step::Transient(next)) = driver.drive(&e("(dbl (dbl [Z]))"), &nat_ctx(&[])) else {
        panic!("expected transient");
    };
    assert_eq!(next.to_string(), "(dbl [Z])");
}

#[test]
fn nested_variant_refines_the_whole_configuration() {
    let prog = prog();
    let mut driver = Driver::new(&prog);
    let Ok(Step::Variant(branches)) = driver.drive(&e("(add (add a b) a)"), &nat_ctx(&["a", "b"]))
    else {
        panic!("expected variant");
    };
    assert_eq!(branches.len(), 2);
    // The contraction a := [S v1] must also reach the outer occurrence of a.
    assert_eq!(branches[0].expr.to_string(), "(add b [Z])");
    assert_eq!(
        branches[1].expr.to_string(),
        "(add [S (add v1 b)] [S v1])"
    );
}

#[test]
fn untyped_narrowing_variable_is_fatal() {
    let prog = prog();
    let mut driver = Driver::new(&prog);
    let err = driver.drive(&e("(add a b)"), &nat_ctx(&["b"])).unwrap_err();
    assert!(matches!(err, EngineError::UntypedVariable { ref var, .. } if var == "a"));
}
