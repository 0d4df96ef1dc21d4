use indoc::indoc;
use positron_core::{Expr, Program, TypeExpr, VarTypes};

use super::{Contraction, ProcessTree, ScLimits, Strategy};
use crate::parser::parse_expr;
use crate::pipeline;
use crate::Error;

const NAT_SUITE: &str = indoc! {"
    type [Nat] : Z | S [Nat] .
    type [Bool] : True | False .

    fun (add [Nat] [Nat]) -> [Nat] :
        (add [Z] y) -> y
      | (add [S x] y) -> [S (add x y)] .

    fun (addAcc [Nat] [Nat]) -> [Nat] :
        (addAcc [Z] y) -> y
      | (addAcc [S x] y) -> (addAcc x [S y]) .

    fun (eq [Nat] [Nat]) -> [Bool] :
        (eq [Z] [Z]) -> [True]
      | (eq [Z] [S x]) -> [False]
      | (eq [S x] [Z]) -> [False]
      | (eq [S x] [S y]) -> (eq x y) .
"};

fn specialize(expr: &str, vars: &[&str], strategy: Strategy) -> (ProcessTree, Program) {
    let checked = pipeline::parse(NAT_SUITE).unwrap().check().unwrap();
    let start = parse_expr(expr).unwrap();
    let mut ctx = VarTypes::new();
    for v in vars {
        ctx.insert(v.to_string(), TypeExpr::new("Nat", vec![]));
    }
    let outcome = checked
        .supercompile(start, ctx, strategy, ScLimits::default())
        .unwrap();
    (outcome.tree, outcome.residual)
}

/// Every node reachable from the root, depth-first.
fn reachable(tree: &ProcessTree) -> Vec<super::NodeId> {
    let mut out = vec![tree.root()];
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        for &child in &tree[id].children {
            out.push(child);
            stack.push(child);
        }
    }
    out
}

fn assert_back_links_go_up(tree: &ProcessTree) {
    for id in reachable(tree) {
        if let Some(target) = tree[id].back_link {
            assert!(
                tree.ancestors(id).any(|a| a == target),
                "back link from {id:?} must target a strict ancestor"
            );
        }
    }
}

#[test]
fn known_first_argument_evaluates_away() {
    let (tree, residual) = specialize("(add [S [Z]] a)", &["a"], Strategy::Embedding);
    assert_back_links_go_up(&tree);
    assert_eq!(residual.to_string(), "(f1 a) -> [S a];\n");
}

#[test]
fn open_addition_folds_into_one_recursive_g_function() {
    let (tree, residual) = specialize("(add a b)", &["a", "b"], Strategy::Embedding);
    assert_back_links_go_up(&tree);
    assert_eq!(
        residual.to_string(),
        "(g1 [Z] b) -> b;\n(g1 [S v1] b) -> [S (g1 v1 b)];\n"
    );
}

#[test]
fn shared_argument_generalizes_to_a_fresh_binary_g_function() {
    let (tree, residual) = specialize("(add a a)", &["a"], Strategy::Embedding);
    assert_back_links_go_up(&tree);
    assert_eq!(
        residual.to_string(),
        "(f1 a) -> (g1 a a);\n(g1 [Z] v3) -> v3;\n(g1 [S v4] v3) -> [S (g1 v4 v3)];\n"
    );
}

#[test]
fn growing_accumulator_folds_as_an_instance() {
    let (tree, residual) = specialize("(addAcc a b)", &["a", "b"], Strategy::Embedding);
    assert_back_links_go_up(&tree);
    assert_eq!(
        residual.to_string(),
        "(g1 [Z] b) -> b;\n(g1 [S v1] b) -> (g1 v1 [S b]);\n"
    );
    assert!(!residual.to_string().contains("[S [S [S"));
}

#[test]
fn reflexive_equality_drops_the_false_branches() {
    let (tree, residual) = specialize("(eq a a)", &["a"], Strategy::Embedding);
    assert_back_links_go_up(&tree);
    assert_eq!(
        residual.to_string(),
        "(g1 [Z]) -> [True];\n(g1 [S v1]) -> (g1 v1);\n"
    );
    assert!(!residual.to_string().contains("False"));
}

#[test]
fn impossible_equality_is_constant_false() {
    let (_, residual) = specialize("(eq [S a] [Z])", &["a"], Strategy::Embedding);
    assert_eq!(residual.to_string(), "(f1 a) -> [False];\n");
    assert!(!residual.to_string().contains("(eq"));
}

#[test]
fn known_second_argument_builds_a_copy_function() {
    let (_, residual) = specialize("(add a [Z])", &["a"], Strategy::Embedding);
    let rendered = residual.to_string();
    assert!(!rendered.contains("(add"));
    assert!(rendered.contains("S"));
}

#[test]
fn tag_bag_strategy_terminates_on_the_whole_suite() {
    for (expr, vars) in [
        ("(add [S [Z]] a)", vec!["a"]),
        ("(add a b)", vec!["a", "b"]),
        ("(add a a)", vec!["a"]),
        ("(addAcc a b)", vec!["a", "b"]),
        ("(eq a a)", vec!["a"]),
        ("(eq [S a] [Z])", vec!["a"]),
    ] {
        let (tree, residual) = specialize(expr, &vars, Strategy::TagBag);
        assert_back_links_go_up(&tree);
        assert!(!residual.rules.is_empty(), "no residual for {expr}");
    }
}

#[test]
fn tag_bag_whistle_generalizes_the_shared_argument() {
    let (tree, _) = specialize("(add a a)", &["a"], Strategy::TagBag);

    let has_generalization = reachable(&tree).into_iter().any(|id| {
        matches!(tree[id].contraction, Some(Contraction::Let { .. }))
    });
    let has_folding = reachable(&tree)
        .into_iter()
        .any(|id| tree[id].back_link.is_some());
    assert!(
        has_generalization || has_folding,
        "the whistle must stop the shared-argument expansion"
    );
    // The root carries its bag under the TAG strategy.
    assert!(tree[tree.root()].bag.is_some());
}

#[test]
fn exhausted_fuel_is_reported() {
    let checked = pipeline::parse(NAT_SUITE).unwrap().check().unwrap();
    let start = parse_expr("(add a b)").unwrap();
    let mut ctx = VarTypes::new();
    ctx.insert("a".into(), TypeExpr::new("Nat", vec![]));
    ctx.insert("b".into(), TypeExpr::new("Nat", vec![]));

    let err = checked
        .supercompile(start, ctx, Strategy::Embedding, ScLimits::new().fuel(2))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Engine(super::EngineError::FuelExhausted(2))
    ));
}

#[test]
fn strategies_parse_and_render() {
    assert_eq!("HE".parse::<Strategy>().unwrap(), Strategy::Embedding);
    assert_eq!("TAG".parse::<Strategy>().unwrap(), Strategy::TagBag);
    assert!("fancy".parse::<Strategy>().is_err());
    assert_eq!(Strategy::Embedding.to_string(), "HE");
    assert_eq!(Strategy::TagBag.to_string(), "TAG");
}

#[test]
fn let_nodes_expand_into_body_and_bindings() {
    // Drive a configuration that is already a let chain: the body child has
    // no contraction, the binding children carry let contractions.
    let checked = pipeline::parse(NAT_SUITE).unwrap().check().unwrap();
    let start = Expr::let_in(
        "w",
        parse_expr("[Z]").unwrap(),
        parse_expr("(add w w)").unwrap(),
    );
    let mut ctx = VarTypes::new();
    ctx.insert("w".into(), TypeExpr::new("Nat", vec![]));
    let outcome = checked
        .supercompile(start, ctx, Strategy::Embedding, ScLimits::default())
        .unwrap();

    let root = outcome.tree.root();
    let children = &outcome.tree[root].children;
    assert_eq!(children.len(), 2);
    assert!(outcome.tree[children[0]].contraction.is_none());
    assert!(matches!(
        outcome.tree[children[1]].contraction,
        Some(Contraction::Let { ref var }) if var == "w"
    ));
}
