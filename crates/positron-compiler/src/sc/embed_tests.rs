use positron_core::{Expr, Subst, substitute};

use super::embedded;
use crate::parser::parse_expr;

fn e(text: &str) -> Expr {
    parse_expr(text).unwrap()
}

fn emb(small: &str, big: &str) -> bool {
    embedded(&e(small), &e(big))
}

#[test]
fn variables_embed_into_variables() {
    assert!(emb("x", "y"));
    assert!(emb("x", "x"));
    assert!(!emb("x", "[Z]"));
}

#[test]
fn literals_must_be_equal() {
    assert!(emb("42", "42"));
    assert!(!emb("42", "100"));
    assert!(emb("1", "[S 1]"));
}

#[test]
fn coupling_preserves_structure() {
    assert!(emb("[S x]", "[S y]"));
    assert!(emb("[Cons x xs]", "[Cons y ys]"));
    assert!(emb("(f x)", "(f y)"));

    assert!(!emb("[Z]", "[S x]"));
    assert!(!emb("(f x)", "(g x)"));
}

#[test]
fn diving_searches_the_arguments() {
    assert!(emb("x", "[S x]"));
    assert!(emb("[Z]", "[S [S [Z]]]"));
    assert!(emb("(f x)", "(g (f x))"));
}

#[test]
fn coupling_and_diving_mix() {
    // add(x, y) dives into S(x) on the first argument.
    assert!(emb("(add x y)", "(add [S x] y)"));
    // The bigger term does not fit into the smaller one.
    assert!(!emb("(add [S x] y)", "(add x y)"));
}

#[test]
fn accumulator_growth_is_detected() {
    // g(f(x)) embeds into g(g(f(x))): couple the outer g, then dive.
    assert!(emb("(g (f x))", "(g (g (f x)))"));
}

#[test]
fn reflexive_on_sample_terms() {
    for text in ["x", "42", "[Z]", "[Cons x xs]", "(add [S x] y)"] {
        assert!(emb(text, text), "{text} should embed into itself");
    }
}

#[test]
fn transitive_on_a_chain() {
    let (a, b, c) = ("(add x y)", "(add [S x] y)", "(add [S [S x]] y)");
    assert!(emb(a, b) && emb(b, c) && emb(a, c));
}

#[test]
fn stable_under_substitution() {
    // e1 ◁ e2 implies σ(e1) ◁ σ(e2).
    let e1 = e("(add x y)");
    let e2 = e("(add [S x] y)");
    assert!(embedded(&e1, &e2));

    let mut sub = Subst::new();
    sub.insert("x".into(), e("[Cons a as]"));
    sub.insert("y".into(), e("(len bs)"));
    assert!(embedded(&substitute(&e1, &sub), &substitute(&e2, &sub)));
}
