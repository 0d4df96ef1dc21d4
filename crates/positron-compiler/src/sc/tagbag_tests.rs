use positron_core::{Expr, Subst, Tagger, substitute};

use super::TagBag;
use crate::parser::parse_expr;

fn tagged(tagger: &mut Tagger, text: &str) -> Expr {
    let mut expr = parse_expr(text).unwrap();
    tagger.tag_expr(&mut expr);
    expr
}

#[test]
fn collects_every_tagged_node() {
    let expr = tagged(&mut Tagger::new(), "[S (add x y)]");
    let bag = TagBag::collect(&expr);
    assert_eq!(bag.total(), 4);
}

#[test]
fn untagged_nodes_contribute_nothing() {
    let bag = TagBag::collect(&parse_expr("[S (add x y)]").unwrap());
    assert!(bag.is_empty());
}

#[test]
fn substitution_duplicates_surviving_tags() {
    let mut tagger = Tagger::new();
    let body = tagged(&mut tagger, "(pair x x)");
    let value = tagged(&mut tagger, "[S z]");

    let mut sub = Subst::new();
    sub.insert("x".into(), value);
    let bag = TagBag::collect(&substitute(&body, &sub));

    // The call keeps its tag; both copies of [S z] count twice; the two
    // replaced x occurrences lose theirs.
    assert_eq!(bag.total(), 5);
}

#[test]
fn whistle_ignores_empty_ancestors() {
    let descendant = TagBag::collect(&tagged(&mut Tagger::new(), "(f x)"));
    assert!(!descendant.grows_over(&TagBag::default()));
}

#[test]
fn equal_bags_do_not_fire() {
    let expr = tagged(&mut Tagger::new(), "(add x y)");
    let bag = TagBag::collect(&expr);
    assert!(bag.includes(&bag.clone()));
    assert!(!bag.grows_over(&bag.clone()));
}

#[test]
fn growth_with_inclusion_fires() {
    let mut tagger = Tagger::new();
    let small = tagged(&mut tagger, "(add x y)");
    // Wrapping the same term duplicates its tags into a strict superset.
    let big = Expr::ctr("Pair", vec![small.clone(), small.clone()]);

    let small_bag = TagBag::collect(&small);
    let big_bag = TagBag::collect(&big);
    assert!(big_bag.grows_over(&small_bag));
    assert!(!small_bag.grows_over(&big_bag));
}

#[test]
fn incomparable_bags_do_not_fire() {
    let mut tagger = Tagger::new();
    let one = TagBag::collect(&tagged(&mut tagger, "(f x)"));
    let other = TagBag::collect(&tagged(&mut tagger, "(g y z)"));
    assert!(!other.grows_over(&one));
    assert!(!one.grows_over(&other));
}
