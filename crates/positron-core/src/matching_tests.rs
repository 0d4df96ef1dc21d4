use crate::{Expr, Match, Subst, match_args, match_expr, substitute};

fn s(e: Expr) -> Expr {
    Expr::ctr("S", vec![e])
}

fn z() -> Expr {
    Expr::ctr("Z", vec![])
}

#[test]
fn variable_pattern_captures_anything() {
    let term = Expr::call("add", vec![z(), Expr::var("y")]);
    match match_expr(&Expr::var("x"), &term) {
        Match::Success(sub) => assert_eq!(sub["x"], term),
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn literal_pattern_requires_equal_literal() {
    assert_eq!(
        match_expr(&Expr::lit(42), &Expr::lit(42)),
        Match::Success(Subst::new())
    );
    assert_eq!(match_expr(&Expr::lit(42), &Expr::lit(41)), Match::Fail);
    assert_eq!(match_expr(&Expr::lit(42), &z()), Match::Fail);
}

#[test]
fn constructor_pattern_against_variable_narrows() {
    let pat = Expr::ctr("Cons", vec![Expr::var("h"), Expr::var("t")]);
    assert_eq!(
        match_expr(&pat, &Expr::var("xs")),
        Match::Narrow {
            var: "xs".into(),
            ctr: "Cons".into(),
            arity: 2,
            tag: None,
        }
    );

    // A tagged pattern passes its allocation site along.
    let mut tagged = Expr::ctr("S", vec![Expr::var("n")]);
    tagged.tag = Some(9);
    assert_eq!(
        match_expr(&tagged, &Expr::var("x")),
        Match::Narrow {
            var: "x".into(),
            ctr: "S".into(),
            arity: 1,
            tag: Some(9),
        }
    );
}

#[test]
fn constructor_mismatch_fails() {
    assert_eq!(match_expr(&z(), &s(z())), Match::Fail);
    assert_eq!(
        match_expr(&z(), &Expr::call("f", vec![])),
        Match::Fail
    );
}

#[test]
fn narrow_propagates_before_later_failures() {
    // (eq [Z] [Z]) vs (eq a [S x]): the first argument narrows, and that
    // narrowing must win over the second argument's failure.
    let pats = [z(), z()];
    let terms = [Expr::var("a"), s(Expr::var("x"))];
    assert_eq!(
        match_args(&pats, &terms),
        Match::Narrow {
            var: "a".into(),
            ctr: "Z".into(),
            arity: 0,
            tag: None,
        }
    );
}

#[test]
fn conflicting_rebind_fails() {
    // (f a a) cannot cover (f x y): a would have to be both x and y.
    let pat = Expr::call("f", vec![Expr::var("a"), Expr::var("a")]);
    let term = Expr::call("f", vec![Expr::var("x"), Expr::var("y")]);
    assert_eq!(match_expr(&pat, &term), Match::Fail);

    // Consistent re-binds are fine: (f a a) covers (f x x).
    let term = Expr::call("f", vec![Expr::var("x"), Expr::var("x")]);
    assert!(match_expr(&pat, &term).is_success());
}

#[test]
fn success_round_trips_for_linear_patterns() {
    // match(p, t) = σ implies σ(p) = t.
    let pat = Expr::call(
        "append",
        vec![
            Expr::ctr("Cons", vec![Expr::var("h"), Expr::var("t")]),
            Expr::var("ys"),
        ],
    );
    let term = Expr::call(
        "append",
        vec![Expr::ctr("Cons", vec![z(), Expr::ctr("Nil", vec![])]), s(z())],
    );
    let sub = match_expr(&pat, &term).into_subst().unwrap();
    assert_eq!(substitute(&pat, &sub), term);
}

#[test]
fn substitution_preserves_origin_tags() {
    let mut body = Expr::ctr("S", vec![Expr::call("add", vec![Expr::var("x"), Expr::var("y")])]);
    body.tag = Some(3);

    let mut sub = Subst::new();
    sub.insert("x".into(), z());
    sub.insert("y".into(), Expr::var("b"));

    let out = substitute(&body, &sub);
    assert_eq!(out.tag, Some(3));
    assert_eq!(out.to_string(), "[S (add [Z] b)]");
}

#[test]
fn substitution_respects_let_shadowing() {
    // Substituting v inside `let v = v in v` only touches the bound value.
    let e = Expr::let_in("v", Expr::var("v"), Expr::var("v"));
    let mut sub = Subst::new();
    sub.insert("v".into(), z());
    assert_eq!(substitute(&e, &sub).to_string(), "let v = [Z] in v");
}
