use crate::{Expr, ExprKind, Pattern, Program, Rule, Span, Subst, Tagger, substitute};

#[test]
fn tagging_numbers_every_body_node() {
    let mut prog = Program {
        rules: vec![
            Rule {
                pattern: Pattern::new("f", vec![Expr::var("x")]),
                body: Expr::ctr("S", vec![Expr::var("x")]),
                span: Span::DUMMY,
            },
            Rule {
                pattern: Pattern::new("g", vec![Expr::var("x")]),
                body: Expr::call("f", vec![Expr::var("x")]),
                span: Span::DUMMY,
            },
        ],
        ..Program::default()
    };

    Tagger::new().tag_program(&mut prog);

    // Pre-order per rule, pattern params before the body: rule 0 tags its
    // pattern x (1), then [S x] (2) and its x (3); rule 1 tags its pattern x
    // (4), then (f x) (5) and its x (6).
    assert_eq!(prog.rules[0].pattern.params[0].tag, Some(1));
    assert_eq!(prog.rules[0].body.tag, Some(2));
    match &prog.rules[0].body.kind {
        ExprKind::Ctr(_, args) => assert_eq!(args[0].tag, Some(3)),
        _ => unreachable!(),
    }
    assert_eq!(prog.rules[1].pattern.params[0].tag, Some(4));
    assert_eq!(prog.rules[1].body.tag, Some(5));
}

#[test]
fn instantiation_keeps_body_tags_and_synthesized_nodes_stay_untagged() {
    let mut body = Expr::ctr("S", vec![Expr::var("x")]);
    Tagger::new().tag_expr(&mut body);

    let mut sub = Subst::new();
    sub.insert("x".into(), Expr::var("fresh"));
    let inst = substitute(&body, &sub);

    assert_eq!(inst.tag, body.tag);
    match &inst.kind {
        ExprKind::Ctr(_, args) => assert_eq!(args[0].tag, None),
        _ => unreachable!(),
    }
}
