//! Three-valued matching and substitution.
//!
//! The matcher decides whether a pattern-shaped expression covers a
//! term-shaped expression. Besides plain success and failure there is a third
//! outcome, [`Match::Narrow`]: the pattern wants a constructor where the term
//! has a free variable, so the match could only be decided by refining that
//! variable. Narrowing is what turns rule selection into case analysis
//! during driving.

use indexmap::IndexMap;

use crate::Tag;
use crate::term::{Expr, ExprKind};

/// Variable bindings, in binding order.
pub type Subst = IndexMap<String, Expr>;

/// Result of matching a pattern against a term.
#[derive(Clone, Debug, PartialEq)]
pub enum Match {
    /// The term is an instance of the pattern under the bindings.
    Success(Subst),
    /// Matching would succeed if `var` were refined into a `ctr`-shaped
    /// value of the given arity. `tag` is the origin tag of the pattern
    /// constructor that requested the refinement; a value built by that
    /// refinement counts against the pattern's allocation site in the
    /// bag-of-tags whistle.
    Narrow {
        var: String,
        ctr: String,
        arity: usize,
        tag: Option<Tag>,
    },
    /// The pattern can never cover the term.
    Fail,
}

impl Match {
    pub fn is_success(&self) -> bool {
        matches!(self, Match::Success(_))
    }

    pub fn into_subst(self) -> Option<Subst> {
        match self {
            Match::Success(subst) => Some(subst),
            _ => None,
        }
    }
}

/// Match a single pattern expression against a term expression.
pub fn match_expr(pattern: &Expr, term: &Expr) -> Match {
    match &pattern.kind {
        ExprKind::Var(name) => {
            let mut subst = Subst::new();
            subst.insert(name.clone(), term.clone());
            Match::Success(subst)
        }

        ExprKind::Lit(p_val) => match &term.kind {
            ExprKind::Lit(t_val) if t_val == p_val => Match::Success(Subst::new()),
            _ => Match::Fail,
        },

        ExprKind::Ctr(p_name, p_args) => match &term.kind {
            ExprKind::Ctr(t_name, t_args) => {
                if p_name != t_name || p_args.len() != t_args.len() {
                    Match::Fail
                } else {
                    match_args(p_args, t_args)
                }
            }
            ExprKind::Var(v) => Match::Narrow {
                var: v.clone(),
                ctr: p_name.clone(),
                arity: p_args.len(),
                tag: pattern.tag,
            },
            _ => Match::Fail,
        },

        // Call patterns only arise when whole configurations are compared
        // (renaming and instance checks); they match calls structurally.
        ExprKind::Call(p_name, p_args) => match &term.kind {
            ExprKind::Call(t_name, t_args) if p_name == t_name && p_args.len() == t_args.len() => {
                match_args(p_args, t_args)
            }
            _ => Match::Fail,
        },

        ExprKind::Let { .. } => Match::Fail,
    }
}

/// Match argument lists componentwise, merging bindings.
///
/// The first non-success sub-result propagates out, so a `Narrow` from an
/// early argument wins over a `Fail` from a later one. A variable that
/// re-binds to a *different* term fails the whole match; this is what makes
/// "success in both directions" coincide with equality up to renaming.
pub fn match_args(patterns: &[Expr], terms: &[Expr]) -> Match {
    debug_assert_eq!(patterns.len(), terms.len());
    let mut bindings = Subst::new();
    for (pat, term) in patterns.iter().zip(terms) {
        match match_expr(pat, term) {
            Match::Success(sub) => {
                for (name, expr) in sub {
                    match bindings.get(&name) {
                        Some(existing) if *existing != expr => return Match::Fail,
                        _ => {
                            bindings.insert(name, expr);
                        }
                    }
                }
            }
            other => return other,
        }
    }
    Match::Success(bindings)
}

/// Apply a substitution, replacing free variable occurrences and copying
/// every other node with its origin tag intact.
pub fn substitute(expr: &Expr, subst: &Subst) -> Expr {
    match &expr.kind {
        ExprKind::Var(name) => subst.get(name).cloned().unwrap_or_else(|| expr.clone()),

        ExprKind::Ctr(name, args) => Expr {
            kind: ExprKind::Ctr(
                name.clone(),
                args.iter().map(|a| substitute(a, subst)).collect(),
            ),
            tag: expr.tag,
            span: expr.span,
        },

        ExprKind::Call(name, args) => Expr {
            kind: ExprKind::Call(
                name.clone(),
                args.iter().map(|a| substitute(a, subst)).collect(),
            ),
            tag: expr.tag,
            span: expr.span,
        },

        ExprKind::Lit(_) => expr.clone(),

        ExprKind::Let { var, val, body } => {
            // The binder shadows its own variable in the body.
            let body = if subst.contains_key(var) {
                let mut inner = subst.clone();
                inner.shift_remove(var);
                substitute(body, &inner)
            } else {
                substitute(body, subst)
            };
            Expr {
                kind: ExprKind::Let {
                    var: var.clone(),
                    val: Box::new(substitute(val, subst)),
                    body: Box::new(body),
                },
                tag: expr.tag,
                span: expr.span,
            }
        }
    }
}
