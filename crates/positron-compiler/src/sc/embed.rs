//! Homeomorphic embedding, the HE whistle.

use positron_core::{Expr, ExprKind};

/// `small ◁ big`: `small` embeds into `big` by coupling and diving.
///
/// On a finite signature this relation is a well-quasi-order, so every
/// infinite drive path must eventually produce an embedded ancestor pair;
/// that is the termination guarantee behind the HE strategy.
pub fn embedded(small: &Expr, big: &Expr) -> bool {
    by_coupling(small, big) || by_diving(small, big)
}

/// Same head, same arity, argumentwise embedding.
fn by_coupling(small: &Expr, big: &Expr) -> bool {
    match (&small.kind, &big.kind) {
        (ExprKind::Var(_), ExprKind::Var(_)) => true,
        (ExprKind::Lit(a), ExprKind::Lit(b)) => a == b,
        (ExprKind::Ctr(n1, args1), ExprKind::Ctr(n2, args2))
        | (ExprKind::Call(n1, args1), ExprKind::Call(n2, args2))
            if n1 == n2 && args1.len() == args2.len() =>
        {
            args1.iter().zip(args2).all(|(a, b)| embedded(a, b))
        }
        _ => false,
    }
}

/// `small` embeds into some argument of `big`.
fn by_diving(small: &Expr, big: &Expr) -> bool {
    match &big.kind {
        ExprKind::Ctr(_, args) | ExprKind::Call(_, args) => {
            args.iter().any(|arg| embedded(small, arg))
        }
        _ => false,
    }
}
