//! Most-specific generalization of two terms.

use indexmap::IndexMap;
use itertools::Itertools;

use positron_core::{Expr, ExprKind, Subst};

/// `msg(e1, e2)`: a generalized term plus the two substitutions that
/// reconstruct the inputs, `subN(expr) = eN`.
#[derive(Clone, Debug)]
pub struct Generalization {
    pub expr: Expr,
    pub sub1: Subst,
    pub sub2: Subst,
}

/// Compute the most-specific generalization.
///
/// Hole names are `v1, v2, ..`, local to this call. A repeated conflict pair
/// reuses its hole, which merges repeated subterms:
/// `msg((f x y x y), (f a b a b))` is `(f v1 v2 v1 v2)`, not four holes.
pub fn msg(e1: &Expr, e2: &Expr) -> Generalization {
    let mut builder = Builder {
        counter: 0,
        memo: IndexMap::new(),
    };
    let (expr, sub1, sub2) = builder.generalize(e1, e2);
    Generalization { expr, sub1, sub2 }
}

struct Builder {
    counter: u32,
    /// Conflict pair (rendered) → the hole already allocated for it.
    memo: IndexMap<(String, String), String>,
}

impl Builder {
    fn generalize(&mut self, e1: &Expr, e2: &Expr) -> (Expr, Subst, Subst) {
        match (&e1.kind, &e2.kind) {
            (ExprKind::Var(n1), ExprKind::Var(n2)) if n1 == n2 => {
                (e1.clone(), Subst::new(), Subst::new())
            }

            (ExprKind::Lit(v1), ExprKind::Lit(v2)) if v1 == v2 => {
                (e1.clone(), Subst::new(), Subst::new())
            }

            (ExprKind::Ctr(n1, args1), ExprKind::Ctr(n2, args2))
                if n1 == n2 && args1.len() == args2.len() =>
            {
                let (args, sub1, sub2) = self.merge(args1, args2);
                (Expr::ctr(n1.as_str(), args), sub1, sub2)
            }

            (ExprKind::Call(n1, args1), ExprKind::Call(n2, args2))
                if n1 == n2 && args1.len() == args2.len() =>
            {
                let (args, sub1, sub2) = self.merge(args1, args2);
                (Expr::call(n1.as_str(), args), sub1, sub2)
            }

            _ => self.hole(e1, e2),
        }
    }

    fn merge(&mut self, args1: &[Expr], args2: &[Expr]) -> (Vec<Expr>, Subst, Subst) {
        let mut args = Vec::with_capacity(args1.len());
        let mut sub1 = Subst::new();
        let mut sub2 = Subst::new();
        for (a1, a2) in args1.iter().zip_eq(args2) {
            let (g, s1, s2) = self.generalize(a1, a2);
            args.push(g);
            sub1.extend(s1);
            sub2.extend(s2);
        }
        (args, sub1, sub2)
    }

    fn hole(&mut self, e1: &Expr, e2: &Expr) -> (Expr, Subst, Subst) {
        let key = (e1.to_string(), e2.to_string());
        if let Some(name) = self.memo.get(&key) {
            return (Expr::var(name.as_str()), Subst::new(), Subst::new());
        }

        self.counter += 1;
        let name = format!("v{}", self.counter);
        self.memo.insert(key, name.clone());

        let mut sub1 = Subst::new();
        sub1.insert(name.clone(), e1.clone());
        let mut sub2 = Subst::new();
        sub2.insert(name.clone(), e2.clone());
        (Expr::var(name), sub1, sub2)
    }
}

/// Sort key turning `v10` into `("v", 10)` so holes iterate in natural
/// order rather than lexicographically.
pub fn natural_key(name: &str) -> (String, u64) {
    let split = name.find(|c: char| c.is_ascii_digit()).unwrap_or(name.len());
    let (prefix, digits) = name.split_at(split);
    (prefix.to_string(), digits.parse().unwrap_or(0))
}
