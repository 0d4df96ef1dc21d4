//! Bag-of-tags, the TAG whistle.

use std::collections::BTreeMap;

use positron_core::{Expr, ExprKind, Tag};

/// Multiset of the origin tags surviving in a configuration.
///
/// Untagged (synthesized) nodes contribute nothing. Stored per tree node
/// while the TAG strategy is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagBag {
    counts: BTreeMap<Tag, u32>,
}

impl TagBag {
    /// Collect every tag occurring anywhere in the expression.
    pub fn collect(expr: &Expr) -> Self {
        let mut bag = Self::default();
        bag.visit(expr);
        bag
    }

    fn visit(&mut self, expr: &Expr) {
        if let Some(tag) = expr.tag {
            *self.counts.entry(tag).or_insert(0) += 1;
        }
        match &expr.kind {
            ExprKind::Ctr(_, args) | ExprKind::Call(_, args) => {
                for arg in args {
                    self.visit(arg);
                }
            }
            ExprKind::Let { val, body, .. } => {
                self.visit(val);
                self.visit(body);
            }
            ExprKind::Var(_) | ExprKind::Lit(_) => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Multiset inclusion: every tag of `other` occurs here at least as
    /// often.
    pub fn includes(&self, other: &TagBag) -> bool {
        other
            .counts
            .iter()
            .all(|(tag, count)| self.counts.get(tag).is_some_and(|c| c >= count))
    }

    /// The whistle: this (descendant) bag strictly outgrows the ancestor bag
    /// while covering it. Equal bags do not fire; they are folding
    /// candidates. A smaller or incomparable bag means driving moved into a
    /// different region of the source.
    pub fn grows_over(&self, ancestor: &TagBag) -> bool {
        !ancestor.is_empty() && self.includes(ancestor) && self.total() > ancestor.total()
    }
}
