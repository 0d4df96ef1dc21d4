//! Origin-tag assignment.
//!
//! Before supercompilation, every syntactic node of every rule body receives
//! a distinct tag. Substitution preserves tags, so the tags still present in
//! a configuration identify which pieces of source code survive in it; the
//! bag-of-tags whistle is built on exactly that.

use crate::program::Program;
use crate::term::{Expr, ExprKind};

/// Tag identifying one syntactic node of the source program.
pub type Tag = u32;

/// Monotonic tag allocator. Counting starts at 1; 0 stays reserved.
#[derive(Debug)]
pub struct Tagger {
    next: Tag,
}

impl Default for Tagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Tagger {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn fresh(&mut self) -> Tag {
        let tag = self.next;
        self.next += 1;
        tag
    }

    /// Tag every rule of the program in declaration order, patterns before
    /// bodies. Pattern constructors must be tagged too: a value the driver
    /// builds by refining a variable belongs to the pattern's allocation
    /// site, and the bag-of-tags whistle cannot see accumulator growth
    /// without it.
    pub fn tag_program(&mut self, program: &mut Program) {
        for rule in &mut program.rules {
            for param in &mut rule.pattern.params {
                self.tag_expr(param);
            }
            self.tag_expr(&mut rule.body);
        }
    }

    /// Tag one expression tree, pre-order.
    pub fn tag_expr(&mut self, expr: &mut Expr) {
        expr.tag = Some(self.fresh());
        match &mut expr.kind {
            ExprKind::Ctr(_, args) | ExprKind::Call(_, args) => {
                for arg in args {
                    self.tag_expr(arg);
                }
            }
            ExprKind::Let { val, body, .. } => {
                self.tag_expr(val);
                self.tag_expr(body);
            }
            ExprKind::Var(_) | ExprKind::Lit(_) => {}
        }
    }
}
