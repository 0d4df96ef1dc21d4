//! Residualization: a finished process tree becomes a specialized program.
//!
//! Two passes. The first selects the nodes that must become top-level
//! functions (the root, every variant-branching node, every back-link
//! target) and assigns them `g1..`/`f1..` names with their free variables as
//! parameters. The second emits rules, translating subtrees into bodies.

use indexmap::IndexMap;

use positron_core::{
    Expr, ExprKind, Match, Pattern, Program, Rule, Span, Subst, match_expr, substitute,
};

use crate::sc::{Contraction, NodeId, ProcessTree};


/// Turn a finished tree into a residual program (rules only; types and
/// signatures are recoverable from the tree's typing contexts on demand).
pub fn residualize(tree: &ProcessTree) -> Program {
    Residualizer {
        tree,
        signatures: IndexMap::new(),
        g_count: 0,
        f_count: 0,
        rules: Vec::new(),
    }
    .run()
}

struct ResidualSig {
    name: String,
    params: Vec<String>,
}

struct Residualizer<'t> {
    tree: &'t ProcessTree,
    signatures: IndexMap<NodeId, ResidualSig>,
    g_count: u32,
    f_count: u32,
    rules: Vec<Rule>,
}

impl Residualizer<'_> {
    fn run(mut self) -> Program {
        self.allocate(self.tree.root());
        let selected: Vec<NodeId> = self.signatures.keys().copied().collect();
        for id in selected {
            self.emit(id);
        }
        Program {
            rules: self.rules,
            ..Program::default()
        }
    }

    // --- pass 1: name allocation ---

    fn allocate(&mut self, id: NodeId) {
        if id == self.tree.root() || self.is_variant(id) {
            self.register(id);
        }
        let children = self.tree[id].children.clone();
        for child in children {
            self.allocate(child);
            if let Some(target) = self.tree[child].back_link {
                self.register(target);
            }
        }
    }

    fn register(&mut self, id: NodeId) {
        if self.signatures.contains_key(&id) {
            return;
        }
        let params = self.tree[id].expr.free_vars();
        let name = if self.is_variant(id) {
            self.g_count += 1;
            format!("g{}", self.g_count)
        } else {
            self.f_count += 1;
            format!("f{}", self.f_count)
        };
        self.signatures.insert(id, ResidualSig { name, params });
    }

    fn is_variant(&self, id: NodeId) -> bool {
        self.tree[id]
            .children
            .iter()
            .any(|&c| matches!(self.tree[c].contraction, Some(Contraction::Case { .. })))
    }

    // --- pass 2: body emission ---

    fn emit(&mut self, id: NodeId) {
        let sig = &self.signatures[&id];
        let name = sig.name.clone();
        let params = sig.params.clone();

        if self.is_variant(id) {
            // One rule per branch; the branching variable's position holds
            // the contraction pattern, with its fresh sub-variables as the
            // branch's new formal parameters.
            let children = self.tree[id].children.clone();
            for child in children {
                let Some(Contraction::Case {
                    var,
                    ctr,
                    params: fields,
                }) = &self.tree[child].contraction
                else {
                    continue;
                };
                let lhs = params
                    .iter()
                    .map(|p| {
                        if p == var {
                            Expr::ctr(ctr.as_str(), fields.iter().map(Expr::var).collect())
                        } else {
                            Expr::var(p)
                        }
                    })
                    .collect();
                let body = self.translate(child);
                self.rules.push(Rule {
                    pattern: Pattern::new(name.clone(), lhs),
                    body,
                    span: Span::DUMMY,
                });
            }
        } else {
            let body = self.body_of(id);
            self.rules.push(Rule {
                pattern: Pattern::new(name, params.iter().map(Expr::var).collect()),
                body,
                span: Span::DUMMY,
            });
        }
    }

    /// Translate a subtree into the expression it computes.
    fn translate(&self, id: NodeId) -> Expr {
        let node = &self.tree[id];
        if let Some(target) = node.back_link {
            return self.call_target(target, &node.expr);
        }
        if let Some(sig) = self.signatures.get(&id) {
            return Expr::call(
                sig.name.clone(),
                sig.params.iter().map(Expr::var).collect(),
            );
        }
        self.body_of(id)
    }

    fn body_of(&self, id: NodeId) -> Expr {
        let node = &self.tree[id];
        if node.children.is_empty() {
            return node.expr.clone();
        }
        if node.expr.is_let() {
            return self.let_body(id);
        }
        if let ExprKind::Ctr(name, _) = &node.expr.kind {
            return Expr::ctr(
                name.as_str(),
                node.children.iter().map(|&c| self.translate(c)).collect(),
            );
        }
        if node.children.len() == 1 {
            return self.translate(node.children[0]);
        }
        node.expr.clone()
    }

    /// A generalized node: the translated body child with every hole
    /// replaced by its translated binding child. The body child is the one
    /// without a `let` contraction; child order carries no meaning here.
    fn let_body(&self, id: NodeId) -> Expr {
        let node = &self.tree[id];
        let mut body = None;
        let mut sub = Subst::new();
        for &child in &node.children {
            match &self.tree[child].contraction {
                Some(Contraction::Let { var }) => {
                    sub.insert(var.clone(), self.translate(child));
                }
                _ => body = Some(child),
            }
        }
        match body {
            Some(child) => substitute(&self.translate(child), &sub),
            None => node.expr.clone(),
        }
    }

    /// A folding edge becomes a call to the target's residual function. The
    /// target's parameters pass through the instance substitution, which for
    /// a plain renaming is exactly the node's variables in the target's
    /// parameter order.
    fn call_target(&self, target: NodeId, from: &Expr) -> Expr {
        let sig = &self.signatures[&target];
        let args = match match_expr(&self.tree[target].expr, from) {
            Match::Success(sub) => sig
                .params
                .iter()
                .map(|p| sub.get(p).cloned().unwrap_or_else(|| Expr::var(p)))
                .collect(),
            _ => from.free_vars().into_iter().map(Expr::var).collect(),
        };
        Expr::call(sig.name.clone(), args)
    }
}
