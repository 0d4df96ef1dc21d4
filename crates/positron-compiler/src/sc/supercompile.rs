//! The supercompilation loop: folding, whistle, generalization, driving.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use positron_core::{Expr, ExprKind, Program, Subst, TypeExpr, VarTypes, match_expr, substitute};

use super::EngineError;
use super::drive::{Driver, Step};
use super::embed::embedded;
use super::msg::{msg, natural_key};
use super::tagbag::TagBag;
use super::tree::{Contraction, NodeId, ProcessTree};

/// Which whistle watches the ancestor chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Homeomorphic embedding (`HE`).
    Embedding,
    /// Bag-of-tags growth (`TAG`); requires a tagged program.
    TagBag,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Embedding => write!(f, "HE"),
            Strategy::TagBag => write!(f, "TAG"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HE" => Ok(Strategy::Embedding),
            "TAG" => Ok(Strategy::TagBag),
            other => Err(format!("unknown strategy `{other}`, expected HE or TAG")),
        }
    }
}

/// Caller-imposed resource bounds for one run.
#[derive(Clone, Copy, Debug)]
pub struct ScLimits {
    /// Maximum worklist iterations (default: 100,000).
    fuel: u32,
}

impl Default for ScLimits {
    fn default() -> Self {
        Self { fuel: 100_000 }
    }
}

impl ScLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fuel(mut self, fuel: u32) -> Self {
        self.fuel = fuel;
        self
    }
}

/// One supercompilation run over a fixed program.
pub struct Supercompiler<'p> {
    program: &'p Program,
    driver: Driver<'p>,
    strategy: Strategy,
    limits: ScLimits,
}

impl<'p> Supercompiler<'p> {
    pub fn new(program: &'p Program, strategy: Strategy) -> Self {
        Self {
            program,
            driver: Driver::new(program),
            strategy,
            limits: ScLimits::default(),
        }
    }

    pub fn limits(mut self, limits: ScLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the finished process tree for a start configuration.
    pub fn build_tree(
        &mut self,
        start: Expr,
        var_types: VarTypes,
    ) -> Result<ProcessTree, EngineError> {
        let mut tree = ProcessTree::new(start, var_types);
        if self.strategy == Strategy::TagBag {
            let root = tree.root();
            let bag = TagBag::collect(&tree[root].expr);
            tree[root].bag = Some(bag);
        }

        let mut worklist = VecDeque::new();
        worklist.push_back(tree.root());
        let mut fuel = self.limits.fuel;

        while let Some(beta) = worklist.pop_front() {
            if fuel == 0 {
                return Err(EngineError::FuelExhausted(self.limits.fuel));
            }
            fuel -= 1;

            // A generalized ancestor re-enters as a let configuration; it
            // expands structurally, without folding or driving.
            if tree[beta].expr.is_let() {
                self.expand_let(&mut tree, beta, &mut worklist);
                continue;
            }

            if let Some(alpha) = find_renaming_ancestor(&tree, beta) {
                tree.set_back_link(beta, alpha);
                continue;
            }

            if tree[beta].expr.is_call() {
                if let Some(alpha) = self.find_dangerous_ancestor(&tree, beta) {
                    self.generalize(&mut tree, alpha, beta, &mut worklist);
                    continue;
                }
            }

            let step = self
                .driver
                .drive(&tree[beta].expr, &tree[beta].var_types)?;
            match step {
                Step::Stop => {}
                Step::Transient(expr) => {
                    let gamma = tree[beta].var_types.clone();
                    let child = self.attach(&mut tree, beta, expr, gamma, None);
                    worklist.push_back(child);
                }
                Step::Decompose(parts) => {
                    for part in parts {
                        let gamma = tree[beta].var_types.clone();
                        let child = self.attach(&mut tree, beta, part, gamma, None);
                        worklist.push_back(child);
                    }
                }
                Step::Variant(branches) => {
                    for branch in branches {
                        let child = self.attach(
                            &mut tree,
                            beta,
                            branch.expr,
                            branch.var_types,
                            Some(branch.contraction),
                        );
                        worklist.push_back(child);
                    }
                }
            }
        }

        Ok(tree)
    }

    fn attach(
        &self,
        tree: &mut ProcessTree,
        parent: NodeId,
        expr: Expr,
        var_types: VarTypes,
        contraction: Option<Contraction>,
    ) -> NodeId {
        let id = tree.add_child(parent, expr, var_types, contraction);
        if self.strategy == Strategy::TagBag {
            tree[id].bag = Some(TagBag::collect(&tree[id].expr));
        }
        id
    }

    /// Nearest call ancestor the whistle considers dangerous for `beta`.
    fn find_dangerous_ancestor(&self, tree: &ProcessTree, beta: NodeId) -> Option<NodeId> {
        tree.ancestors(beta).find(|&alpha| {
            let ancestor = &tree[alpha];
            if !ancestor.expr.is_call() {
                return false;
            }
            match self.strategy {
                Strategy::Embedding => embedded(&ancestor.expr, &tree[beta].expr),
                Strategy::TagBag => match (&tree[beta].bag, &ancestor.bag) {
                    (Some(bag), Some(ancestor_bag)) => bag.grows_over(ancestor_bag),
                    _ => false,
                },
            }
        })
    }

    /// The whistle fired on `(alpha, beta)`.
    ///
    /// A generalization that carries no new information degenerates to a
    /// fold: `beta` is then an instance of `alpha` and the residualizer
    /// resolves the instance substitution at the back-link. Otherwise
    /// `alpha` is rewritten in place to a let configuration over the msg and
    /// re-enters the worklist; its old subtree is discarded.
    fn generalize(
        &mut self,
        tree: &mut ProcessTree,
        alpha: NodeId,
        beta: NodeId,
        worklist: &mut VecDeque<NodeId>,
    ) {
        let g = msg(&tree[alpha].expr, &tree[beta].expr);
        if is_renaming(&g.expr, &tree[alpha].expr) {
            tree.set_back_link(beta, alpha);
            return;
        }

        let dropped = tree.descendants(alpha);
        worklist.retain(|id| !dropped.contains(id));

        // Holes in natural order, renamed through the run's own counter so
        // they cannot collide with variables already present in alpha.
        let mut holes: Vec<String> = g.sub1.keys().cloned().collect();
        holes.sort_by_key(|name| natural_key(name));

        let mut rename = Subst::new();
        let mut bindings = Vec::new();
        for hole in &holes {
            let fresh = self.driver.names.fresh();
            rename.insert(hole.clone(), Expr::var(fresh.clone()));
            bindings.push((fresh, g.sub1[hole].clone()));
        }
        let body = substitute(&g.expr, &rename);
        let chain = bindings
            .iter()
            .rev()
            .fold(body, |acc, (var, val)| Expr::let_in(var.clone(), val.clone(), acc));

        let node = &mut tree[alpha];
        node.expr = chain;
        node.children.clear();
        node.back_link = None;
        node.bag = None;
        if self.strategy == Strategy::TagBag {
            let bag = TagBag::collect(&tree[alpha].expr);
            tree[alpha].bag = Some(bag);
        }
        worklist.push_back(alpha);
    }

    /// Expand a let configuration: one child per binding (labelled with its
    /// `let` contraction) after the body child, which drives on.
    fn expand_let(&self, tree: &mut ProcessTree, beta: NodeId, worklist: &mut VecDeque<NodeId>) {
        let mut bindings = Vec::new();
        let mut cur = tree[beta].expr.clone();
        while let ExprKind::Let { var, val, body } = cur.kind {
            bindings.push((var, *val));
            cur = *body;
        }

        let parent_types = tree[beta].var_types.clone();
        let mut body_types = parent_types.clone();
        for (var, val) in &bindings {
            if let Some(ty) = approx_type(self.program, &parent_types, val) {
                body_types.insert(var.clone(), ty);
            }
        }

        let body_child = self.attach(tree, beta, cur, body_types, None);
        worklist.push_back(body_child);
        for (var, val) in bindings {
            let child = self.attach(
                tree,
                beta,
                val,
                parent_types.clone(),
                Some(Contraction::Let { var }),
            );
            worklist.push_back(child);
        }
    }
}

/// Equal up to variable renaming: each side matches the other.
pub(crate) fn is_renaming(e1: &Expr, e2: &Expr) -> bool {
    match_expr(e1, e2).is_success() && match_expr(e2, e1).is_success()
}

fn find_renaming_ancestor(tree: &ProcessTree, beta: NodeId) -> Option<NodeId> {
    tree.ancestors(beta)
        .find(|&alpha| is_renaming(&tree[alpha].expr, &tree[beta].expr))
}

/// Best-effort type of a generalization hole, from the shape of its bound
/// value. `None` leaves the hole untyped; driving only needs the type if the
/// hole is ever case-analyzed.
fn approx_type(program: &Program, gamma: &VarTypes, expr: &Expr) -> Option<TypeExpr> {
    match &expr.kind {
        ExprKind::Var(name) => gamma.get(name).cloned(),
        ExprKind::Ctr(name, _) => program.constructor(name).map(|(owner, _)| {
            TypeExpr::new(
                owner.name.clone(),
                owner
                    .params
                    .iter()
                    .map(|p| TypeExpr::new(p.clone(), Vec::new()))
                    .collect(),
            )
        }),
        ExprKind::Call(name, _) => program.signature(name).map(|sig| sig.ret_type.clone()),
        ExprKind::Lit(_) => None,
        ExprKind::Let { body, .. } => approx_type(program, gamma, body),
    }
}
