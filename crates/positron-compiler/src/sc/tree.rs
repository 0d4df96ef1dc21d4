//! The process tree.
//!
//! Nodes live in an arena and refer to each other by index, so the upward
//! `back_link` edges need no shared ownership. Generalization detaches whole
//! subtrees by clearing child lists; detached nodes stay in the arena but are
//! unreachable from the root, which is why every consumer walks from the
//! root instead of iterating the arena.

use std::fmt;

use serde::Serialize;

use positron_core::{Expr, VarTypes};

use super::tagbag::TagBag;

/// Index of a node in the process tree arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a child was produced from its parent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Contraction {
    /// Case analysis refined `var` into `[ctr params..]`.
    Case {
        var: String,
        ctr: String,
        params: Vec<String>,
    },
    /// The child is the bound value of a generalization hole.
    Let { var: String },
}

impl fmt::Display for Contraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contraction::Case { var, ctr, params } => {
                write!(f, "{var} := [{ctr}")?;
                for p in params {
                    write!(f, " {p}")?;
                }
                write!(f, "]")
            }
            Contraction::Let { var } => write!(f, "let {var}"),
        }
    }
}

/// One configuration in the tree.
#[derive(Clone, Debug)]
pub struct Node {
    pub expr: Expr,
    pub var_types: VarTypes,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub contraction: Option<Contraction>,
    /// Folding edge; always points to a strict ancestor.
    pub back_link: Option<NodeId>,
    /// Cached tag bag, present when the TAG strategy is active.
    pub bag: Option<TagBag>,
}

/// Arena-backed rooted tree with upward folding links.
#[derive(Clone, Debug)]
pub struct ProcessTree {
    nodes: Vec<Node>,
}

impl ProcessTree {
    pub fn new(expr: Expr, var_types: VarTypes) -> Self {
        Self {
            nodes: vec![Node {
                expr,
                var_types,
                parent: None,
                children: Vec::new(),
                contraction: None,
                back_link: None,
                bag: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        expr: Expr,
        var_types: VarTypes,
        contraction: Option<Contraction>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            expr,
            var_types,
            parent: Some(parent),
            children: Vec::new(),
            contraction,
            back_link: None,
            bag: None,
        });
        self[parent].children.push(id);
        id
    }

    /// Ancestors of `id`, nearest first, up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self[id].parent, move |&cur| self[cur].parent)
    }

    /// Every node strictly below `id`, in depth-first order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self[id].children.clone();
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self[cur].children.iter().copied());
        }
        out
    }

    pub fn set_back_link(&mut self, from: NodeId, to: NodeId) {
        debug_assert!(
            self.ancestors(from).any(|a| a == to),
            "back links must point to a strict ancestor"
        );
        self[from].back_link = Some(to);
    }
}

impl std::ops::Index<NodeId> for ProcessTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl std::ops::IndexMut<NodeId> for ProcessTree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
