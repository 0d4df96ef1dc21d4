//! JSON export of the process tree for external tooling.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::Serialize;

use positron_core::{Expr, VarTypes};

use crate::sc::{Contraction, NodeId, ProcessTree};

#[derive(Serialize)]
struct TreeDump<'t> {
    nodes: Vec<NodeDump<'t>>,
}

#[derive(Serialize)]
struct NodeDump<'t> {
    id: u32,
    term: &'t Expr,
    rendered: String,
    var_types: &'t VarTypes,
    #[serde(skip_serializing_if = "Option::is_none")]
    contraction: Option<&'t Contraction>,
    children: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    back_link: Option<u32>,
}

/// Serialize the reachable tree, numbering nodes in breadth-first order
/// (the same numbering the DOT export uses).
pub fn to_json(tree: &ProcessTree) -> String {
    let mut ids: IndexMap<NodeId, u32> = IndexMap::new();
    ids.insert(tree.root(), 0);
    let mut order = VecDeque::new();
    order.push_back(tree.root());
    let mut nodes = Vec::new();

    while let Some(id) = order.pop_front() {
        let node = &tree[id];
        for &child in &node.children {
            let next = ids.len() as u32;
            ids.insert(child, next);
            order.push_back(child);
        }
        nodes.push(NodeDump {
            id: ids[&id],
            term: &node.expr,
            rendered: node.expr.to_string(),
            var_types: &node.var_types,
            contraction: node.contraction.as_ref(),
            children: node.children.iter().map(|c| ids[c]).collect(),
            back_link: node.back_link.map(|t| ids[&t]),
        });
    }

    serde_json::to_string_pretty(&TreeDump { nodes })
        .expect("process tree serialization never fails")
}
