//! DOT (Graphviz) export.
//!
//! Tree edges carry the contraction that produced the child; folding edges
//! are dashed, red, and point back up to the ancestor.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::sc::{NodeId, ProcessTree};

pub fn to_dot(tree: &ProcessTree) -> String {
    let mut lines = vec![
        "digraph ProcessTree {".to_string(),
        "    node [fontname=\"Courier New\"];".to_string(),
        "    edge [fontname=\"Courier New\"];".to_string(),
    ];

    let mut ids: IndexMap<NodeId, String> = IndexMap::new();
    ids.insert(tree.root(), "n0".to_string());

    let mut queue = VecDeque::new();
    queue.push_back(tree.root());

    while let Some(id) = queue.pop_front() {
        let uid = ids[&id].clone();
        let node = &tree[id];

        let label = escape(&node.expr.to_string());
        lines.push(format!("    {uid} [label=\"{label}\", shape=box];"));

        // A folded node has no children; ancestors are already numbered.
        if let Some(target) = node.back_link {
            let target_id = &ids[&target];
            lines.push(format!(
                "    {uid} -> {target_id} [style=dashed, color=red, label=\"Folding\"];"
            ));
            continue;
        }

        for &child in &node.children {
            let child_id = format!("n{}", ids.len());
            ids.insert(child, child_id.clone());
            queue.push_back(child);

            let edge_label = match &tree[child].contraction {
                Some(contraction) => escape(&contraction.to_string()),
                None => String::new(),
            };
            lines.push(format!("    {uid} -> {child_id} [label=\"{edge_label}\"];"));
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
