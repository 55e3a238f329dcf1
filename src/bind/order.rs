//! Dependency ordering of bound nodes

use rustc_hash::FxHashMap as HashMap;

use crate::ast::Span;
use crate::diag::{Diagnostic, DiagnosticCategory, Diagnostics};

use super::model::Node;

/// Order `nodes` so every node follows the nodes it references. Among nodes
/// that are ready at the same time, declaration order wins. Nodes caught in
/// a cycle are reported and appended in declaration order.
pub(super) fn sort(nodes: Vec<(Node, Span)>, diagnostics: &mut Diagnostics) -> Vec<Node> {
    // First declaration wins for duplicated names
    let mut index: HashMap<&str, usize> = HashMap::default();
    for (i, (node, _)) in nodes.iter().enumerate() {
        index.entry(node.name()).or_insert(i);
    }

    let deps: Vec<Vec<usize>> = nodes
        .iter()
        .map(|(node, _)| {
            node.dependencies()
                .into_iter()
                .filter_map(|name| index.get(name).copied())
                .collect()
        })
        .collect();

    let mut emitted = vec![false; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());

    while order.len() < nodes.len() {
        let ready = (0..nodes.len())
            .find(|&i| !emitted[i] && deps[i].iter().all(|&d| emitted[d]));
        match ready {
            Some(i) => {
                emitted[i] = true;
                order.push(i);
            }
            None => break,
        }
    }

    if order.len() < nodes.len() {
        let stuck: Vec<usize> = (0..nodes.len()).filter(|&i| !emitted[i]).collect();
        let names: Vec<&str> = stuck.iter().map(|&i| nodes[i].0.name()).collect();
        diagnostics.push(
            Diagnostic::error(format!("circular reference between {}", names.join(", ")))
                .with_span(nodes[stuck[0]].1)
                .with_category(DiagnosticCategory::Cycle),
        );
        order.extend(stuck);
    }

    let mut slots: Vec<Option<Node>> = nodes.into_iter().map(|(node, _)| Some(node)).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
