//! State-machine layout graphs.
//!
//! State documents carry an optional directed-graph layout used purely for
//! visualization: nodes with 2-D positions and adjacency (`targets`) lists,
//! plus explicit edges. The only maintenance this module owns is node
//! deletion, which must never leave a dangling edge or adjacency reference:
//! after a deletion the surviving nodes are renumbered to a contiguous
//! `1..=N` sequence ordered by their original ids, and every edge endpoint
//! and adjacency entry is rewritten through the same remap table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A positioned node in the layout graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: u64,
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Ids of nodes this node points at.
    #[serde(default)]
    pub targets: Vec<u64>,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: u64,
    pub target: u64,
}

/// Delete a node and repair the graph around it.
///
/// Steps, in order:
/// 1. remove the node itself
/// 2. remove every edge that has it as source or target
/// 3. remove it from every surviving node's `targets` list
/// 4. renumber surviving nodes `1..=N` ascending by original id, rewriting
///    edge endpoints and `targets` through the remap table
///
/// Returns false (and leaves the graph untouched) when no node has the id,
/// so repeated deletions are idempotent.
pub fn delete_node(nodes: &mut Vec<GraphNode>, edges: &mut Vec<GraphEdge>, id: u64) -> bool {
    if !nodes.iter().any(|n| n.id == id) {
        return false;
    }

    nodes.retain(|n| n.id != id);
    edges.retain(|e| e.source != id && e.target != id);
    for node in nodes.iter_mut() {
        node.targets.retain(|t| *t != id);
    }

    let mut survivors: Vec<u64> = nodes.iter().map(|n| n.id).collect();
    survivors.sort_unstable();
    let remap: BTreeMap<u64, u64> = survivors
        .iter()
        .enumerate()
        .map(|(index, old)| (*old, index as u64 + 1))
        .collect();

    for node in nodes.iter_mut() {
        node.id = remap[&node.id];
        for target in node.targets.iter_mut() {
            *target = remap[target];
        }
    }
    for edge in edges.iter_mut() {
        edge.source = remap[&edge.source];
        edge.target = remap[&edge.target];
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64, targets: &[u64]) -> GraphNode {
        GraphNode {
            id,
            name: format!("n{id}"),
            x: id as f64,
            y: 0.0,
            targets: targets.to_vec(),
        }
    }

    fn edge(source: u64, target: u64) -> GraphEdge {
        GraphEdge { source, target }
    }

    #[test]
    fn deletion_renumbers_contiguously() {
        let mut nodes = vec![node(1, &[2, 3]), node(2, &[3]), node(3, &[])];
        let mut edges = vec![edge(1, 2), edge(1, 3), edge(2, 3)];

        assert!(delete_node(&mut nodes, &mut edges, 2));

        let ids: Vec<u64> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
        // former node 3 is now node 2
        assert_eq!(nodes[0].targets, vec![2]);
        assert_eq!(edges, vec![edge(1, 2)]);
    }

    #[test]
    fn no_dangling_references_survive() {
        let mut nodes = vec![
            node(1, &[2, 4]),
            node(2, &[1, 4]),
            node(4, &[1]),
            node(7, &[4, 2]),
        ];
        let mut edges = vec![edge(1, 4), edge(2, 4), edge(4, 1), edge(7, 2)];

        assert!(delete_node(&mut nodes, &mut edges, 4));

        let live: Vec<u64> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(live, vec![1, 2, 3]);
        for n in &nodes {
            for t in &n.targets {
                assert!(live.contains(t), "dangling target {t} on node {}", n.id);
            }
        }
        for e in &edges {
            assert!(live.contains(&e.source) && live.contains(&e.target));
        }
    }

    #[test]
    fn missing_id_is_a_no_op() {
        let mut nodes = vec![node(1, &[]), node(5, &[1])];
        let mut edges = vec![edge(5, 1)];
        let before_nodes = nodes.clone();
        let before_edges = edges.clone();

        assert!(!delete_node(&mut nodes, &mut edges, 9));
        assert_eq!(nodes, before_nodes);
        assert_eq!(edges, before_edges);
    }

    #[test]
    fn repeated_deletions_stay_contiguous() {
        let mut nodes: Vec<GraphNode> = (1..=5).map(|i| node(i, &[(i % 5) + 1])).collect();
        let mut edges: Vec<GraphEdge> = (1..=5).map(|i| edge(i, (i % 5) + 1)).collect();

        assert!(delete_node(&mut nodes, &mut edges, 3));
        assert!(delete_node(&mut nodes, &mut edges, 1));
        assert!(delete_node(&mut nodes, &mut edges, 2));

        let ids: Vec<u64> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
