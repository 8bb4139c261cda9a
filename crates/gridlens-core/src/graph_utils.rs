use std::collections::HashMap;

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use crate::{NetworkSnapshot, NodeId};

/// Degree of a single node, used for the critical-node ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDegree {
    pub id: NodeId,
    pub degree: usize,
}

/// Topology summary shown next to the overlay (degree distribution, weak spots, islands).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologySummary {
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Degree per node, in snapshot order
    pub node_degrees: Vec<NodeDegree>,
    /// Up to three highest-degree nodes (ties keep snapshot order)
    pub critical_nodes: Vec<NodeDegree>,
    /// Nodes with at most one connection
    pub weak_nodes: Vec<NodeId>,
    pub avg_degree: f64,
    pub connected_components: usize,
}

const CRITICAL_NODE_COUNT: usize = 3;

/// Builds an undirected petgraph view of the snapshot and summarizes it.
///
/// Lines with an unknown endpoint still add one to the degree of the endpoint
/// that does exist, but do not join components.
pub fn topology_summary(snapshot: &NetworkSnapshot) -> TopologySummary {
    let mut graph: UnGraph<&NodeId, ()> =
        UnGraph::with_capacity(snapshot.nodes().len(), snapshot.edges().len());
    let mut index_map: HashMap<&NodeId, NodeIndex> = HashMap::new();
    for node in snapshot.nodes() {
        let idx = graph.add_node(&node.id);
        index_map.insert(&node.id, idx);
    }

    let mut degrees: HashMap<&NodeId, usize> = HashMap::new();
    for edge in snapshot.edges() {
        let from = index_map.get(&edge.from).copied();
        let to = index_map.get(&edge.to).copied();
        if from.is_some() {
            *degrees.entry(&edge.from).or_default() += 1;
        }
        if to.is_some() {
            *degrees.entry(&edge.to).or_default() += 1;
        }
        if let (Some(from), Some(to)) = (from, to) {
            graph.add_edge(from, to, ());
        }
    }

    let node_degrees: Vec<NodeDegree> = snapshot
        .nodes()
        .iter()
        .map(|node| NodeDegree {
            id: node.id.clone(),
            degree: degrees.get(&node.id).copied().unwrap_or(0),
        })
        .collect();

    let mut ranked = node_degrees.clone();
    // sort_by is stable, so equal degrees stay in snapshot order
    ranked.sort_by(|a, b| b.degree.cmp(&a.degree));
    ranked.truncate(CRITICAL_NODE_COUNT);

    let weak_nodes = node_degrees
        .iter()
        .filter(|entry| entry.degree <= 1)
        .map(|entry| entry.id.clone())
        .collect();

    let avg_degree = if node_degrees.is_empty() {
        0.0
    } else {
        node_degrees.iter().map(|entry| entry.degree).sum::<usize>() as f64
            / node_degrees.len() as f64
    };

    TopologySummary {
        total_nodes: snapshot.nodes().len(),
        total_edges: snapshot.edges().len(),
        node_degrees,
        critical_nodes: ranked,
        weak_nodes,
        avg_degree,
        connected_components: connected_components(&graph),
    }
}
