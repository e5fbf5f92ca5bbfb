use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::IMPASSABLE;
use crate::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Node { id, lat, lon }
    }
}

/// Directed adjacency entry. `cost` is always strictly positive once stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub to: NodeId,
    pub cost: f64,
}

/// Routeable nodes and the directed, weighted adjacency between them.
///
/// Nodes are kept in insertion order, which is the "storage order" used for
/// tie-breaking by the nearest node lookup. Outgoing edges of a node are also
/// kept in insertion order so that searches are deterministic.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GraphStore {
    nodes: Vec<Node>,
    node_index: FxHashMap<NodeId, usize>,
    adjacency_list: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node without edges. A second insertion with the same id is
    /// a no-op and returns `false`.
    #[cfg(test)]
    pub(crate) fn add_node(&mut self, node: Node) -> bool {
        self.slot_or_insert(node).1
    }

    /// Inserts the directed edge `from -> to`, storing both endpoints.
    ///
    /// Edges are insert-once: if `from -> to` already exists the stored cost
    /// is kept and `false` is returned. Costs that are not strictly positive
    /// are impassable and never stored.
    pub fn add_edge(&mut self, from: Node, to: Node, cost: f64) -> bool {
        if cost.is_nan() || cost <= IMPASSABLE {
            warn!(
                "Refusing impassable edge {} -> {} with cost {}",
                from.id, to.id, cost
            );
            return false;
        }

        let (from_slot, _) = self.slot_or_insert(from);
        self.slot_or_insert(to);

        let edges = &mut self.adjacency_list[from_slot];
        if edges.iter().any(|edge| edge.to == to.id) {
            return false;
        }

        edges.push(Edge { to: to.id, cost });
        self.edge_count += 1;
        true
    }

    fn slot_or_insert(&mut self, node: Node) -> (usize, bool) {
        if let Some(&slot) = self.node_index.get(&node.id) {
            return (slot, false);
        }

        let slot = self.nodes.len();
        self.nodes.push(node);
        self.adjacency_list.push(Vec::new());
        self.node_index.insert(node.id, slot);
        (slot, true)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    /// All stored nodes, in storage order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Outgoing edges of `id`, empty for unknown nodes.
    pub fn node_edges(&self, id: NodeId) -> &[Edge] {
        match self.node_index.get(&id) {
            Some(&slot) => &self.adjacency_list[slot],
            None => &[],
        }
    }

    pub fn has_outgoing_edges(&self, id: NodeId) -> bool {
        !self.node_edges(id).is_empty()
    }

    pub fn edge_cost(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.node_edges(from)
            .iter()
            .find(|edge| edge.to == to)
            .map(|edge| edge.cost)
    }

    /// Every directed edge as `(from, edge)`, grouped by source node in
    /// storage order.
    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Edge)> {
        self.nodes
            .iter()
            .zip(self.adjacency_list.iter())
            .flat_map(|(node, edges)| edges.iter().map(move |edge| (node, edge)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId) -> Node {
        Node::new(id, id as f64, 0.0)
    }

    #[test]
    fn first_edge_insertion_wins() {
        let mut graph = GraphStore::new();

        assert!(graph.add_edge(node(1), node(2), 1.5));
        assert!(!graph.add_edge(node(1), node(2), 9.0));

        assert_eq!(graph.edge_cost(1, 2), Some(1.5));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn edges_are_directed() {
        let mut graph = GraphStore::new();
        graph.add_edge(node(1), node(2), 1.0);

        assert!(graph.has_outgoing_edges(1));
        assert!(!graph.has_outgoing_edges(2));
        assert_eq!(graph.edge_cost(2, 1), None);
        assert!(graph.contains_node(2));
    }

    #[test]
    fn impassable_edges_are_not_stored() {
        let mut graph = GraphStore::new();

        assert!(!graph.add_edge(node(1), node(2), 0.0));
        assert!(!graph.add_edge(node(1), node(2), -1.0));
        assert!(!graph.add_edge(node(1), node(2), f64::NAN));

        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn nodes_keep_their_first_coordinates() {
        let mut graph = GraphStore::new();

        assert!(graph.add_node(Node::new(7, 1.0, 2.0)));
        assert!(!graph.add_node(Node::new(7, 3.0, 4.0)));

        assert_eq!(graph.node(7), Some(&Node::new(7, 1.0, 2.0)));
    }

    #[test]
    fn storage_order_follows_insertion() {
        let mut graph = GraphStore::new();
        graph.add_edge(node(3), node(1), 1.0);
        graph.add_edge(node(1), node(2), 1.0);
        graph.add_edge(node(3), node(2), 1.0);

        let ids: Vec<NodeId> = graph.nodes().iter().map(|node| node.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let targets: Vec<NodeId> = graph.node_edges(3).iter().map(|edge| edge.to).collect();
        assert_eq!(targets, vec![1, 2]);

        let all: Vec<(NodeId, NodeId)> = graph
            .edges()
            .map(|(from, edge)| (from.id, edge.to))
            .collect();
        assert_eq!(all, vec![(3, 1), (3, 2), (1, 2)]);
    }

    #[test]
    fn unknown_nodes_have_no_edges() {
        let graph = GraphStore::new();
        assert!(graph.node_edges(42).is_empty());
        assert!(graph.node(42).is_none());
    }
}
