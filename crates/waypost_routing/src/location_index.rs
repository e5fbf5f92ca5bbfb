use rstar::RTree;
use rstar::primitives::GeomWithData;
use tracing::info;

use crate::geometry::squared_delta;
use crate::graph_store::GraphStore;
use crate::types::NodeId;

/// Finds the stored node closest to an arbitrary coordinate.
///
/// Distance is the squared planar delta `(Δlat)² + (Δlon)²`. Ties go to the
/// node that comes first in storage order. `None` means the graph has no
/// nodes.
pub trait NearestNodeIndex {
    fn find_nearest(&self, lat: f64, lon: f64) -> Option<NodeId>;
}

/// Full scan over every routeable node.
pub struct LinearScanIndex<'a> {
    graph: &'a GraphStore,
}

impl<'a> LinearScanIndex<'a> {
    pub fn new(graph: &'a GraphStore) -> Self {
        LinearScanIndex { graph }
    }
}

impl NearestNodeIndex for LinearScanIndex<'_> {
    fn find_nearest(&self, lat: f64, lon: f64) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;

        for node in self.graph.nodes() {
            let distance = squared_delta(node, lat, lon);
            // strictly smaller only, the first node wins a tie
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((node.id, distance));
            }
        }

        best.map(|(node_id, _)| node_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedNode {
    storage_order: usize,
    node_id: NodeId,
}

type LocationIndexObject = GeomWithData<[f64; 2], IndexedNode>;

/// R-tree over a snapshot of the graph's nodes, for graphs that no longer
/// change. Gives the same answers as [`LinearScanIndex`], tie-break included.
pub struct LocationIndex {
    tree: RTree<LocationIndexObject>,
}

impl LocationIndex {
    pub fn build_from_graph(graph: &GraphStore) -> LocationIndex {
        info!("Building location index over {} nodes", graph.node_count());

        let tree = RTree::bulk_load(
            graph
                .nodes()
                .iter()
                .enumerate()
                .map(|(storage_order, node)| {
                    LocationIndexObject::new(
                        [node.lon, node.lat],
                        IndexedNode {
                            storage_order,
                            node_id: node.id,
                        },
                    )
                })
                .collect(),
        );

        LocationIndex { tree }
    }

    pub fn size(&self) -> usize {
        self.tree.size()
    }
}

impl NearestNodeIndex for LocationIndex {
    fn find_nearest(&self, lat: f64, lon: f64) -> Option<NodeId> {
        let mut candidates = self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[lon, lat]);

        let (first, best_distance) = candidates.next()?;

        let closest = candidates
            .take_while(|(_, distance)| *distance == best_distance)
            .map(|(object, _)| object.data)
            .fold(first.data, |best, candidate| {
                if candidate.storage_order < best.storage_order {
                    candidate
                } else {
                    best
                }
            });

        Some(closest.node_id)
    }
}
