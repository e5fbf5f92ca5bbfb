use crate::graph_store::GraphStore;
use crate::tiles::tile_loader::TileLoader;
use crate::types::NodeId;

/// Graph view used by the route search. `discover` is called once for each
/// candidate node before it is considered for the queue, which lets the
/// graph grow while the search runs.
pub(crate) trait SearchGraph {
    fn graph(&self) -> &GraphStore;

    fn discover(&mut self, _node: NodeId) {}
}

impl SearchGraph for &GraphStore {
    fn graph(&self) -> &GraphStore {
        *self
    }
}

/// Graph that loads the tile around every discovered node.
pub(crate) struct CoveredGraph<'a> {
    pub graph: &'a mut GraphStore,
    pub loader: &'a TileLoader,
}

impl SearchGraph for CoveredGraph<'_> {
    fn graph(&self) -> &GraphStore {
        &*self.graph
    }

    fn discover(&mut self, node: NodeId) {
        if let Some(position) = self.graph.node(node).copied() {
            self.loader
                .ensure_coverage(self.graph, position.lat, position.lon);
        }
    }
}
