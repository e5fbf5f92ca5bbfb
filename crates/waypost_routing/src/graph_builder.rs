use tracing::{debug, info};

use crate::constants::IMPASSABLE;
use crate::cost_model::DistanceCost;
use crate::graph_store::{GraphStore, Node};
use crate::osm::map_data::MapData;
use crate::properties::access_parser::can_access;
use crate::properties::routing_weights::base_weight;
use crate::properties::way_tags::WayTagSet;
use crate::stopwatch::Stopwatch;
use crate::transport_mode::TransportMode;

/// Turns ways into directed, weighted edges for one transport mode.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    mode: TransportMode,
    cost: DistanceCost,
}

impl GraphBuilder {
    pub fn new(mode: TransportMode) -> Self {
        GraphBuilder {
            mode,
            cost: DistanceCost,
        }
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn build(&self, data: &MapData) -> GraphStore {
        let mut graph = GraphStore::new();
        self.ingest_map_data(&mut graph, data);
        graph
    }

    /// Adds every way of `data` to `graph` and returns how many edges were
    /// created.
    pub fn ingest_map_data(&self, graph: &mut GraphStore, data: &MapData) -> usize {
        let stopwatch = Stopwatch::new("graph_builder/ingest");

        let added: usize = data
            .ways()
            .map(|way| self.ingest_way(graph, &WayTagSet::from_way(way), &data.way_nodes(way)))
            .sum();

        info!(
            "Added {} {} edges, graph now has {} nodes and {} edges",
            added,
            self.mode,
            graph.node_count(),
            graph.edge_count()
        );
        stopwatch.report_count(added, "edges");

        added
    }

    /// Adds the edges of one way and returns how many were created.
    ///
    /// The forward edge is added for every consecutive pair of nodes; the
    /// reverse edge only when the way is not oneway, or always on foot. Pairs
    /// whose cost is impassable produce no edge, and their nodes are only
    /// stored if some other edge references them.
    pub fn ingest_way(&self, graph: &mut GraphStore, tags: &WayTagSet, nodes: &[Node]) -> usize {
        if !can_access(self.mode, tags) {
            return 0;
        }

        let weight = base_weight(self.mode, tags.class_for(self.mode));
        if weight <= IMPASSABLE {
            debug!(
                "Class `{}` has no weight for {}, skipping way",
                tags.class_for(self.mode),
                self.mode
            );
            return 0;
        }

        let reversible = tags.is_reversible() || self.mode.ignores_oneway();
        let mut added = 0;

        for pair in nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let cost = self.cost.edge_cost(&from, &to, weight);

            if cost <= IMPASSABLE {
                continue;
            }

            if graph.add_edge(from, to, cost) {
                added += 1;
            }

            if reversible && graph.add_edge(to, from, cost) {
                added += 1;
            }
        }

        added
    }
}
