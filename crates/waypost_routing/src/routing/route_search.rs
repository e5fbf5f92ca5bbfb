use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::MAX_SEARCH_ITERATIONS;
use crate::cost_model::{CostModel, EdgeCost};
use crate::geometry::straight_line_distance;
use crate::graph_store::{GraphStore, Node};
use crate::routing::route_result::{RouteOutcome, RouteResult};
use crate::routing::search_graph::{CoveredGraph, SearchGraph};
use crate::routing::search_queue::{PendingQueue, SearchQueueItem};
use crate::stopwatch::Stopwatch;
use crate::tiles::tile_loader::TileLoader;
use crate::types::NodeId;

/// What happens when a node that already has a pending queue entry is
/// reached again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingPolicy {
    /// The first pending entry wins, whatever the bound of the new one.
    /// The search is then greedy and the returned path is not guaranteed to
    /// be the cheapest.
    #[default]
    FirstSeen,
    /// A new entry with a strictly lower bound replaces the pending one.
    KeepCheaper,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub max_iterations: usize,
    pub pending_policy: PendingPolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            max_iterations: MAX_SEARCH_ITERATIONS,
            pending_policy: PendingPolicy::default(),
        }
    }
}

/// Best-first search ordered by `cost so far + straight line distance to
/// the target`.
pub struct RouteSearch<'a> {
    cost_model: &'a CostModel,
    options: SearchOptions,
}

struct SearchState {
    queue: PendingQueue,

    /// Expanded nodes, mapped to the node they were reached from
    closed: FxHashMap<NodeId, Option<NodeId>>,

    /// Edges skipped because the risk overlay has no entry for them
    missing_risk_data: usize,
}

impl<'a> RouteSearch<'a> {
    pub fn new(cost_model: &'a CostModel) -> Self {
        Self::with_options(cost_model, SearchOptions::default())
    }

    pub fn with_options(cost_model: &'a CostModel, options: SearchOptions) -> Self {
        RouteSearch {
            cost_model,
            options,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn route(&self, graph: &GraphStore, start: NodeId, end: NodeId) -> RouteResult {
        let mut view = graph;
        self.search(&mut view, start, end)
    }

    /// Same as [`RouteSearch::route`], but the tile around every candidate
    /// node is loaded into `graph` before the node is considered.
    pub fn route_with_coverage(
        &self,
        graph: &mut GraphStore,
        loader: &TileLoader,
        start: NodeId,
        end: NodeId,
    ) -> RouteResult {
        let mut view = CoveredGraph { graph, loader };
        self.search(&mut view, start, end)
    }

    fn search(&self, view: &mut impl SearchGraph, start: NodeId, end: NodeId) -> RouteResult {
        let stopwatch = Stopwatch::new("route_search");

        let result = self.run(view, start, end);

        debug!(
            "Route {} -> {} ({}): {} after {} iterations, {} nodes",
            start,
            end,
            self.cost_model.name(),
            result.outcome,
            result.iterations,
            result.path.len()
        );
        stopwatch.report_count(result.iterations, "iterations");

        result
    }

    fn run(&self, view: &mut impl SearchGraph, start: NodeId, end: NodeId) -> RouteResult {
        if !view.graph().has_outgoing_edges(start) {
            return RouteResult::failed(RouteOutcome::NoSuchNode, 0);
        }

        // without coordinates for the target there is no bound to order by
        let Some(target) = view.graph().node(end).copied() else {
            return RouteResult::failed(RouteOutcome::NoRoute, 0);
        };

        let mut state = SearchState {
            queue: PendingQueue::with_capacity(64),
            closed: FxHashMap::default(),
            missing_risk_data: 0,
        };
        state.closed.insert(start, None);
        self.expand(view, &mut state, start, 0.0, &target);

        let mut iterations = 0;
        loop {
            if iterations >= self.options.max_iterations {
                return RouteResult::failed(RouteOutcome::GaveUp, iterations);
            }
            iterations += 1;

            let Some(item) = state.queue.pop_front() else {
                break;
            };

            if state.closed.contains_key(&item.end_node) {
                continue;
            }
            state.closed.insert(item.end_node, Some(item.parent));

            if item.end_node == end {
                return RouteResult::succeeded(build_path(&state.closed, end), iterations);
            }

            self.expand(view, &mut state, item.end_node, item.cost_so_far, &target);
        }

        if state.missing_risk_data > 0 {
            debug!(
                "{} edges had no risk data, {} still queued",
                state.missing_risk_data,
                state.queue.len()
            );
            RouteResult::failed(RouteOutcome::RiskDataMissing, iterations)
        } else {
            RouteResult::failed(RouteOutcome::NoRoute, iterations)
        }
    }

    /// Offers every open neighbour of `node` to the queue.
    fn expand(
        &self,
        view: &mut impl SearchGraph,
        state: &mut SearchState,
        node: NodeId,
        cost_so_far: f64,
        target: &Node,
    ) {
        // discovering candidates may add edges to the graph
        let edges = view.graph().node_edges(node).to_vec();

        for edge in &edges {
            if state.closed.contains_key(&edge.to) {
                continue;
            }

            view.discover(edge.to);

            let cost = match self.cost_model.traversal_cost(node, edge) {
                EdgeCost::Traversable(cost) => cost,
                EdgeCost::Impassable => continue,
                EdgeCost::MissingRiskData => {
                    state.missing_risk_data += 1;
                    continue;
                }
            };

            let Some(candidate) = view.graph().node(edge.to).copied() else {
                continue;
            };

            let cost_so_far = cost_so_far + cost;
            let heuristic_bound = cost_so_far + straight_line_distance(&candidate, target);

            if let Some(pending_bound) = state.queue.pending_bound(edge.to) {
                match self.options.pending_policy {
                    PendingPolicy::FirstSeen => continue,
                    PendingPolicy::KeepCheaper if heuristic_bound >= pending_bound => continue,
                    PendingPolicy::KeepCheaper => {}
                }
            }

            state.queue.push(SearchQueueItem {
                end_node: edge.to,
                cost_so_far,
                heuristic_bound,
                parent: node,
            });
        }
    }
}

fn build_path(closed: &FxHashMap<NodeId, Option<NodeId>>, end: NodeId) -> Vec<NodeId> {
    let mut path = vec![end];
    let mut node = end;

    while let Some(&Some(parent)) = closed.get(&node) {
        path.push(parent);
        node = parent;
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::cost_model::RiskBlendedCost;
    use crate::error::TileError;
    use crate::graph_builder::GraphBuilder;
    use crate::osm::map_data::{MapData, OsmWay};
    use crate::risk_overlay::{RiskEntry, RiskOverlay};
    use crate::test_graph_utils::test_graph::{
        A, B, C, D, add_chain, chain_graph, cycle_graph, detour_graph,
    };
    use crate::tiles::tile::Tile;
    use crate::tiles::tile_loader::TileProvider;
    use crate::transport_mode::TransportMode;

    fn distance_route(graph: &GraphStore, start: NodeId, end: NodeId) -> RouteResult {
        let cost_model = CostModel::default();
        RouteSearch::new(&cost_model).route(graph, start, end)
    }

    #[test]
    fn follows_a_single_path() {
        let graph = chain_graph(&[10, 20, 30, 40]);

        let result = distance_route(&graph, 10, 40);

        assert_eq!(result.outcome, RouteOutcome::Succeeded);
        assert_eq!(result.path, vec![10, 20, 30, 40]);
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn start_without_outgoing_edges_is_no_such_node() {
        let graph = chain_graph(&[1, 2]);

        let result = distance_route(&graph, 2, 1);
        assert_eq!(result, RouteResult::failed(RouteOutcome::NoSuchNode, 0));

        let result = distance_route(&GraphStore::new(), A, D);
        assert_eq!(result.outcome, RouteOutcome::NoSuchNode);
        assert!(result.path.is_empty());
    }

    #[test]
    fn unreachable_target_is_no_route() {
        let mut graph = chain_graph(&[1, 2, 3]);
        add_chain(&mut graph, &[4, 5], 1.0);

        let result = distance_route(&graph, 1, 5);

        assert_eq!(result.outcome, RouteOutcome::NoRoute);
        assert!(result.path.is_empty());
        // two expansions, then the pop that finds the queue empty
        assert_eq!(result.iterations, 3);

        assert_eq!(distance_route(&graph, 1, 99).outcome, RouteOutcome::NoRoute);
    }

    #[test]
    fn start_is_closed_so_routing_to_itself_finds_nothing() {
        let mut graph = GraphStore::new();
        graph.add_edge(Node::new(1, 0.0, 0.0), Node::new(2, 0.0, 0.001), 1.0);
        graph.add_edge(Node::new(2, 0.0, 0.001), Node::new(1, 0.0, 0.0), 1.0);

        let result = distance_route(&graph, 1, 1);

        // the edge back to 1 is never offered since 1 is closed up front
        assert_eq!(result, RouteResult::failed(RouteOutcome::NoRoute, 2));

        let result = distance_route(&chain_graph(&[1, 2]), 1, 1);
        assert_eq!(result.outcome, RouteOutcome::NoRoute);
        assert!(result.path.is_empty());
    }

    #[test]
    fn first_pending_entry_wins() {
        // D is queued straight from A before the cheaper detour reaches it
        let graph = detour_graph();

        let result = distance_route(&graph, A, D);

        assert_eq!(result.outcome, RouteOutcome::Succeeded);
        assert_eq!(result.path, vec![A, D]);
    }

    #[test]
    fn keep_cheaper_finds_the_detour() {
        let graph = detour_graph();
        let cost_model = CostModel::default();
        let options = SearchOptions {
            pending_policy: PendingPolicy::KeepCheaper,
            ..SearchOptions::default()
        };

        let result = RouteSearch::with_options(&cost_model, options).route(&graph, A, D);

        assert_eq!(result.outcome, RouteOutcome::Succeeded);
        assert_eq!(result.path, vec![A, B, C, D]);
        // the stale entry of D is never popped
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn gives_up_after_exactly_the_iteration_budget() {
        let graph = cycle_graph(2_000_001, 5_000_000);

        let result = distance_route(&graph, 0, 5_000_000);

        assert_eq!(result.outcome, RouteOutcome::GaveUp);
        assert!(result.path.is_empty());
        assert_eq!(result.iterations, MAX_SEARCH_ITERATIONS);
    }

    #[test]
    fn budget_is_checked_before_each_iteration() {
        // 10 expansions, then one more pop finds the queue empty
        let graph = cycle_graph(11, 100);
        let cost_model = CostModel::default();
        let options = |max_iterations| SearchOptions {
            max_iterations,
            ..SearchOptions::default()
        };

        let result = RouteSearch::with_options(&cost_model, options(11)).route(&graph, 0, 100);
        assert_eq!(result.outcome, RouteOutcome::NoRoute);
        assert_eq!(result.iterations, 11);

        let result = RouteSearch::with_options(&cost_model, options(10)).route(&graph, 0, 100);
        assert_eq!(result.outcome, RouteOutcome::GaveUp);
        assert_eq!(result.iterations, 10);
    }

    fn risk_model(entries: &[(NodeId, NodeId, f64, f64)], alpha: f64, beta: f64) -> CostModel {
        let mut overlay = RiskOverlay::new();
        for &(parent, child, risk_a, risk_b) in entries {
            overlay.insert(parent, child, RiskEntry { risk_a, risk_b });
        }
        CostModel::RiskBlended(RiskBlendedCost::new(Arc::new(overlay), alpha, beta))
    }

    #[test]
    fn risk_blended_search_prefers_low_risk() {
        let a = Node::new(A, 0.0, 0.0);
        let b = Node::new(B, 0.001, 0.001);
        let c = Node::new(C, -0.001, 0.001);
        let d = Node::new(D, 0.0, 0.002);

        let mut graph = GraphStore::new();
        graph.add_edge(a, b, 1.0);
        graph.add_edge(a, c, 2.0);
        graph.add_edge(b, d, 1.0);
        graph.add_edge(c, d, 1.0);

        assert_eq!(distance_route(&graph, A, D).path, vec![A, B, D]);

        let cost_model = risk_model(
            &[
                (A, B, 2.0, 0.0),
                (A, C, 0.0, 0.0),
                (B, D, 0.0, 0.0),
                (C, D, 0.0, 0.0),
            ],
            1.0,
            0.0,
        );

        let result = RouteSearch::new(&cost_model).route(&graph, A, D);

        assert_eq!(result.outcome, RouteOutcome::Succeeded);
        assert_eq!(result.path, vec![A, C, D]);
    }

    #[test]
    fn missing_risk_data_is_reported_distinctly() {
        let graph = chain_graph(&[1, 2, 3]);
        let cost_model = risk_model(&[(1, 2, 0.0, 0.0)], 1.0, 1.0);

        let result = RouteSearch::new(&cost_model).route(&graph, 1, 3);

        assert_eq!(result.outcome, RouteOutcome::RiskDataMissing);
        assert!(result.path.is_empty());
    }

    #[test]
    fn zero_risk_cost_edges_are_never_enqueued() {
        let graph = detour_graph();
        // with both coefficients at zero the direct edge costs nothing
        let cost_model = risk_model(
            &[
                (A, D, 0.0, 0.0),
                (A, B, 0.0, 0.0),
                (B, C, 0.0, 0.0),
                (C, D, 0.0, 0.0),
            ],
            0.0,
            0.0,
        );

        let result = RouteSearch::new(&cost_model).route(&graph, A, D);

        assert_eq!(result.outcome, RouteOutcome::NoRoute);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn random_single_paths_are_found() {
        let mut rng = SmallRng::seed_from_u64(1_337);

        for _ in 0..50 {
            let len = rng.random_range(2..40);
            let mut graph = GraphStore::new();
            let path: Vec<NodeId> = (0..len).map(|index| index * 3 + 1).collect();
            let positions: Vec<Node> = path
                .iter()
                .map(|&id| {
                    Node::new(
                        id,
                        rng.random_range(-1.0..1.0),
                        rng.random_range(-1.0..1.0),
                    )
                })
                .collect();

            for (index, pair) in positions.windows(2).enumerate() {
                graph.add_edge(pair[0], pair[1], rng.random_range(0.001..5.0));

                // dead-end spur that never leads back
                let spur = Node::new(
                    path[index] + 1,
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                );
                graph.add_edge(pair[0], spur, rng.random_range(0.001..5.0));
            }

            let result = distance_route(&graph, path[0], path[path.len() - 1]);

            assert_eq!(result.outcome, RouteOutcome::Succeeded);
            assert_eq!(result.path, path);
        }
    }

    struct BridgeProvider;

    impl TileProvider for BridgeProvider {
        fn fetch(&self, _tile: Tile) -> Result<MapData, TileError> {
            let mut data = MapData::default();
            data.add_node(Node::new(2, 0.001, 0.002));
            data.add_node(Node::new(3, 0.001, 0.003));
            data.add_way(OsmWay {
                id: 1,
                nodes: vec![2, 3],
                tags: [("highway".to_string(), "primary".to_string())]
                    .into_iter()
                    .collect(),
            });
            Ok(data)
        }
    }

    #[test]
    fn coverage_grows_the_graph_during_search() {
        let mut graph = GraphStore::new();
        graph.add_edge(
            Node::new(1, 0.001, 0.001),
            Node::new(2, 0.001, 0.002),
            0.001,
        );
        graph.add_edge(
            Node::new(3, 0.001, 0.003),
            Node::new(4, 0.001, 0.004),
            0.001,
        );

        assert_eq!(distance_route(&graph, 1, 4).outcome, RouteOutcome::NoRoute);

        let loader = TileLoader::new(
            Box::new(BridgeProvider),
            GraphBuilder::new(TransportMode::Foot),
            15,
        );
        let cost_model = CostModel::default();
        let result =
            RouteSearch::new(&cost_model).route_with_coverage(&mut graph, &loader, 1, 4);

        assert_eq!(result.outcome, RouteOutcome::Succeeded);
        assert_eq!(result.path, vec![1, 2, 3, 4]);
        assert_eq!(loader.fetched_count(), 1);
        assert!(graph.has_outgoing_edges(2));
    }
}
