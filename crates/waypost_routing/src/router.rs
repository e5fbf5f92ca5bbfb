use std::path::Path;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cost_model::{CostModel, DistanceCost, RiskBlendedCost};
use crate::error::{GraphFileError, RecordError};
use crate::graph_builder::GraphBuilder;
use crate::graph_store::GraphStore;
use crate::location_index::{LinearScanIndex, LocationIndex, NearestNodeIndex};
use crate::osm::map_data::MapData;
use crate::risk_overlay::RiskOverlay;
use crate::routing::route_result::{RouteOutcome, RouteResult};
use crate::routing::route_search::{RouteSearch, SearchOptions};
use crate::tiles::tile_loader::TileLoader;
use crate::transport_mode::TransportMode;
use crate::types::NodeId;

/// Per-query risk coefficients. Both zero means plain distance routing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryCost {
    pub alpha: f64,
    pub beta: f64,
}

impl QueryCost {
    pub fn new(alpha: f64, beta: f64) -> Self {
        QueryCost { alpha, beta }
    }

    pub fn is_risk_weighted(&self) -> bool {
        self.alpha != 0.0 || self.beta != 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResponse {
    pub outcome: RouteOutcome,
    /// `[lat, lon]` pairs from start to end
    pub coords: Vec<[f64; 2]>,
    pub iterations: usize,
}

impl RouteResponse {
    fn failed(outcome: RouteOutcome) -> Self {
        RouteResponse {
            outcome,
            coords: Vec::new(),
            iterations: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == RouteOutcome::Succeeded
    }
}

/// A routing graph for one transport mode, shared between queries.
///
/// Without a tile loader the graph never changes after construction and
/// queries only take a read lock. With a tile loader every query holds the
/// write lock for its whole duration, since the search may grow the graph.
pub struct Router {
    graph: RwLock<GraphStore>,
    mode: TransportMode,
    index: Option<LocationIndex>,
    risk_overlay: Option<Arc<RiskOverlay>>,
    tile_loader: Option<TileLoader>,
    search_options: SearchOptions,
}

impl Router {
    pub fn new(graph: GraphStore, mode: TransportMode) -> Router {
        let index = LocationIndex::build_from_graph(&graph);

        Router {
            graph: RwLock::new(graph),
            mode,
            index: Some(index),
            risk_overlay: None,
            tile_loader: None,
            search_options: SearchOptions::default(),
        }
    }

    pub fn from_map_data(data: &MapData, mode: TransportMode) -> Router {
        Router::new(GraphBuilder::new(mode).build(data), mode)
    }

    pub fn from_map_file(path: impl AsRef<Path>, mode: TransportMode) -> Result<Router, RecordError> {
        let data = MapData::from_json_file(path)?;
        Ok(Router::from_map_data(&data, mode))
    }

    pub fn from_graph_file(
        path: impl AsRef<Path>,
        mode: TransportMode,
    ) -> Result<Router, GraphFileError> {
        Ok(Router::new(GraphStore::from_file(path)?, mode))
    }

    pub fn with_risk_overlay(mut self, overlay: Arc<RiskOverlay>) -> Router {
        self.risk_overlay = Some(overlay);
        self
    }

    /// Loads tiles on demand during queries. The graph can then change at any
    /// time, so nearest node lookups fall back to a full scan.
    pub fn with_tile_loader(mut self, loader: TileLoader) -> Router {
        self.index = None;
        self.tile_loader = Some(loader);
        self
    }

    pub fn with_search_options(mut self, options: SearchOptions) -> Router {
        self.search_options = options;
        self
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn has_risk_overlay(&self) -> bool {
        self.risk_overlay.is_some()
    }

    pub fn graph(&self) -> RwLockReadGuard<'_, GraphStore> {
        self.graph.read()
    }

    pub fn closest_node(&self, lat: f64, lon: f64) -> Option<NodeId> {
        self.nearest(&self.graph.read(), lat, lon)
    }

    fn nearest(&self, graph: &GraphStore, lat: f64, lon: f64) -> Option<NodeId> {
        match &self.index {
            Some(index) => index.find_nearest(lat, lon),
            None => LinearScanIndex::new(graph).find_nearest(lat, lon),
        }
    }

    /// Risk blending needs a loaded overlay and at least one non-zero
    /// coefficient, anything else routes by distance.
    pub fn cost_model(&self, cost: QueryCost) -> CostModel {
        match &self.risk_overlay {
            Some(overlay) if cost.is_risk_weighted() => CostModel::RiskBlended(
                RiskBlendedCost::new(overlay.clone(), cost.alpha, cost.beta),
            ),
            _ => CostModel::Distance(DistanceCost),
        }
    }

    pub fn route(&self, start: NodeId, end: NodeId, cost: QueryCost) -> RouteResult {
        let cost_model = self.cost_model(cost);
        let search = RouteSearch::with_options(&cost_model, self.search_options);

        match &self.tile_loader {
            Some(loader) => search.route_with_coverage(&mut self.graph.write(), loader, start, end),
            None => search.route(&self.graph.read(), start, end),
        }
    }

    /// Snaps both coordinates to their nearest node and routes between them.
    pub fn route_between(
        &self,
        from_lat: f64,
        from_lon: f64,
        to_lat: f64,
        to_lon: f64,
        cost: QueryCost,
    ) -> RouteResponse {
        let cost_model = self.cost_model(cost);
        let search = RouteSearch::with_options(&cost_model, self.search_options);

        let response = match &self.tile_loader {
            Some(loader) => {
                let mut graph = self.graph.write();
                loader.ensure_coverage(&mut graph, from_lat, from_lon);
                loader.ensure_coverage(&mut graph, to_lat, to_lon);

                match self.endpoints(&graph, from_lat, from_lon, to_lat, to_lon) {
                    Some((start, end)) => {
                        let result = search.route_with_coverage(&mut graph, loader, start, end);
                        to_response(&graph, result)
                    }
                    None => RouteResponse::failed(RouteOutcome::NoSuchNode),
                }
            }
            None => {
                let graph = self.graph.read();

                match self.endpoints(&graph, from_lat, from_lon, to_lat, to_lon) {
                    Some((start, end)) => to_response(&graph, search.route(&graph, start, end)),
                    None => RouteResponse::failed(RouteOutcome::NoSuchNode),
                }
            }
        };

        info!(
            "Query ({}, {}) -> ({}, {}) with {}: {}, {} points",
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            cost_model.name(),
            response.outcome,
            response.coords.len()
        );

        response
    }

    fn endpoints(
        &self,
        graph: &GraphStore,
        from_lat: f64,
        from_lon: f64,
        to_lat: f64,
        to_lon: f64,
    ) -> Option<(NodeId, NodeId)> {
        let start = self.nearest(graph, from_lat, from_lon)?;
        let end = self.nearest(graph, to_lat, to_lon)?;
        Some((start, end))
    }
}

fn to_response(graph: &GraphStore, result: RouteResult) -> RouteResponse {
    let coords = result
        .path
        .iter()
        .filter_map(|&id| graph.node(id))
        .map(|node| [node.lat, node.lon])
        .collect();

    RouteResponse {
        outcome: result.outcome,
        coords,
        iterations: result.iterations,
    }
}
