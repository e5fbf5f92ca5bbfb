use std::sync::Arc;

use crate::constants::IMPASSABLE;
use crate::geometry::straight_line_distance;
use crate::graph_store::{Edge, Node};
use crate::risk_overlay::RiskOverlay;
use crate::types::NodeId;

/// Result of evaluating the traversal cost of one directed edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeCost {
    Traversable(f64),
    Impassable,
    /// Risk blending is active and the edge has no risk entry.
    MissingRiskData,
}

impl EdgeCost {
    fn from_value(cost: f64) -> Self {
        if cost.is_finite() && cost > IMPASSABLE {
            EdgeCost::Traversable(cost)
        } else {
            EdgeCost::Impassable
        }
    }
}

/// Distance over base weight. The weighted cost is computed once while the
/// graph is built and stored on the edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceCost;

impl DistanceCost {
    /// Build-time cost of `from -> to` on a way whose class has `base_weight`
    /// for the active transport mode. Returns [`IMPASSABLE`] for a zero
    /// weight.
    pub fn edge_cost(&self, from: &Node, to: &Node, base_weight: f64) -> f64 {
        if base_weight <= 0.0 {
            return IMPASSABLE;
        }

        straight_line_distance(from, to) / base_weight
    }
}

/// `alpha * exp(risk_a) + beta * exp(risk_b)` for the directed pair.
///
/// The coefficients are per query and are never written into the graph.
#[derive(Debug, Clone)]
pub struct RiskBlendedCost {
    overlay: Arc<RiskOverlay>,
    alpha: f64,
    beta: f64,
}

impl RiskBlendedCost {
    pub fn new(overlay: Arc<RiskOverlay>, alpha: f64, beta: f64) -> Self {
        RiskBlendedCost {
            overlay,
            alpha,
            beta,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn edge_cost(&self, from: NodeId, to: NodeId) -> EdgeCost {
        match self.overlay.get(from, to) {
            Some(entry) => EdgeCost::from_value(
                self.alpha * entry.risk_a.exp() + self.beta * entry.risk_b.exp(),
            ),
            None => EdgeCost::MissingRiskData,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CostModel {
    Distance(DistanceCost),
    RiskBlended(RiskBlendedCost),
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::Distance(DistanceCost)
    }
}

impl CostModel {
    /// Search-time cost of following `edge` out of `from`. A non-positive or
    /// non-finite result is reported as impassable, so the returned cost is
    /// never negative.
    pub fn traversal_cost(&self, from: NodeId, edge: &Edge) -> EdgeCost {
        match self {
            CostModel::Distance(_) => EdgeCost::from_value(edge.cost),
            CostModel::RiskBlended(cost) => cost.edge_cost(from, edge.to),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CostModel::Distance(_) => "distance",
            CostModel::RiskBlended(_) => "risk_blended",
        }
    }
}
