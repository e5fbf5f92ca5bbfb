use crate::graph_store::Node;

/// Straight-line distance in raw degrees between two nodes.
///
/// No projection correction is applied: one degree of longitude counts the
/// same as one degree of latitude, whatever the latitude. Costs and the
/// search heuristic are both expressed in this unit.
pub fn straight_line_distance(from: &Node, to: &Node) -> f64 {
    (to.lat - from.lat).hypot(to.lon - from.lon)
}

/// Squared planar delta between a node and a coordinate, used for snapping.
#[inline(always)]
pub fn squared_delta(node: &Node, lat: f64, lon: f64) -> f64 {
    let dy = node.lat - lat;
    let dx = node.lon - lon;
    dx * dx + dy * dy
}
