use std::fmt;

use serde::Serialize;

use crate::types::NodeId;

/// Terminal state of a route search. Failures are values, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOutcome {
    Succeeded,
    /// The start node has no outgoing edges.
    NoSuchNode,
    /// The queue emptied before the end node was reached.
    NoRoute,
    /// The iteration budget ran out.
    GaveUp,
    /// The queue emptied after edges were skipped for lack of risk data.
    RiskDataMissing,
}

impl RouteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteOutcome::Succeeded => "success",
            RouteOutcome::NoSuchNode => "no_such_node",
            RouteOutcome::NoRoute => "no_route",
            RouteOutcome::GaveUp => "gave_up",
            RouteOutcome::RiskDataMissing => "risk_data_missing",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RouteOutcome::Succeeded => "route found",
            RouteOutcome::NoSuchNode => "the start point is not connected to the network",
            RouteOutcome::NoRoute => "the destination cannot be reached from the start point",
            RouteOutcome::GaveUp => "the search gave up before reaching the destination",
            RouteOutcome::RiskDataMissing => {
                "no route could be evaluated, some road segments have no risk data"
            }
        }
    }
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub outcome: RouteOutcome,
    /// Node ids from start to end; empty unless the search succeeded.
    pub path: Vec<NodeId>,
    pub iterations: usize,
}

impl RouteResult {
    pub fn succeeded(path: Vec<NodeId>, iterations: usize) -> Self {
        RouteResult {
            outcome: RouteOutcome::Succeeded,
            path,
            iterations,
        }
    }

    pub fn failed(outcome: RouteOutcome, iterations: usize) -> Self {
        RouteResult {
            outcome,
            path: Vec::new(),
            iterations,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == RouteOutcome::Succeeded
    }
}
