use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use waypost_routing::constants::MAX_SEARCH_ITERATIONS;
use waypost_routing::risk_overlay::RiskOverlay;
use waypost_routing::router::{QueryCost, Router};
use waypost_routing::routing::route_search::{PendingPolicy, SearchOptions};

use crate::graph_source::GraphSourceArgs;
use crate::parsers::{Coordinate, parse_coordinate};

#[derive(Args, Debug)]
pub struct RouteArgs {
    #[command(flatten)]
    source: GraphSourceArgs,

    /// Start as `lat,lon`
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    from: Coordinate,

    /// Destination as `lat,lon`
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    to: Coordinate,

    /// Risk table, `parent,child,...,risk_a,risk_b` per line
    #[arg(long)]
    risk: Option<PathBuf>,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    alpha: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    beta: f64,

    #[arg(long, default_value_t = MAX_SEARCH_ITERATIONS)]
    max_iterations: usize,

    /// Let a cheaper candidate replace a node's pending queue entry
    #[arg(long)]
    keep_cheaper: bool,
}

impl RouteArgs {
    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_iterations: self.max_iterations,
            pending_policy: if self.keep_cheaper {
                PendingPolicy::KeepCheaper
            } else {
                PendingPolicy::FirstSeen
            },
        }
    }
}

pub fn run(args: RouteArgs) -> anyhow::Result<()> {
    let graph = args.source.load_graph()?;
    let mut router =
        Router::new(graph, args.source.transport).with_search_options(args.search_options());

    if let Some(path) = &args.risk {
        let overlay = RiskOverlay::from_csv_path(path)
            .with_context(|| format!("Cannot load risk file {}", path.display()))?;
        router = router.with_risk_overlay(Arc::new(overlay));
    }

    let response = router.route_between(
        args.from.lat,
        args.from.lon,
        args.to.lat,
        args.to.lon,
        QueryCost::new(args.alpha, args.beta),
    );

    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        anyhow::bail!("{}", response.outcome.description());
    }
    Ok(())
}
