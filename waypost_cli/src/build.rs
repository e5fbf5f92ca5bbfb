use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;
use waypost_routing::graph_builder::GraphBuilder;
use waypost_routing::osm::map_data::MapData;
use waypost_routing::transport_mode::TransportMode;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Raw map records (JSON array of `{type, data}` records)
    #[arg(long)]
    map: PathBuf,

    #[arg(short, long, default_value_t = TransportMode::Foot)]
    transport: TransportMode,

    /// Where to write the graph
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let data = MapData::from_json_file(&args.map)
        .with_context(|| format!("Cannot load map data {}", args.map.display()))?;

    let graph = GraphBuilder::new(args.transport).build(&data);
    graph
        .save_to_file(&args.output)
        .with_context(|| format!("Cannot write graph {}", args.output.display()))?;

    info!(
        "Built {} graph with {} nodes and {} edges into {}",
        args.transport,
        graph.node_count(),
        graph.edge_count(),
        args.output.display()
    );
    Ok(())
}
