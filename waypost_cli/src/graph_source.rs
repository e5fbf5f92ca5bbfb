use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use waypost_routing::graph_store::GraphStore;
use waypost_routing::osm::map_data::MapData;
use waypost_routing::graph_builder::GraphBuilder;
use waypost_routing::transport_mode::TransportMode;

/// Where the routing graph comes from: raw records built on the fly, or a
/// graph saved by `build`.
#[derive(Args, Debug)]
pub struct GraphSourceArgs {
    /// Raw map records (JSON array of `{type, data}` records)
    #[arg(long, required_unless_present = "graph", conflicts_with = "graph")]
    pub map: Option<PathBuf>,

    /// Graph file written by `build`
    #[arg(long)]
    pub graph: Option<PathBuf>,

    #[arg(short, long, default_value_t = TransportMode::Foot)]
    pub transport: TransportMode,
}

impl GraphSourceArgs {
    pub fn load_graph(&self) -> anyhow::Result<GraphStore> {
        match (&self.graph, &self.map) {
            (Some(path), _) => GraphStore::from_file(path)
                .with_context(|| format!("Cannot load graph {}", path.display())),
            (None, Some(path)) => {
                let data = MapData::from_json_file(path)
                    .with_context(|| format!("Cannot load map data {}", path.display()))?;
                Ok(GraphBuilder::new(self.transport).build(&data))
            }
            (None, None) => anyhow::bail!("Either --map or --graph is required"),
        }
    }
}
