use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;
use waypost_routing::storage::export_edges_csv;

use crate::graph_source::GraphSourceArgs;

#[derive(Args, Debug)]
pub struct ExportEdgesArgs {
    #[command(flatten)]
    source: GraphSourceArgs,

    /// CSV file to write
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(args: ExportEdgesArgs) -> anyhow::Result<()> {
    let graph = args.source.load_graph()?;

    let file = File::create(&args.output)
        .with_context(|| format!("Cannot create {}", args.output.display()))?;
    let written = export_edges_csv(&graph, BufWriter::new(file))?;

    info!("Exported {} edges to {}", written, args.output.display());
    Ok(())
}
