use clap::{Parser, Subcommand};

use crate::build::BuildArgs;
use crate::export_edges::ExportEdgesArgs;
use crate::route::RouteArgs;

mod build;
mod export_edges;
mod graph_source;
mod parsers;
mod route;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a routing graph from raw map records and save it
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Find a route between two coordinates
    #[command(visible_alias = "r")]
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },
    /// Write every directed edge of a graph as CSV
    ExportEdges {
        #[command(flatten)]
        args: ExportEdgesArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Build { args }) => build::run(args)?,
        Some(Commands::Route { args }) => route::run(args)?,
        Some(Commands::ExportEdges { args }) => export_edges::run(args)?,
        None => {}
    }

    Ok(())
}
