use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::GraphFileError;
use crate::graph_store::GraphStore;
use crate::stopwatch::Stopwatch;
use crate::types::NodeId;

impl GraphStore {
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), GraphFileError> {
        let stopwatch = Stopwatch::new("storage/save_graph");
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        let bytes =
            bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        writer.flush()?;

        info!(
            "Saved graph with {} nodes and {} edges to {}, size {}",
            self.node_count(),
            self.edge_count(),
            path.as_ref().display(),
            bytes
        );
        stopwatch.report();
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<GraphStore, GraphFileError> {
        debug!("Reading graph from path {}", path.as_ref().display());
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);

        let graph: GraphStore =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;

        info!(
            "Read graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

#[derive(Serialize)]
struct EdgeRow {
    from: NodeId,
    to: NodeId,
    from_lat: f64,
    from_lon: f64,
    to_lat: f64,
    to_lon: f64,
}

/// Writes one `from,to,from_lat,from_lon,to_lat,to_lon` row per directed edge,
/// with a header row. Returns the number of edges written.
pub fn export_edges_csv<W: Write>(
    graph: &GraphStore,
    writer: W,
) -> Result<usize, GraphFileError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;

    for (from, edge) in graph.edges() {
        // every edge target is a stored node
        let Some(to) = graph.node(edge.to) else {
            continue;
        };

        csv_writer.serialize(EdgeRow {
            from: from.id,
            to: to.id,
            from_lat: from.lat,
            from_lon: from.lon,
            to_lat: to.lat,
            to_lon: to.lon,
        })?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_graph_utils::test_graph::{A, D, detour_graph, grid_graph};

    #[test]
    fn graph_survives_a_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.bin");
        let graph = grid_graph(4);

        graph.save_to_file(&path).unwrap();
        let restored = GraphStore::from_file(&path).unwrap();

        assert_eq!(restored.nodes(), graph.nodes());
        assert_eq!(restored.edge_count(), graph.edge_count());
        assert_eq!(restored.node_edges(5), graph.node_edges(5));
    }

    #[test]
    fn missing_graph_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = GraphStore::from_file(dir.path().join("missing.bin"));

        assert!(matches!(result, Err(GraphFileError::Io(_))));
    }

    #[test]
    fn garbage_graph_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.bin");
        std::fs::write(&path, [0xff_u8; 3]).unwrap();

        assert!(GraphStore::from_file(&path).is_err());
    }

    #[test]
    fn exports_one_row_per_directed_edge() {
        let graph = detour_graph();
        let mut output = Vec::new();

        let written = export_edges_csv(&graph, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(written, 4);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "from,to,from_lat,from_lon,to_lat,to_lon");
        assert_eq!(lines[1], format!("{},{},0.0,0.0,0.0,3.0", A, D));
    }
}
