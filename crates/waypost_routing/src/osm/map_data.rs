use std::path::Path;

use fxhash::{FxBuildHasher, FxHashMap};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::RecordError;
use crate::graph_store::Node;
use crate::types::{NodeId, WayId};

#[derive(Debug, Clone, Default)]
pub struct OsmWay {
    pub id: WayId,
    pub nodes: Vec<NodeId>,
    pub tags: FxHashMap<String, String>,
}

impl OsmWay {
    pub fn get_tag(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(|tag| tag.as_str())
    }
}

#[derive(Deserialize)]
struct RecordEnvelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    data: Option<Value>,
}

#[derive(Deserialize)]
struct RawNode {
    id: NodeId,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawWay {
    id: WayId,
    #[serde(default)]
    nd: Vec<NodeId>,
    #[serde(default)]
    tag: FxHashMap<String, String>,
}

/// Node and way records decoded from a raw map data document.
///
/// The document is a JSON array of `{"type": "node" | "way", "data": {...}}`
/// records. Records without a `type` or `data`, or whose data cannot be
/// decoded, are skipped and counted in [`MapData::malformed`].
///
/// Ways keep the position where their id first appeared; a repeated id
/// replaces the stored way.
#[derive(Debug, Default)]
pub struct MapData {
    nodes: FxHashMap<NodeId, Node>,
    ways: IndexMap<WayId, OsmWay, FxBuildHasher>,
    malformed: usize,
}

impl MapData {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<MapData, RecordError> {
        let path = path.as_ref();
        debug!("Reading map data from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<MapData, RecordError> {
        let records: Vec<Value> = serde_json::from_str(text)?;
        let mut data = MapData::default();

        for record in records {
            data.add_record(record);
        }

        info!(
            "Decoded {} nodes and {} ways ({} malformed records skipped)",
            data.nodes.len(),
            data.ways.len(),
            data.malformed
        );

        Ok(data)
    }

    fn add_record(&mut self, record: Value) {
        let Ok(RecordEnvelope {
            kind: Some(kind),
            data: Some(data),
        }) = serde_json::from_value::<RecordEnvelope>(record)
        else {
            // missing `type` or `data`
            self.malformed += 1;
            return;
        };

        match kind.as_str() {
            "node" => match serde_json::from_value::<RawNode>(data) {
                Ok(node) => self.add_node(Node::new(node.id, node.lat, node.lon)),
                Err(error) => self.skip(&kind, error),
            },
            "way" => match serde_json::from_value::<RawWay>(data) {
                Ok(way) => self.add_way(OsmWay {
                    id: way.id,
                    nodes: way.nd,
                    tags: way.tag,
                }),
                Err(error) => self.skip(&kind, error),
            },
            _ => {}
        }
    }

    fn skip(&mut self, kind: &str, error: serde_json::Error) {
        debug!("Skipping malformed {} record: {}", kind, error);
        self.malformed += 1;
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    pub fn add_way(&mut self, way: OsmWay) {
        if let Some(previous) = self.ways.insert(way.id, way) {
            debug!("Way {} appears more than once, keeping the last", previous.id);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Ways in the order their ids first appeared.
    pub fn ways(&self) -> impl Iterator<Item = &OsmWay> {
        self.ways.values()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn malformed(&self) -> usize {
        self.malformed
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty()
    }

    /// Resolves the node references of `way`, silently dropping references
    /// to nodes that are not part of this data set.
    pub fn way_nodes(&self, way: &OsmWay) -> Vec<Node> {
        way.nodes
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .copied()
            .collect()
    }
}
