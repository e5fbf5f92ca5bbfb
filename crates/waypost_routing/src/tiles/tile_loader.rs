use std::path::PathBuf;

use fxhash::FxHashSet;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::constants::MAX_TILE_ZOOM;
use crate::error::TileError;
use crate::graph_builder::GraphBuilder;
use crate::graph_store::GraphStore;
use crate::osm::map_data::MapData;
use crate::tiles::tile::Tile;

/// Source of map data for one tile. Implementations may block on I/O.
pub trait TileProvider {
    fn fetch(&self, tile: Tile) -> Result<MapData, TileError>;
}

/// Reads raw record files laid out as `<root>/<zoom>/<x>/<y>.json`.
/// A missing file means the tile has no data.
pub struct DirectoryTileProvider {
    root: PathBuf,
}

impl DirectoryTileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryTileProvider { root: root.into() }
    }

    fn tile_path(&self, tile: Tile) -> PathBuf {
        self.root
            .join(tile.zoom.to_string())
            .join(tile.x.to_string())
            .join(format!("{}.json", tile.y))
    }
}

impl TileProvider for DirectoryTileProvider {
    fn fetch(&self, tile: Tile) -> Result<MapData, TileError> {
        let path = self.tile_path(tile);

        if !path.is_file() {
            debug!("No data file for tile {} at {}", tile, path.display());
            return Ok(MapData::default());
        }

        Ok(MapData::from_json_file(&path)?)
    }
}

/// Loads map data around coordinates on demand and grows a graph with it.
///
/// Each tile is requested at most once per loader, whether or not the fetch
/// succeeds.
pub struct TileLoader {
    provider: Box<dyn TileProvider + Send + Sync>,
    builder: GraphBuilder,
    zoom: u8,
    fetched: Mutex<FxHashSet<Tile>>,
}

impl TileLoader {
    pub fn new(
        provider: Box<dyn TileProvider + Send + Sync>,
        builder: GraphBuilder,
        zoom: u8,
    ) -> Self {
        if zoom > MAX_TILE_ZOOM {
            warn!("Tile zoom {} is too deep, using {}", zoom, MAX_TILE_ZOOM);
        }

        TileLoader {
            provider,
            builder,
            zoom: zoom.min(MAX_TILE_ZOOM),
            fetched: Mutex::new(FxHashSet::default()),
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn is_fetched(&self, tile: Tile) -> bool {
        self.fetched.lock().contains(&tile)
    }

    pub fn fetched_count(&self) -> usize {
        self.fetched.lock().len()
    }

    /// Makes sure the tile around `(lat, lon)` has been loaded into `graph`
    /// and returns the number of edges this call added. Already fetched tiles
    /// are free; an unavailable tile adds nothing.
    pub fn ensure_coverage(&self, graph: &mut GraphStore, lat: f64, lon: f64) -> usize {
        let tile = Tile::containing(lat, lon, self.zoom);

        if !self.fetched.lock().insert(tile) {
            return 0;
        }

        match self.provider.fetch(tile) {
            Ok(data) if data.is_empty() => 0,
            Ok(data) => {
                debug!("Loaded tile {}", tile);
                self.builder.ingest_map_data(graph, &data)
            }
            Err(error) => {
                warn!("Proceeding without tile {}: {}", tile, error);
                0
            }
        }
    }
}
