use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::info;
use waypost_routing::constants::{DEFAULT_TILE_ZOOM, MAX_TILE_ZOOM};
use waypost_routing::graph_builder::GraphBuilder;
use waypost_routing::graph_store::GraphStore;
use waypost_routing::risk_overlay::RiskOverlay;
use waypost_routing::router::Router;
use waypost_routing::tiles::tile_loader::{DirectoryTileProvider, TileLoader};
use waypost_routing::transport_mode::TransportMode;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub map_file: Option<PathBuf>,
    /// Takes precedence over `map_file`. Must have been built for `transport`.
    pub graph_file: Option<PathBuf>,
    pub transport: TransportMode,
    pub risk_file: Option<PathBuf>,
    pub tile_dir: Option<PathBuf>,
    pub tile_zoom: u8,
    pub bind: String,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<ApiConfig> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<ApiConfig> {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let transport = match value("WAYPOST_TRANSPORT") {
            Some(mode) => mode.parse().context("Invalid WAYPOST_TRANSPORT")?,
            None => TransportMode::Foot,
        };

        let tile_zoom = match value("WAYPOST_TILE_ZOOM") {
            Some(zoom) => zoom
                .trim()
                .parse()
                .with_context(|| format!("Invalid WAYPOST_TILE_ZOOM `{}`", zoom))?,
            None => DEFAULT_TILE_ZOOM,
        };

        if tile_zoom > MAX_TILE_ZOOM {
            bail!("WAYPOST_TILE_ZOOM must be at most {}", MAX_TILE_ZOOM);
        }

        let config = ApiConfig {
            map_file: value("WAYPOST_MAP_FILE").map(PathBuf::from),
            graph_file: value("WAYPOST_GRAPH_FILE").map(PathBuf::from),
            transport,
            risk_file: value("WAYPOST_RISK_FILE").map(PathBuf::from),
            tile_dir: value("WAYPOST_TILE_DIR").map(PathBuf::from),
            tile_zoom,
            bind: value("WAYPOST_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
        };

        if config.map_file.is_none() && config.graph_file.is_none() && config.tile_dir.is_none() {
            bail!("Set WAYPOST_MAP_FILE, WAYPOST_GRAPH_FILE or WAYPOST_TILE_DIR");
        }

        Ok(config)
    }

    pub fn load_router(&self) -> anyhow::Result<Router> {
        let mut router = match (&self.graph_file, &self.map_file) {
            (Some(path), _) => Router::from_graph_file(path, self.transport)
                .with_context(|| format!("Cannot load graph {}", path.display()))?,
            (None, Some(path)) => Router::from_map_file(path, self.transport)
                .with_context(|| format!("Cannot load map data {}", path.display()))?,
            (None, None) => Router::new(GraphStore::new(), self.transport),
        };

        if let Some(path) = &self.risk_file {
            let overlay = RiskOverlay::from_csv_path(path)
                .with_context(|| format!("Cannot load risk file {}", path.display()))?;
            router = router.with_risk_overlay(Arc::new(overlay));
        }

        if let Some(dir) = &self.tile_dir {
            info!("Loading tiles on demand from {} at zoom {}", dir.display(), self.tile_zoom);
            router = router.with_tile_loader(TileLoader::new(
                Box::new(DirectoryTileProvider::new(dir)),
                GraphBuilder::new(self.transport),
                self.tile_zoom,
            ));
        }

        Ok(router)
    }
}
