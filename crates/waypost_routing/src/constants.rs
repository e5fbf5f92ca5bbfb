/// Hard upper bound on loop iterations for a single route search.
pub const MAX_SEARCH_ITERATIONS: usize = 1_000_000;

/// Edge cost sentinel meaning "do not traverse".
pub const IMPASSABLE: f64 = 0.0;

pub const DEFAULT_TILE_ZOOM: u8 = 15;

/// Deepest slippy-map zoom level tiles are addressed at.
pub const MAX_TILE_ZOOM: u8 = 22;
