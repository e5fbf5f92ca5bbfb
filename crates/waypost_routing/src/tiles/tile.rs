use std::{f64::consts::PI, fmt};

use crate::constants::MAX_TILE_ZOOM;

const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// Slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl Tile {
    /// The tile containing `(lat, lon)` at `zoom`, with `zoom` capped at
    /// [`MAX_TILE_ZOOM`]. Coordinates outside the Web Mercator range are
    /// clamped to the border tiles.
    pub fn containing(lat: f64, lon: f64, zoom: u8) -> Tile {
        let zoom = zoom.min(MAX_TILE_ZOOM);
        let n = f64::from(1u32 << zoom);
        let max_index = n - 1.0;

        let x = ((lon + 180.0) / 360.0 * n).floor();

        let lat_rad = lat
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

        Tile {
            zoom,
            x: clamp_index(x, max_index),
            y: clamp_index(y, max_index),
        }
    }
}

fn clamp_index(value: f64, max_index: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, max_index) as u32
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
