pub mod tile;
pub mod tile_loader;
