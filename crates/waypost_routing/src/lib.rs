pub mod constants;
pub mod cost_model;
pub mod error;
pub mod geometry;
pub mod graph_builder;
pub mod graph_store;
pub mod location_index;
pub mod osm;
pub mod properties;
pub mod risk_overlay;
pub mod router;
pub mod routing;
pub mod stopwatch;
pub mod storage;
pub mod tiles;
pub mod transport_mode;
pub mod types;
