pub mod access_parser;
pub mod routing_weights;
pub mod way_tags;
