pub mod map_data;
