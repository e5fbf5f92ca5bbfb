pub mod route_result;
pub mod route_search;
pub(crate) mod search_graph;
pub(crate) mod search_queue;
