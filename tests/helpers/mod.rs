pub mod fake_graph_api;
pub mod setup;
