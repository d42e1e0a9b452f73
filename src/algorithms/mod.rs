pub mod dijkstra;
pub mod distance_vector;
