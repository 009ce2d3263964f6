pub mod collision_detection;
pub mod shapes;
