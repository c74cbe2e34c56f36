//! Spatial indexing and distance utilities.

pub mod index;
pub mod queries;

pub use queries::{distance, haversine_distance_to_segment, haversine_meters, validate_position};
