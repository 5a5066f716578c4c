//! Core trajectory algorithms

pub mod geometric_median;
pub mod rdp;
pub mod stay_points;

pub use geometric_median::{exact_medoid, weiszfeld, WeiszfeldOptions, WeiszfeldSolution};
pub use rdp::{compress, perpendicular_distance, simplify_indices, CompressionConfig};
pub use stay_points::{detect_stay_points, DistanceMetric, StayPointConfig};
