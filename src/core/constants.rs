//! Physical constants and default parameters

/// Earth radius used for great-circle distances (meters)
pub const EARTH_RADIUS_M: f64 = 6378137.0;

/// Planar distance that is roughly one meter at the equator (degrees)
pub const DEGREES_PER_METER: f64 = 0.00001;
