//! Core data types for trace analysis

use chrono::NaiveDateTime;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use super::constants::EARTH_RADIUS_M;

/// Point on the earth surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Distance with latitude/longitude treated as planar coordinates.
    ///
    /// Only meaningful for small extents, where 0.00001 is roughly one meter.
    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let d_lat = other.latitude - self.latitude;
        let d_lon = other.longitude - self.longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }

    /// Great-circle distance in meters (spherical law of cosines)
    pub fn geodesic_distance(&self, other: &Position) -> f64 {
        if self.latitude == other.latitude && self.longitude == other.longitude {
            return 0.0;
        }

        let degrees_to_radians = PI / 180.0;
        let phi1 = (90.0 - self.latitude) * degrees_to_radians;
        let phi2 = (90.0 - other.latitude) * degrees_to_radians;
        let theta1 = self.longitude * degrees_to_radians;
        let theta2 = other.longitude * degrees_to_radians;

        let cos = phi1.sin() * phi2.sin() * (theta1 - theta2).cos() + phi1.cos() * phi2.cos();

        // Rounding can push the cosine slightly outside acos' domain
        EARTH_RADIUS_M * cos.clamp(-1.0, 1.0).acos()
    }

    /// Initial bearing towards `other`, in degrees within [0, 360)
    pub fn bearing(&self, other: &Position) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let delta_lambda = (other.longitude - self.longitude).to_radians();

        let y = delta_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

        let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
        if bearing >= 360.0 {
            0.0
        } else {
            bearing
        }
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.latitude, self.longitude)
    }

    pub fn from_vector(vector: &Vector2<f64>) -> Self {
        Self {
            latitude: vector.x,
            longitude: vector.y,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Anything that sits at a position on the map.
///
/// Events and stay points embed a [`Position`]; implementing this trait gives
/// them the distance and bearing operations without duplicating the math.
pub trait Located {
    fn position(&self) -> Position;

    fn euclidean_distance<L: Located + ?Sized>(&self, other: &L) -> f64 {
        self.position().euclidean_distance(&other.position())
    }

    fn geodesic_distance<L: Located + ?Sized>(&self, other: &L) -> f64 {
        self.position().geodesic_distance(&other.position())
    }

    fn bearing<L: Located + ?Sized>(&self, other: &L) -> f64 {
        self.position().bearing(&other.position())
    }
}

impl Located for Position {
    fn position(&self) -> Position {
        *self
    }
}

/// Position sample tagged with the time it was recorded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub position: Position,
}

impl Event {
    pub fn new(timestamp: NaiveDateTime, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            position: Position::new(latitude, longitude),
        }
    }

    pub fn at(timestamp: NaiveDateTime, position: Position) -> Self {
        Self { timestamp, position }
    }

    pub fn latitude(&self) -> f64 {
        self.position.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.position.longitude
    }

    /// Signed `self - other` in seconds; positive when `self` is later
    pub fn time_difference(&self, other: &Event) -> f64 {
        seconds_between(&other.timestamp, &self.timestamp)
    }
}

impl Located for Event {
    fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.timestamp, self.position)
    }
}

/// Location where the moving object dwelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayPoint {
    /// Centroid of the samples forming the dwell
    pub position: Position,
    pub arrival_time: NaiveDateTime,
    pub departure_time: NaiveDateTime,
    pub label: String,
}

impl StayPoint {
    pub fn new(
        position: Position,
        arrival_time: NaiveDateTime,
        departure_time: NaiveDateTime,
        label: impl Into<String>,
    ) -> Self {
        Self {
            position,
            arrival_time,
            departure_time,
            label: label.into(),
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        seconds_between(&self.arrival_time, &self.departure_time)
    }
}

impl Located for StayPoint {
    fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for StayPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} -> {}, {}, {})",
            self.position, self.arrival_time, self.departure_time, self.label
        )
    }
}

/// Seconds elapsed from `start` to `end`, keeping sub-second precision
pub fn seconds_between(start: &NaiveDateTime, end: &NaiveDateTime) -> f64 {
    let delta = end.signed_duration_since(*start);
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn time(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 1, 1)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_euclidean_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);

        assert_relative_eq!(a.euclidean_distance(&b), 5.0);
        assert_relative_eq!(b.euclidean_distance(&a), 5.0);
        assert_eq!(a.euclidean_distance(&a), 0.0);
    }

    #[test]
    fn test_geodesic_distance_symmetric() {
        let lyon = Position::new(45.764, 4.8357);
        let paris = Position::new(48.8566, 2.3522);

        let d1 = lyon.geodesic_distance(&paris);
        let d2 = paris.geodesic_distance(&lyon);

        assert!(d1 > 0.0);
        assert_relative_eq!(d1, d2, epsilon = 1e-6);
        // Roughly 392 km between the two city centres
        assert!((d1 - 392_000.0).abs() < 5_000.0);
    }

    #[test]
    fn test_geodesic_distance_zero_only_for_equal_points() {
        let a = Position::new(45.0, 4.0);
        assert_eq!(a.geodesic_distance(&a), 0.0);

        // Same latitude, different longitude must not short-circuit
        let b = Position::new(45.0, 4.001);
        assert!(a.geodesic_distance(&b) > 0.0);

        let c = Position::new(45.001, 4.0);
        assert!(a.geodesic_distance(&c) > 0.0);
    }

    #[test]
    fn test_geodesic_one_degree_of_latitude() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(1.0, 0.0);
        let expected = EARTH_RADIUS_M * PI / 180.0;

        assert_relative_eq!(a.geodesic_distance(&b), expected, epsilon = 1e-3);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Position::new(0.0, 0.0);

        assert_relative_eq!(origin.bearing(&Position::new(1.0, 0.0)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(origin.bearing(&Position::new(0.0, 1.0)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(origin.bearing(&Position::new(-1.0, 0.0)), 180.0, epsilon = 1e-9);
        assert_relative_eq!(origin.bearing(&Position::new(0.0, -1.0)), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing_range() {
        let a = Position::new(45.764, 4.8357);
        let points = [
            Position::new(48.8566, 2.3522),
            Position::new(43.2965, 5.3698),
            Position::new(45.764, 4.8357),
            Position::new(-33.86, 151.2),
        ];

        for p in &points {
            let bearing = a.bearing(p);
            assert!((0.0..360.0).contains(&bearing), "bearing {} out of range", bearing);
        }
    }

    #[test]
    fn test_time_difference_is_antisymmetric() {
        let e1 = Event::new(time(10, 0, 0), 10.0, 1.0);
        let e2 = Event::new(time(10, 0, 42), 11.0, 1.0);

        assert_relative_eq!(e2.time_difference(&e1), 42.0);
        assert_relative_eq!(e1.time_difference(&e2), -42.0);
        assert_eq!(e1.time_difference(&e1), 0.0);
    }

    #[test]
    fn test_time_difference_sub_second() {
        let start = time(10, 0, 0);
        let later = start + chrono::Duration::milliseconds(1500);
        let e1 = Event::new(start, 0.0, 0.0);
        let e2 = Event::new(later, 0.0, 0.0);

        assert_relative_eq!(e2.time_difference(&e1), 1.5);
    }

    #[test]
    fn test_located_shared_across_types() {
        let event = Event::new(time(10, 0, 0), 3.0, 4.0);
        let stay = StayPoint::new(Position::new(0.0, 0.0), time(9, 0, 0), time(9, 45, 0), "home");

        assert_relative_eq!(event.euclidean_distance(&stay), 5.0);
        assert_relative_eq!(stay.euclidean_distance(&event), 5.0);
        assert_relative_eq!(stay.duration_seconds(), 2700.0);
        assert_eq!(stay.label, "home");
    }

    #[test]
    fn test_vector_conversion() {
        let p = Position::new(45.5, 4.25);
        let v = p.to_vector();

        assert_eq!(v.x, 45.5);
        assert_eq!(v.y, 4.25);
        assert_eq!(Position::from_vector(&v), p);
    }
}
