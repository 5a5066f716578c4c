//! Stay point detection
//!
//! Reference: Li, Q., Zheng, Y., Xie, X., Chen, Y., Liu, W., & Ma, W. Y.
//! (2008). Mining user similarity based on location history. ACM SIGSPATIAL
//! GIS '08.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{Event, Located, Position, StayPoint, Trace};
use crate::validation::error::{require_non_negative, TrajectoryError, TrajectoryResult};

/// Distance used to decide whether the object left the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Planar degrees
    Euclidean,
    /// Great-circle meters
    Geodesic,
}

impl DistanceMetric {
    pub fn distance(&self, a: &Event, b: &Event) -> f64 {
        match self {
            DistanceMetric::Euclidean => a.euclidean_distance(b),
            DistanceMetric::Geodesic => a.geodesic_distance(b),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = TrajectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "geodesic" => Ok(DistanceMetric::Geodesic),
            _ => Err(TrajectoryError::invalid_configuration(
                "metric",
                s,
                "expected 'euclidean' or 'geodesic'",
            )),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Euclidean => write!(f, "euclidean"),
            DistanceMetric::Geodesic => write!(f, "geodesic"),
        }
    }
}

/// Thresholds for stay point detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StayPointConfig {
    /// Maximum roaming distance around the anchor, in `metric` units
    pub distance_threshold: f64,
    /// Minimum dwell time (seconds)
    pub time_threshold: f64,
    pub metric: DistanceMetric,
}

impl Default for StayPointConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.0001,
            time_threshold: 1800.0,
            metric: DistanceMetric::Euclidean,
        }
    }
}

impl StayPointConfig {
    pub fn new(distance_threshold: f64, time_threshold: f64) -> Self {
        Self {
            distance_threshold,
            time_threshold,
            metric: DistanceMetric::Euclidean,
        }
    }

    pub fn validate(&self) -> TrajectoryResult<()> {
        require_non_negative("distance_threshold", self.distance_threshold)?;
        require_non_negative("time_threshold", self.time_threshold)
    }
}

/// Find the places where the object stayed within `distance_threshold` of an
/// anchor sample for at least `time_threshold` seconds.
///
/// From the anchor, events are scanned until one lies further than the
/// distance threshold. If that event is at least `time_threshold` after the
/// anchor, the events before it form a stay point and the scan resumes from
/// it; otherwise the next event becomes the anchor. Events after the last
/// detected stay that never leave the threshold do not form a stay point.
///
/// The stay point is the centroid of its events, arriving at the anchor
/// timestamp and departing at the timestamp of its last event. Labels are
/// `"stay point k"` in detection order, starting at 1.
pub fn detect_stay_points(trace: &Trace, config: &StayPointConfig) -> TrajectoryResult<Vec<StayPoint>> {
    config.validate()?;
    trace.check_time_order()?;

    let mut stay_points = Vec::new();
    let n = trace.len();
    let mut i = 0;

    while i < n {
        let anchor = &trace[i];
        let mut next_anchor = i + 1;

        for j in i + 1..n {
            let candidate = &trace[j];
            if config.metric.distance(anchor, candidate) <= config.distance_threshold {
                continue;
            }

            if candidate.time_difference(anchor) >= config.time_threshold {
                let members = &trace.events()[i..j];
                let label = format!("stay point {}", stay_points.len() + 1);
                stay_points.push(StayPoint::new(
                    centroid_of(members),
                    anchor.timestamp,
                    members[members.len() - 1].timestamp,
                    label,
                ));
                next_anchor = j;
            }
            break;
        }

        i = next_anchor;
    }

    log::debug!(
        "Detected {} stay points in {} events ({} threshold {}, {} s)",
        stay_points.len(),
        n,
        config.metric,
        config.distance_threshold,
        config.time_threshold
    );

    Ok(stay_points)
}

fn centroid_of(events: &[Event]) -> Position {
    let sum = events
        .iter()
        .fold(Vector2::zeros(), |acc, e| acc + e.position.to_vector());
    Position::from_vector(&(sum / events.len() as f64))
}
