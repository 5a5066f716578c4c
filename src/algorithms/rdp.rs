//! Ramer-Douglas-Peucker trace compression
//!
//! Reference: Douglas, D. H., & Peucker, T. K. (1973). Algorithms for the
//! reduction of the number of points required to represent a digitized line
//! or its caricature. Cartographica, 10(2), 112-122.

use serde::{Deserialize, Serialize};

use crate::core::{Position, Trace};
use crate::validation::error::{require_non_negative, TrajectoryResult};

/// Tolerance for [`compress`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Largest allowed deviation in planar degrees (0.0001 is about 11 m)
    pub epsilon: f64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self { epsilon: 0.0001 }
    }
}

/// Shortest planar distance from `point` to the segment `start`-`end`
pub fn perpendicular_distance(point: &Position, start: &Position, end: &Position) -> f64 {
    let segment_length = start.euclidean_distance(end);
    if segment_length == 0.0 {
        return point.euclidean_distance(start);
    }

    let to_point = point.to_vector() - start.to_vector();
    let segment = end.to_vector() - start.to_vector();

    let r = to_point.dot(&segment) / (segment_length * segment_length);
    if (0.0..=1.0).contains(&r) {
        let cross = to_point.x * segment.y - to_point.y * segment.x;
        return cross.abs() / segment_length;
    }

    point
        .euclidean_distance(start)
        .min(point.euclidean_distance(end))
}

/// Indices of the points kept by the simplification, in increasing order.
///
/// Index ranges waiting to be examined sit on an explicit stack, so long
/// straight runs do not deepen the call stack.
pub fn simplify_indices(points: &[Position], epsilon: f64) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut pending = vec![(0usize, n - 1)];
    while let Some((first, last)) = pending.pop() {
        let mut dmax = 0.0;
        let mut split = first;

        for i in first + 1..last {
            let d = perpendicular_distance(&points[i], &points[first], &points[last]);
            if d > dmax {
                dmax = d;
                split = i;
            }
        }

        if dmax > epsilon {
            keep[split] = true;
            pending.push((split, last));
            pending.push((first, split));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &kept)| kept.then_some(i))
        .collect()
}

/// Simplify a trace, keeping both endpoints and original timestamps
pub fn compress(trace: &Trace, epsilon: f64) -> TrajectoryResult<Trace> {
    require_non_negative("epsilon", epsilon)?;

    let positions = trace.positions();
    let compressed: Trace = simplify_indices(&positions, epsilon)
        .into_iter()
        .map(|i| trace[i])
        .collect();

    log::debug!(
        "Compressed {} events to {} (epsilon {})",
        trace.len(),
        compressed.len(),
        epsilon
    );

    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    fn time(sec: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(sec)
    }

    fn trace_from(coords: &[(f64, f64)]) -> Trace {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| Event::new(time(i as i64), lat, lon))
            .collect()
    }

    fn zigzag() -> Trace {
        trace_from(&[
            (0.0, 0.0),
            (0.1, 1.0),
            (-0.1, 2.0),
            (5.0, 3.0),
            (6.2, 4.0),
            (7.0, 5.0),
            (7.05, 6.0),
            (2.0, 7.0),
            (0.0, 8.0),
        ])
    }

    #[test]
    fn test_perpendicular_distance_interior_projection() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 10.0);

        assert_relative_eq!(perpendicular_distance(&Position::new(3.0, 5.0), &a, &b), 3.0);
        assert_relative_eq!(perpendicular_distance(&Position::new(-2.0, 1.0), &a, &b), 2.0);
    }

    #[test]
    fn test_perpendicular_distance_beyond_endpoints() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 10.0);

        assert_relative_eq!(perpendicular_distance(&Position::new(3.0, -4.0), &a, &b), 5.0);
        assert_relative_eq!(perpendicular_distance(&Position::new(0.0, 12.0), &a, &b), 2.0);
    }

    #[test]
    fn test_perpendicular_distance_zero_length_segment() {
        let a = Position::new(1.0, 1.0);
        assert_relative_eq!(perpendicular_distance(&Position::new(4.0, 5.0), &a, &a), 5.0);
    }

    #[test]
    fn test_straight_line_collapses_to_endpoints() {
        let trace = trace_from(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        let compressed = compress(&trace, 0.0001).unwrap();

        assert_eq!(compressed.len(), 2);
        assert_eq!(compressed[0], trace[0]);
        assert_eq!(compressed[1], trace[4]);
    }

    #[test]
    fn test_keeps_significant_corners() {
        let trace = zigzag();
        let compressed = compress(&trace, 0.5).unwrap();
        let kept: Vec<f64> = compressed.iter().map(|e| e.longitude()).collect();

        assert_eq!(kept, vec![0.0, 2.0, 3.0, 5.0, 6.0, 8.0]);
    }

    #[test]
    fn test_timestamps_preserved_in_order() {
        let trace = zigzag();
        let compressed = compress(&trace, 0.05).unwrap();

        for event in &compressed {
            assert!(trace.iter().any(|e| e == event));
        }
        assert!(compressed.check_time_order().is_ok());
    }

    #[test]
    fn test_endpoints_always_retained() {
        let trace = zigzag();
        for epsilon in [0.0, 0.01, 0.5, 1.0, 100.0] {
            let compressed = compress(&trace, epsilon).unwrap();
            assert_eq!(compressed.first(), trace.first());
            assert_eq!(compressed.last(), trace.last());
        }
    }

    #[test]
    fn test_monotone_in_epsilon() {
        let trace = zigzag();
        let mut previous = usize::MAX;
        for epsilon in [0.0, 0.01, 0.05, 0.1, 0.5, 1.0, 3.0, 10.0] {
            let count = compress(&trace, epsilon).unwrap().len();
            assert!(count <= previous, "epsilon {} kept {} > {}", epsilon, count, previous);
            previous = count;
        }
        assert_eq!(previous, 2);
    }

    #[test]
    fn test_zero_epsilon_keeps_every_bend() {
        let trace = zigzag();
        assert_eq!(compress(&trace, 0.0).unwrap().len(), trace.len());
    }

    #[test]
    fn test_short_traces() {
        assert!(compress(&Trace::new(), 1.0).unwrap().is_empty());
        assert_eq!(compress(&trace_from(&[(1.0, 1.0)]), 1.0).unwrap().len(), 1);
        assert_eq!(compress(&trace_from(&[(1.0, 1.0), (1.0, 1.0)]), 1.0).unwrap().len(), 2);
    }

    #[test]
    fn test_long_straight_run() {
        let coords: Vec<(f64, f64)> = (0..50_000).map(|i| (0.0, i as f64 * 1e-4)).collect();
        let compressed = compress(&trace_from(&coords), 1e-6).unwrap();
        assert_eq!(compressed.len(), 2);
    }

    #[test]
    fn test_rejects_negative_epsilon() {
        assert!(compress(&zigzag(), -0.1).unwrap_err().is_configuration_error());
    }
}
