//! Geometric median estimators
//!
//! The geometric median of a point set minimizes the sum of Euclidean
//! distances to all points. Two estimators are provided:
//!
//! - [`exact_medoid`]: the best point *among the inputs* (O(k²))
//! - [`weiszfeld`]: the continuous minimizer, by fixed-point iteration
//!
//! The Weiszfeld step carries the Vardi-Zhang correction so the iteration
//! stays defined when the estimate lands exactly on an input point.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Distances below this are treated as coincident points
const COINCIDENCE_TOLERANCE: f64 = 1e-12;

/// Stopping rules for the Weiszfeld iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeiszfeldOptions {
    /// Stop once successive estimates are closer than this
    pub epsilon: f64,
    /// Hard cap on the number of steps
    pub max_iterations: usize,
}

impl Default for WeiszfeldOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            max_iterations: 1000,
        }
    }
}

/// Outcome of a Weiszfeld run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeiszfeldSolution {
    pub median: Vector2<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Arithmetic mean, `None` for an empty set
pub fn centroid(points: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vector2::zeros(), |acc, p| acc + p);
    Some(sum / points.len() as f64)
}

/// Input point with the smallest total distance to the others.
///
/// Ties go to the earliest point.
pub fn exact_medoid(points: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    let mut best: Option<(usize, f64)> = None;

    for (i, candidate) in points.iter().enumerate() {
        let total: f64 = points.iter().map(|p| (p - candidate).norm()).sum();
        match best {
            Some((_, best_total)) if total >= best_total => {}
            _ => best = Some((i, total)),
        }
    }

    best.map(|(i, _)| points[i])
}

/// One corrected Weiszfeld update from `current`.
///
/// With `T` the distance-weighted average of the points not at `current`,
/// the plain update is `T`. When `η` points coincide with `current`, the
/// update blends back towards `current` by `γ = min(1, η / ‖R‖)` where
/// `R = Σ wᵢ (pᵢ - current)`. Returns `current` when every point coincides.
pub fn weiszfeld_step(points: &[Vector2<f64>], current: &Vector2<f64>) -> Vector2<f64> {
    let mut weighted_sum = Vector2::zeros();
    let mut weight_sum = 0.0;
    let mut coincident = 0usize;

    for p in points {
        let distance = (p - current).norm();
        if distance <= COINCIDENCE_TOLERANCE {
            coincident += 1;
            continue;
        }
        let weight = 1.0 / distance;
        weighted_sum += p * weight;
        weight_sum += weight;
    }

    if weight_sum == 0.0 {
        return *current;
    }

    let target = weighted_sum / weight_sum;
    if coincident == 0 {
        return target;
    }

    // R = Σ wᵢ (pᵢ - y) = Σ wᵢ pᵢ - y Σ wᵢ
    let r = (weighted_sum - current * weight_sum).norm();
    let gamma = if r == 0.0 {
        1.0
    } else {
        (coincident as f64 / r).min(1.0)
    };

    target * (1.0 - gamma) + current * gamma
}

/// Continuous geometric median, starting from the centroid.
///
/// Returns `None` for an empty set. When the iteration cap is reached the
/// last estimate is returned with `converged == false`.
pub fn weiszfeld(points: &[Vector2<f64>], options: &WeiszfeldOptions) -> Option<WeiszfeldSolution> {
    let mut current = centroid(points)?;

    for iteration in 1..=options.max_iterations {
        let next = weiszfeld_step(points, &current);
        let shift = (next - current).norm();
        current = next;

        if shift < options.epsilon {
            return Some(WeiszfeldSolution {
                median: current,
                iterations: iteration,
                converged: true,
            });
        }
    }

    log::debug!(
        "Weiszfeld stopped after {} iterations without converging ({} points)",
        options.max_iterations,
        points.len()
    );

    Some(WeiszfeldSolution {
        median: current,
        iterations: options.max_iterations,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v(x: f64, y: f64) -> Vector2<f64> {
        Vector2::new(x, y)
    }

    fn total_distance(points: &[Vector2<f64>], y: &Vector2<f64>) -> f64 {
        points.iter().map(|p| (p - y).norm()).sum()
    }

    #[test]
    fn test_centroid() {
        assert!(centroid(&[]).is_none());

        let c = centroid(&[v(0.0, 0.0), v(2.0, 0.0), v(1.0, 3.0)]).unwrap();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
    }

    #[test]
    fn test_unit_square_corners() {
        let square = [v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)];
        let options = WeiszfeldOptions::default();

        let solution = weiszfeld(&square, &options).unwrap();
        assert!(solution.converged);
        assert_relative_eq!(solution.median.x, 0.5, epsilon = options.epsilon);
        assert_relative_eq!(solution.median.y, 0.5, epsilon = options.epsilon);
    }

    #[test]
    fn test_equilateral_triangle() {
        let h = 3.0_f64.sqrt() / 2.0;
        let triangle = [v(0.0, 0.0), v(1.0, 0.0), v(0.5, h)];
        let options = WeiszfeldOptions::default();

        let solution = weiszfeld(&triangle, &options).unwrap();
        assert_relative_eq!(solution.median.x, 0.5, epsilon = options.epsilon);
        assert_relative_eq!(solution.median.y, h / 3.0, epsilon = options.epsilon);
    }

    #[test]
    fn test_median_resists_outlier() {
        let points = [v(0.0, 0.0), v(0.1, 0.0), v(0.0, 0.1), v(0.1, 0.1), v(100.0, 100.0)];
        let options = WeiszfeldOptions::default();

        let median = weiszfeld(&points, &options).unwrap().median;
        let mean = centroid(&points).unwrap();

        assert!(median.x < 1.0 && median.y < 1.0);
        assert!(total_distance(&points, &median) < total_distance(&points, &mean));
    }

    #[test]
    fn test_step_on_data_point_stays_finite() {
        // Centroid of these points coincides with the middle point
        let points = [v(-1.0, 0.0), v(0.0, 0.0), v(1.0, 0.0)];
        let next = weiszfeld_step(&points, &v(0.0, 0.0));

        assert!(next.x.is_finite() && next.y.is_finite());
        // The middle point is optimal, the forces of the other two cancel out
        assert_relative_eq!(next.x, 0.0);
        assert_relative_eq!(next.y, 0.0);
    }

    #[test]
    fn test_step_with_dominant_cluster_does_not_move() {
        // Three points stacked on the estimate outweigh the pull of one far point
        let points = [v(0.0, 0.0), v(0.0, 0.0), v(0.0, 0.0), v(10.0, 0.0)];
        let next = weiszfeld_step(&points, &v(0.0, 0.0));

        assert_relative_eq!(next.x, 0.0);
        assert_relative_eq!(next.y, 0.0);
    }

    #[test]
    fn test_step_all_points_coincident() {
        let points = [v(2.0, 3.0), v(2.0, 3.0)];
        let next = weiszfeld_step(&points, &v(2.0, 3.0));

        assert_eq!(next, v(2.0, 3.0));

        let solution = weiszfeld(&points, &WeiszfeldOptions::default()).unwrap();
        assert!(solution.converged);
        assert_eq!(solution.median, v(2.0, 3.0));
    }

    #[test]
    fn test_single_point_and_empty() {
        assert!(weiszfeld(&[], &WeiszfeldOptions::default()).is_none());

        let solution = weiszfeld(&[v(4.0, -1.0)], &WeiszfeldOptions::default()).unwrap();
        assert_eq!(solution.median, v(4.0, -1.0));
    }

    #[test]
    fn test_iteration_cap() {
        let points = [v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0), v(5.0, 7.0)];
        let options = WeiszfeldOptions {
            epsilon: 0.0,
            max_iterations: 3,
        };

        let solution = weiszfeld(&points, &options).unwrap();
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 3);
    }

    #[test]
    fn test_exact_medoid_picks_observed_point() {
        let points = [v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0), v(50.0, 0.0)];
        let medoid = exact_medoid(&points).unwrap();

        assert!(points.contains(&medoid));
        // Both middle points tie at 51.0; the earlier one wins
        assert_eq!(medoid, v(1.0, 0.0));
        assert!(exact_medoid(&[]).is_none());
    }

    #[test]
    fn test_weiszfeld_not_worse_than_medoid() {
        let points = [v(0.0, 0.0), v(3.0, 0.0), v(0.0, 4.0), v(2.0, 2.0), v(-1.0, 1.0)];

        let medoid = exact_medoid(&points).unwrap();
        let median = weiszfeld(&points, &WeiszfeldOptions::default()).unwrap().median;

        assert!(total_distance(&points, &median) <= total_distance(&points, &medoid) + 1e-6);
    }
}
