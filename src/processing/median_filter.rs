//! Geometric-median smoothing

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use super::window::{NeighborhoodCursor, WindowConfig};
use crate::algorithms::geometric_median::{exact_medoid, weiszfeld, WeiszfeldOptions};
use crate::core::{Event, Position, Trace};
use crate::validation::error::{TrajectoryError, TrajectoryResult};

/// How the median of a neighborhood is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedianAlgorithm {
    /// Neighborhood member with the smallest total distance to the others
    Exact,
    /// Weiszfeld iteration towards the continuous geometric median
    Iterative,
}

impl FromStr for MedianAlgorithm {
    type Err = TrajectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MedianAlgorithm::Exact),
            "iterative" | "weiszfeld" => Ok(MedianAlgorithm::Iterative),
            _ => Err(TrajectoryError::invalid_configuration(
                "algorithm",
                s,
                "expected 'exact' or 'iterative'",
            )),
        }
    }
}

impl fmt::Display for MedianAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MedianAlgorithm::Exact => write!(f, "exact"),
            MedianAlgorithm::Iterative => write!(f, "iterative"),
        }
    }
}

/// Replace every position by the geometric median of its neighborhood.
///
/// Window membership is maintained incrementally in a double-ended buffer;
/// the median itself is recomputed from the buffer for every event.
pub fn median_filter(
    trace: &Trace,
    window: &WindowConfig,
    algorithm: MedianAlgorithm,
    options: &WeiszfeldOptions,
) -> TrajectoryResult<Trace> {
    validate_options(options)?;
    let kernel = window.kernel()?;
    let cursor = NeighborhoodCursor::new(trace, kernel)?;

    let mut filtered = Trace::with_capacity(trace.len());
    let mut neighbors: VecDeque<Vector2<f64>> = VecDeque::new();
    let mut previous: Option<Position> = None;
    let mut unconverged = 0usize;

    for step in cursor {
        for j in step.entering.clone() {
            neighbors.push_back(trace[j].position.to_vector());
        }
        for _ in step.leaving.clone() {
            neighbors.pop_front();
        }

        let points = neighbors.make_contiguous();
        let median = match algorithm {
            MedianAlgorithm::Exact => exact_medoid(points),
            MedianAlgorithm::Iterative => weiszfeld(points, options).map(|solution| {
                if !solution.converged {
                    unconverged += 1;
                }
                solution.median
            }),
        };

        let current = &trace[step.index];
        let estimate = match median {
            Some(m) => Position::from_vector(&m),
            None => {
                log::warn!("Empty neighborhood at event {}, carrying previous estimate", step.index);
                previous.unwrap_or(current.position)
            }
        };

        filtered.push(Event::at(current.timestamp, estimate));
        previous = Some(estimate);
    }

    if unconverged > 0 {
        log::warn!(
            "Weiszfeld hit the {}-iteration cap on {} of {} events",
            options.max_iterations,
            unconverged,
            trace.len()
        );
    }
    log::debug!(
        "Median filter ({}, {} {} window of {}) smoothed {} events",
        algorithm,
        window.shape,
        window.mode,
        window.size,
        filtered.len()
    );

    Ok(filtered)
}

fn validate_options(options: &WeiszfeldOptions) -> TrajectoryResult<()> {
    if !options.epsilon.is_finite() || options.epsilon <= 0.0 {
        return Err(TrajectoryError::invalid_configuration(
            "epsilon",
            options.epsilon,
            "convergence tolerance must be a positive number",
        ));
    }
    if options.max_iterations == 0 {
        return Err(TrajectoryError::invalid_configuration(
            "max_iterations",
            options.max_iterations,
            "at least one iteration is required",
        ));
    }
    Ok(())
}
