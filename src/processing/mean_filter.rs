//! Moving-average smoothing

use nalgebra::Vector2;

use super::window::{NeighborhoodCursor, WindowConfig};
use crate::core::{Event, Position, Trace};
use crate::validation::error::TrajectoryResult;

/// Replace every position by the average of its neighborhood.
///
/// Runs in O(n): the neighborhood sum is updated with the events entering and
/// leaving the window rather than recomputed. Timestamps are kept.
pub fn mean_filter(trace: &Trace, window: &WindowConfig) -> TrajectoryResult<Trace> {
    let kernel = window.kernel()?;
    let cursor = NeighborhoodCursor::new(trace, kernel)?;

    let mut filtered = Trace::with_capacity(trace.len());
    let mut sum = Vector2::zeros();
    let mut count = 0usize;
    let mut previous: Option<Position> = None;

    for step in cursor {
        for j in step.entering.clone() {
            sum += trace[j].position.to_vector();
            count += 1;
        }
        for j in step.leaving.clone() {
            sum -= trace[j].position.to_vector();
            count -= 1;
        }

        let current = &trace[step.index];
        let estimate = if count > 0 {
            Position::from_vector(&(sum / count as f64))
        } else {
            log::warn!("Empty neighborhood at event {}, carrying previous estimate", step.index);
            previous.unwrap_or(current.position)
        };

        filtered.push(Event::at(current.timestamp, estimate));
        previous = Some(estimate);
    }

    log::debug!(
        "Mean filter ({} {} window of {}) smoothed {} events",
        window.shape,
        window.mode,
        window.size,
        filtered.len()
    );

    Ok(filtered)
}
