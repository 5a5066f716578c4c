//! Splitting traces at temporal gaps

use serde::{Deserialize, Serialize};

use crate::core::Trace;
use crate::validation::error::{require_non_negative, TrajectoryResult};

/// Gap threshold for [`segment_by_time`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Consecutive events further apart than this start a new segment (seconds)
    pub max_gap_seconds: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_gap_seconds: 1800.0,
        }
    }
}

/// Split a trace into maximal runs without a gap above `max_gap_seconds`.
///
/// Every event ends up in exactly one segment, in the original order. Inside
/// a segment consecutive events are at most `max_gap_seconds` apart; across a
/// segment boundary they are strictly further apart. An empty trace yields no
/// segment.
pub fn segment_by_time(trace: &Trace, max_gap_seconds: f64) -> TrajectoryResult<Vec<Trace>> {
    require_non_negative("max_gap_seconds", max_gap_seconds)?;
    trace.check_time_order()?;

    let mut segments = Vec::new();
    let mut current = Trace::new();

    for event in trace {
        if let Some(last) = current.last() {
            if event.time_difference(last) > max_gap_seconds {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(*event);
    }

    if !current.is_empty() {
        segments.push(current);
    }

    log::debug!(
        "Split {} events into {} segments (max gap {} s)",
        trace.len(),
        segments.len(),
        max_gap_seconds
    );

    Ok(segments)
}
