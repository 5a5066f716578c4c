//! Sliding neighborhoods for trace filters
//!
//! Both neighborhood modes select a contiguous range of event indices whose
//! bounds only ever move forward. [`NeighborhoodCursor`] walks those ranges and
//! reports, per event, which indices entered and which left the window, so a
//! filter can update its state incrementally in amortized O(1) per event.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::core::Trace;
use crate::validation::error::{require_non_negative, TrajectoryError, TrajectoryResult};

/// Which side of the current event the window extends to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowShape {
    /// Current and past events only
    Causal,
    /// Past and future events, split evenly
    Centered,
}

/// How the window size is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborhoodMode {
    /// Size counts neighboring events by index
    #[serde(alias = "number")]
    Count,
    /// Size is a span in seconds around the event timestamp
    Time,
}

impl FromStr for WindowShape {
    type Err = TrajectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "causal" => Ok(WindowShape::Causal),
            "centered" => Ok(WindowShape::Centered),
            _ => Err(TrajectoryError::invalid_configuration(
                "window.shape",
                s,
                "expected 'causal' or 'centered'",
            )),
        }
    }
}

impl FromStr for NeighborhoodMode {
    type Err = TrajectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "number" => Ok(NeighborhoodMode::Count),
            "time" => Ok(NeighborhoodMode::Time),
            _ => Err(TrajectoryError::invalid_configuration(
                "window.mode",
                s,
                "expected 'count' or 'time'",
            )),
        }
    }
}

impl fmt::Display for WindowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowShape::Causal => write!(f, "causal"),
            WindowShape::Centered => write!(f, "centered"),
        }
    }
}

impl fmt::Display for NeighborhoodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeighborhoodMode::Count => write!(f, "count"),
            NeighborhoodMode::Time => write!(f, "time"),
        }
    }
}

/// Neighborhood definition shared by all smoothing filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Number of events (count mode) or seconds (time mode)
    pub size: f64,
    pub shape: WindowShape,
    pub mode: NeighborhoodMode,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: 4.0,
            shape: WindowShape::Causal,
            mode: NeighborhoodMode::Count,
        }
    }
}

impl WindowConfig {
    pub fn new(size: f64, shape: WindowShape, mode: NeighborhoodMode) -> Self {
        Self { size, shape, mode }
    }

    /// Build a window from option names, e.g. `("centered", "time")`
    pub fn from_names(size: f64, shape: &str, mode: &str) -> TrajectoryResult<Self> {
        Ok(Self {
            size,
            shape: shape.parse()?,
            mode: mode.parse()?,
        })
    }

    /// Resolve the window into offsets around the current event
    pub fn kernel(&self) -> TrajectoryResult<Kernel> {
        require_non_negative("window.size", self.size)?;

        match self.mode {
            NeighborhoodMode::Count => {
                if self.size.fract() != 0.0 || self.size > usize::MAX as f64 {
                    return Err(TrajectoryError::invalid_configuration(
                        "window.size",
                        self.size,
                        "count windows need a whole number of events",
                    ));
                }
                let size = self.size as usize;
                Ok(match self.shape {
                    WindowShape::Causal => Kernel::Count { before: size, after: 0 },
                    WindowShape::Centered => Kernel::Count {
                        before: size / 2,
                        after: size / 2,
                    },
                })
            }
            NeighborhoodMode::Time => Ok(match self.shape {
                WindowShape::Causal => Kernel::Time {
                    before: self.size,
                    after: 0.0,
                },
                WindowShape::Centered => Kernel::Time {
                    before: self.size / 2.0,
                    after: self.size / 2.0,
                },
            }),
        }
    }
}

/// Window offsets relative to the current event.
///
/// Event `j` is a neighbor of event `i` when `i - before <= j <= i + after`
/// (count) or `-before <= t_j - t_i <= after` seconds (time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    Count { before: usize, after: usize },
    Time { before: f64, after: f64 },
}

/// Window movement for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStep {
    /// Index of the event being estimated
    pub index: usize,
    /// Indices that joined the neighborhood at this step
    pub entering: Range<usize>,
    /// Indices that dropped out of the neighborhood at this step
    pub leaving: Range<usize>,
}

impl WindowStep {
    /// Neighborhood after applying this step
    pub fn neighborhood(&self) -> Range<usize> {
        self.leaving.end..self.entering.end
    }
}

/// Iterator over the neighborhoods of every event in a trace.
///
/// Consumers must apply `entering` before `leaving`: the window bounds never
/// cross, but the left bound may pass the previous right bound on sparse
/// time windows.
pub struct NeighborhoodCursor<'a> {
    trace: &'a Trace,
    kernel: Kernel,
    index: usize,
    lo: usize,
    hi: usize,
}

impl<'a> NeighborhoodCursor<'a> {
    /// Time kernels require chronologically ordered events
    pub fn new(trace: &'a Trace, kernel: Kernel) -> TrajectoryResult<Self> {
        if let Kernel::Time { .. } = kernel {
            trace.check_time_order()?;
        }
        Ok(Self {
            trace,
            kernel,
            index: 0,
            lo: 0,
            hi: 0,
        })
    }

    fn bounds(&self, index: usize) -> (usize, usize) {
        let len = self.trace.len();
        match self.kernel {
            Kernel::Count { before, after } => {
                let lo = index.saturating_sub(before);
                let hi = index.saturating_add(after).saturating_add(1).min(len);
                (lo.max(self.lo), hi.max(self.hi))
            }
            Kernel::Time { before, after } => {
                let current = &self.trace[index];
                let mut hi = self.hi;
                while hi < len && self.trace[hi].time_difference(current) <= after {
                    hi += 1;
                }
                let mut lo = self.lo;
                while lo < hi && self.trace[lo].time_difference(current) < -before {
                    lo += 1;
                }
                (lo, hi)
            }
        }
    }
}

impl Iterator for NeighborhoodCursor<'_> {
    type Item = WindowStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.trace.len() {
            return None;
        }

        let (lo, hi) = self.bounds(self.index);
        let step = WindowStep {
            index: self.index,
            entering: self.hi..hi,
            leaving: self.lo..lo,
        };

        self.lo = lo;
        self.hi = hi;
        self.index += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.trace.len() - self.index;
        (remaining, Some(remaining))
    }
}
