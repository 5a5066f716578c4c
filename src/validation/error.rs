//! Error types for trace processing

use chrono::NaiveDateTime;
use std::fmt;

/// Errors raised by trace processing operations.
///
/// None of these are retryable: the caller has to fix the configuration or
/// the input and submit again. Degenerate numeric input (coincident points,
/// zero-length segments) is handled by the algorithms and never surfaces here.
#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// Unknown option name or out-of-range parameter
    InvalidConfiguration {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Event at `index` is earlier than its predecessor
    NonMonotonicTimestamps {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
    /// Malformed row in a trace source (1-based line number)
    Parse { line: usize, details: String },
    /// Reading or writing a file failed
    Io { message: String },
}

impl TrajectoryError {
    pub fn invalid_configuration(
        parameter: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        TrajectoryError::InvalidConfiguration {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, TrajectoryError::InvalidConfiguration { .. })
    }
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrajectoryError::InvalidConfiguration { parameter, value, reason } => {
                write!(f, "Invalid configuration '{}' = '{}': {}", parameter, value, reason)
            }
            TrajectoryError::NonMonotonicTimestamps { index, previous, current } => {
                write!(
                    f,
                    "Timestamps not in chronological order at event {}: {} follows {}",
                    index, current, previous
                )
            }
            TrajectoryError::Parse { line, details } => {
                write!(f, "Parse error on line {}: {}", line, details)
            }
            TrajectoryError::Io { message } => {
                write!(f, "I/O error: {}", message)
            }
        }
    }
}

impl std::error::Error for TrajectoryError {}

/// Result type for trace processing operations
pub type TrajectoryResult<T> = Result<T, TrajectoryError>;

/// Reject negative or non-finite thresholds
pub(crate) fn require_non_negative(parameter: &str, value: f64) -> TrajectoryResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrajectoryError::invalid_configuration(
            parameter,
            value,
            "must be a finite, non-negative number",
        ));
    }
    Ok(())
}
