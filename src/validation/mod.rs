//! Error taxonomy and input validation

pub mod error;

pub use error::{TrajectoryError, TrajectoryResult};
