//! Trace Mining
//!
//! Cleaning and mining of GPS traces: smoothing filters (sliding mean and
//! geometric median), time segmentation, Ramer-Douglas-Peucker compression
//! and stay point detection.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod io;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{Event, Located, Position, StayPoint, Trace, EARTH_RADIUS_M};
pub use crate::algorithms::{
    compress, detect_stay_points, weiszfeld, CompressionConfig, DistanceMetric, StayPointConfig, WeiszfeldOptions,
};
pub use crate::processing::{
    mean_filter, median_filter, segment_by_time, smooth, Estimator, FilterConfig, MedianAlgorithm, NeighborhoodMode,
    SegmentationConfig, WindowConfig, WindowShape,
};
pub use crate::validation::{TrajectoryError, TrajectoryResult};
pub use crate::utils::{ConfigError, ConfigurationManager, PipelineConfig};
pub use crate::io::{plot_2d, plot_3d, PlotSeries, ReaderConfig, TraceReader};
pub use crate::pipeline::{PipelineReport, TracePipeline};
