//! Trace cleaning: smoothing filters and time segmentation

pub mod window;
pub mod mean_filter;
pub mod median_filter;
pub mod filter;
pub mod segmentation;

pub use window::{Kernel, NeighborhoodCursor, NeighborhoodMode, WindowConfig, WindowShape, WindowStep};
pub use mean_filter::mean_filter;
pub use median_filter::{median_filter, MedianAlgorithm};
pub use filter::{smooth, Estimator, FilterConfig};
pub use segmentation::{segment_by_time, SegmentationConfig};
