//! Trace files in, plot data out

pub mod plot;
pub mod reader;

pub use plot::{plot_2d, plot_3d, to_json, PlotPoint, PlotSeries};
pub use reader::{parse_timestamp, ReaderConfig, TraceReader};
