//! Plot series for external front-ends
//!
//! Only coordinates are produced here. Drawing is left to whatever consumes
//! the JSON (a notebook, a web map).

use serde::{Deserialize, Serialize};

use crate::core::{seconds_between, Trace};
use crate::validation::error::{TrajectoryError, TrajectoryResult};

/// One sample of a plotted trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Seconds since the earliest sample of the plotted traces (3D only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
}

/// A plotted trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub title: String,
    pub points: Vec<PlotPoint>,
}

impl PlotSeries {
    fn titled(trace: &Trace, points: Vec<PlotPoint>) -> Self {
        Self {
            title: format!("Trace size : {}", trace.len()),
            points,
        }
    }
}

/// Longitude/latitude series, one per trace
pub fn plot_2d(traces: &[Trace]) -> Vec<PlotSeries> {
    traces
        .iter()
        .map(|trace| {
            let points = trace
                .iter()
                .map(|e| PlotPoint {
                    longitude: e.longitude(),
                    latitude: e.latitude(),
                    elapsed_seconds: None,
                })
                .collect();
            PlotSeries::titled(trace, points)
        })
        .collect()
}

/// Longitude/latitude/time series sharing a common time origin
pub fn plot_3d(traces: &[Trace]) -> Vec<PlotSeries> {
    let origin = traces.iter().filter_map(|t| t.first()).map(|e| e.timestamp).min();

    traces
        .iter()
        .map(|trace| {
            let points = trace
                .iter()
                .map(|e| PlotPoint {
                    longitude: e.longitude(),
                    latitude: e.latitude(),
                    elapsed_seconds: origin.map(|start| seconds_between(&start, &e.timestamp)),
                })
                .collect();
            PlotSeries::titled(trace, points)
        })
        .collect()
}

/// Render series as pretty-printed JSON
pub fn to_json(series: &[PlotSeries]) -> TrajectoryResult<String> {
    serde_json::to_string_pretty(series).map_err(|e| TrajectoryError::Io {
        message: format!("Failed to serialize plot series: {}", e),
    })
}
