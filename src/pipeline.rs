//! Configuration-driven trace processing
//!
//! Stages run in a fixed order: time segmentation, smoothing, stay point
//! detection on the smoothed segments, then compression. Any stage missing
//! from the [`PipelineConfig`] is skipped.

use serde::Serialize;

use crate::algorithms::rdp::compress;
use crate::algorithms::stay_points::detect_stay_points;
use crate::core::{StayPoint, Trace};
use crate::processing::filter::smooth;
use crate::processing::segmentation::segment_by_time;
use crate::utils::config::{ConfigurationManager, PipelineConfig};
use crate::validation::error::TrajectoryResult;

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub input_events: usize,
    pub output_events: usize,
    pub segments: Vec<Trace>,
    pub stay_points: Vec<StayPoint>,
}

pub struct TracePipeline {
    config: PipelineConfig,
}

impl TracePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, trace: &Trace) -> TrajectoryResult<PipelineReport> {
        let validation = ConfigurationManager::new().validate_config(&self.config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error.into());
        }

        let segments = match &self.config.segmentation {
            Some(segmentation) => segment_by_time(trace, segmentation.max_gap_seconds)?,
            None if trace.is_empty() => Vec::new(),
            None => vec![trace.clone()],
        };
        log::debug!("{} segments to process", segments.len());

        let mut processed = Vec::with_capacity(segments.len());
        let mut stay_points = Vec::new();

        for segment in segments {
            let smoothed = match &self.config.filter {
                Some(filter) => smooth(&segment, filter)?,
                None => segment,
            };

            if let Some(stay_config) = &self.config.stay_points {
                for mut stay in detect_stay_points(&smoothed, stay_config)? {
                    stay.label = format!("stay point {}", stay_points.len() + 1);
                    stay_points.push(stay);
                }
            }

            let output = match &self.config.compression {
                Some(compression) => compress(&smoothed, compression.epsilon)?,
                None => smoothed,
            };
            processed.push(output);
        }

        let output_events = processed.iter().map(Trace::len).sum();
        log::info!(
            "Processed {} events into {} segments ({} events kept, {} stay points)",
            trace.len(),
            processed.len(),
            output_events,
            stay_points.len()
        );

        Ok(PipelineReport {
            input_events: trace.len(),
            output_events,
            segments: processed,
            stay_points,
        })
    }
}
