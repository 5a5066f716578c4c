//! Smoothing filter selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::mean_filter::mean_filter;
use super::median_filter::{median_filter, MedianAlgorithm};
use super::window::WindowConfig;
use crate::algorithms::geometric_median::WeiszfeldOptions;
use crate::core::Trace;
use crate::validation::error::{TrajectoryError, TrajectoryResult};

/// Centrality estimator applied to each neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimator {
    Mean,
    Median,
}

impl FromStr for Estimator {
    type Err = TrajectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Estimator::Mean),
            "median" => Ok(Estimator::Median),
            _ => Err(TrajectoryError::invalid_configuration(
                "estimator",
                s,
                "expected 'mean' or 'median'",
            )),
        }
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimator::Mean => write!(f, "mean"),
            Estimator::Median => write!(f, "median"),
        }
    }
}

/// Full smoothing filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub estimator: Estimator,
    /// Only used by the median estimator
    pub algorithm: MedianAlgorithm,
    pub window: WindowConfig,
    /// Convergence tolerance for the iterative median
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let options = WeiszfeldOptions::default();
        Self {
            estimator: Estimator::Mean,
            algorithm: MedianAlgorithm::Iterative,
            window: WindowConfig::default(),
            epsilon: options.epsilon,
            max_iterations: options.max_iterations,
        }
    }
}

impl FilterConfig {
    pub fn mean(window: WindowConfig) -> Self {
        Self {
            estimator: Estimator::Mean,
            window,
            ..Self::default()
        }
    }

    pub fn median(window: WindowConfig, algorithm: MedianAlgorithm) -> Self {
        Self {
            estimator: Estimator::Median,
            algorithm,
            window,
            ..Self::default()
        }
    }

    pub fn weiszfeld_options(&self) -> WeiszfeldOptions {
        WeiszfeldOptions {
            epsilon: self.epsilon,
            max_iterations: self.max_iterations,
        }
    }
}

/// Apply the configured smoothing filter, returning a new trace
pub fn smooth(trace: &Trace, config: &FilterConfig) -> TrajectoryResult<Trace> {
    match config.estimator {
        Estimator::Mean => mean_filter(trace, &config.window),
        Estimator::Median => median_filter(trace, &config.window, config.algorithm, &config.weiszfeld_options()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;
    use crate::processing::window::{NeighborhoodMode, WindowShape};
    use chrono::{NaiveDate, NaiveDateTime};

    fn time(sec: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(sec)
    }

    fn trace() -> Trace {
        (0..6).map(|i| Event::new(time(i), i as f64, 0.0)).collect()
    }

    #[test]
    fn test_dispatches_to_mean() {
        let config = FilterConfig::mean(WindowConfig::new(1.0, WindowShape::Causal, NeighborhoodMode::Count));
        let filtered = smooth(&trace(), &config).unwrap();

        assert_eq!(filtered[1].latitude(), 0.5);
    }

    #[test]
    fn test_dispatches_to_median() {
        let config = FilterConfig::median(
            WindowConfig::new(2.0, WindowShape::Centered, NeighborhoodMode::Count),
            MedianAlgorithm::Exact,
        );
        let filtered = smooth(&trace(), &config).unwrap();

        assert_eq!(filtered[2].latitude(), 2.0);
    }

    #[test]
    fn test_config_from_json_with_defaults() {
        let json = r#"{ "estimator": "median", "window": { "size": 30, "shape": "centered", "mode": "time" } }"#;
        let config: FilterConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.estimator, Estimator::Median);
        assert_eq!(config.algorithm, MedianAlgorithm::Iterative);
        assert_eq!(config.window.mode, NeighborhoodMode::Time);
        assert_eq!(config.epsilon, 1e-5);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!("mode".parse::<Estimator>().unwrap_err().is_configuration_error());

        let json = r#"{ "estimator": "mean", "window": { "size": 4, "shape": "triangular", "mode": "count" } }"#;
        assert!(serde_json::from_str::<FilterConfig>(json).is_err());
    }
}
