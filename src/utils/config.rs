use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::algorithms::rdp::CompressionConfig;
use crate::algorithms::stay_points::{DistanceMetric, StayPointConfig};
use crate::io::reader::ReaderConfig;
use crate::processing::filter::FilterConfig;
use crate::processing::segmentation::SegmentationConfig;
use crate::processing::window::NeighborhoodMode;
use crate::validation::error::TrajectoryError;

/// Settings for every pipeline stage. Absent stages are skipped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reader: ReaderConfig,
    pub segmentation: Option<SegmentationConfig>,
    pub filter: Option<FilterConfig>,
    pub compression: Option<CompressionConfig>,
    pub stay_points: Option<StayPointConfig>,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Main configuration manager
pub struct ConfigurationManager {
    /// Current pipeline configuration
    config: PipelineConfig,
    /// Configuration file path
    config_file_path: Option<String>,
    /// Whether configuration has been modified
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replace the configuration after validating it
    pub fn update_config(&mut self, config: PipelineConfig) -> Result<(), ConfigError> {
        let validation = self.validate_config(&config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }

        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        // Validate before applying
        let validation = self.validate_config(&config);
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }
        for warning in &validation.warnings {
            log::warn!("{}: {}", path_str, warning);
        }

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Path of the last file loaded or saved
    pub fn file_path(&self) -> Option<&str> {
        self.config_file_path.as_deref()
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Validate pipeline configuration
    pub fn validate_config(&self, config: &PipelineConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if config.reader.time_column.is_empty()
            || config.reader.latitude_column.is_empty()
            || config.reader.longitude_column.is_empty()
        {
            errors.push(ConfigError::InvalidParameter {
                parameter: "reader".to_string(),
                value: format!("{:?}", config.reader),
                reason: "Column names must not be empty".to_string(),
            });
        }

        if let Some(segmentation) = &config.segmentation {
            check_non_negative(&mut errors, "segmentation.max_gap_seconds", segmentation.max_gap_seconds);
        }

        if let Some(filter) = &config.filter {
            if let Err(error) = filter.window.kernel() {
                errors.push(error.into());
            } else if filter.window.size == 0.0 {
                warnings.push("Zero window size leaves the trace unsmoothed".to_string());
            }
            if filter.window.mode == NeighborhoodMode::Time && config.segmentation.is_none() {
                warnings.push("Time windows without segmentation may average across long gaps".to_string());
            }

            if !filter.epsilon.is_finite() || filter.epsilon <= 0.0 {
                errors.push(ConfigError::InvalidParameter {
                    parameter: "filter.epsilon".to_string(),
                    value: filter.epsilon.to_string(),
                    reason: "Convergence tolerance must be positive".to_string(),
                });
            }
            if filter.max_iterations == 0 {
                errors.push(ConfigError::InvalidParameter {
                    parameter: "filter.max_iterations".to_string(),
                    value: filter.max_iterations.to_string(),
                    reason: "At least one iteration is required".to_string(),
                });
            }
        }

        if let Some(compression) = &config.compression {
            check_non_negative(&mut errors, "compression.epsilon", compression.epsilon);
            if compression.epsilon == 0.0 {
                warnings.push("Zero compression epsilon only drops collinear events".to_string());
            }
        }

        if let Some(stay_points) = &config.stay_points {
            check_non_negative(&mut errors, "stay_points.distance_threshold", stay_points.distance_threshold);
            check_non_negative(&mut errors, "stay_points.time_threshold", stay_points.time_threshold);

            match stay_points.metric {
                DistanceMetric::Euclidean if stay_points.distance_threshold > 1.0 => {
                    warnings.push("Euclidean distance threshold is in degrees; values above 1 span over 100 km".to_string());
                }
                DistanceMetric::Geodesic if stay_points.distance_threshold < 1.0 => {
                    warnings.push("Geodesic distance threshold is in meters; values below 1 m rarely match GPS noise".to_string());
                }
                _ => {}
            }

            if let Some(segmentation) = &config.segmentation {
                if segmentation.max_gap_seconds < stay_points.time_threshold {
                    warnings.push(
                        "Segmentation gap is shorter than the stay-point time threshold; stays spanning a gap are lost"
                            .to_string(),
                    );
                }
            }
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

fn check_non_negative(errors: &mut Vec<ConfigError>, parameter: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: "Must be a finite, non-negative number".to_string(),
        });
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<TrajectoryError> for ConfigError {
    fn from(error: TrajectoryError) -> Self {
        match error {
            TrajectoryError::InvalidConfiguration { parameter, value, reason } => {
                ConfigError::InvalidParameter { parameter, value, reason }
            }
            TrajectoryError::Io { message } => ConfigError::IoError { message },
            other => ConfigError::SerializationError {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for TrajectoryError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                TrajectoryError::InvalidConfiguration { parameter, value, reason }
            }
            ConfigError::IoError { message } => TrajectoryError::Io { message },
            ConfigError::SerializationError { message } => {
                TrajectoryError::invalid_configuration("config", "<file>", message)
            }
        }
    }
}
