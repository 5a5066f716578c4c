//! Configuration management

pub mod config;

pub use config::{ConfigError, ConfigurationManager, PipelineConfig, ValidationResult};
