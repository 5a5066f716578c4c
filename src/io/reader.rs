//! Delimited text trace ingestion
//!
//! Trace files are delimited text with a header row. Columns are located by
//! name, so extra columns and any column order are accepted.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{Event, Trace};
use crate::validation::error::{TrajectoryError, TrajectoryResult};

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y/%m/%d %H:%M:%S"];

/// Column layout of a trace file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub delimiter: char,
    pub time_column: String,
    pub latitude_column: String,
    pub longitude_column: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            time_column: "recorded_at".to_string(),
            latitude_column: "latitude".to_string(),
            longitude_column: "longitude".to_string(),
        }
    }
}

/// Column indices resolved from the header row
struct Columns {
    time: usize,
    latitude: usize,
    longitude: usize,
    width: usize,
}

/// Reads traces from delimited text
pub struct TraceReader {
    config: ReaderConfig,
}

impl Default for TraceReader {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

impl TraceReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read a trace file, keeping rows in file order
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> TrajectoryResult<Trace> {
        let content = fs::read_to_string(&path).map_err(|e| TrajectoryError::Io {
            message: format!("Failed to read trace file '{}': {}", path.as_ref().display(), e),
        })?;

        let trace = self.parse_str(&content)?;
        log::info!("Read {} events from {}", trace.len(), path.as_ref().display());
        Ok(trace)
    }

    /// Parse a trace from text. Blank lines are skipped.
    pub fn parse_str(&self, content: &str) -> TrajectoryResult<Trace> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_line, header) = lines.next().ok_or_else(|| TrajectoryError::Parse {
            line: 1,
            details: "missing header row".to_string(),
        })?;
        let columns = self.resolve_columns(header_line, header)?;

        let mut trace = Trace::new();
        for (line_number, line) in lines {
            trace.push(self.parse_row(line_number, line, &columns)?);
        }

        Ok(trace)
    }

    fn resolve_columns(&self, line: usize, header: &str) -> TrajectoryResult<Columns> {
        let names: Vec<&str> = header.split(self.config.delimiter).map(clean_field).collect();
        let find = |name: &str| {
            names
                .iter()
                .position(|candidate| *candidate == name)
                .ok_or_else(|| TrajectoryError::Parse {
                    line,
                    details: format!("missing column '{}'", name),
                })
        };

        Ok(Columns {
            time: find(&self.config.time_column)?,
            latitude: find(&self.config.latitude_column)?,
            longitude: find(&self.config.longitude_column)?,
            width: names.len(),
        })
    }

    fn parse_row(&self, line: usize, row: &str, columns: &Columns) -> TrajectoryResult<Event> {
        let fields: Vec<&str> = row.split(self.config.delimiter).map(clean_field).collect();
        if fields.len() < columns.width {
            return Err(TrajectoryError::Parse {
                line,
                details: format!("expected {} fields, found {}", columns.width, fields.len()),
            });
        }

        let timestamp = parse_timestamp(fields[columns.time]).ok_or_else(|| TrajectoryError::Parse {
            line,
            details: format!("unrecognized timestamp '{}'", fields[columns.time]),
        })?;
        let latitude = parse_coordinate(line, "latitude", fields[columns.latitude], 90.0)?;
        let longitude = parse_coordinate(line, "longitude", fields[columns.longitude], 180.0)?;

        Ok(Event::new(timestamp, latitude, longitude))
    }
}

fn clean_field(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

/// RFC 3339 timestamps are converted to UTC; naive ones are taken as is
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn parse_coordinate(line: usize, field: &str, value: &str, limit: f64) -> TrajectoryResult<f64> {
    let parsed: f64 = value.parse().map_err(|_| TrajectoryError::Parse {
        line,
        details: format!("invalid {} '{}'", field, value),
    })?;

    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(TrajectoryError::Parse {
            line,
            details: format!("{} {} outside [-{}, {}]", field, parsed, limit, limit),
        });
    }
    Ok(parsed)
}
