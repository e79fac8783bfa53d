//! JSON export.
//!
//! The series file wraps [`MetricSeries`] with the metadata a downstream
//! consumer needs to interpret it without this crate: unit, frequency, and
//! the tool that wrote it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::domain::{AwardList, Frequency, MetricSeries};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct SeriesFile<'a> {
    tool: &'static str,
    unit: &'static str,
    frequency: Frequency,
    #[serde(flatten)]
    series: &'a MetricSeries,
}

/// Write a series JSON file.
pub fn write_series_json(path: &Path, series: &MetricSeries) -> Result<(), AppError> {
    let metric = series.metric_id();
    let doc = SeriesFile {
        tool: "laborstat",
        unit: metric.unit_label(),
        frequency: metric.frequency(),
        series,
    };
    write_pretty(path, &doc)
}

/// Write an award list JSON file.
pub fn write_awards_json(path: &Path, awards: &AwardList) -> Result<(), AppError> {
    write_pretty(path, awards)
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON '{}': {e}", path.display())))?;
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush JSON '{}': {e}", path.display())))?;
    Ok(())
}
