//! Export a series to CSV.
//!
//! One row per observation, with the provenance repeated on every row so a
//! filtered or concatenated file still says where each value came from.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::MetricSeries;
use crate::error::AppError;
use crate::report::percent_changes;

/// Write a series to a CSV file.
pub fn write_series_csv(path: &Path, series: &MetricSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "metric_id,region,date,value,change_pct,unit,provenance,source")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    let metric = series.metric_id();
    for (p, change) in series.points().iter().zip(percent_changes(series)) {
        writeln!(
            out,
            "{},{},{},{:.4},{},{},{},{}",
            metric,
            series.region(),
            p.date,
            p.value,
            change.map(|c| format!("{c:.4}")).unwrap_or_default(),
            csv_field(metric.unit_label()),
            series.provenance(),
            csv_field(series.source_name()),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV '{}': {e}", path.display())))?;
    Ok(())
}

/// Quote a field if it contains a delimiter, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
