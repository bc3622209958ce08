//! Scan history export (JSON and CSV).

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::ScanRecord;

const CSV_HEADER: &str = "id,data,type,product_name,timestamp,scan_count";

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Render records as pretty-printed JSON in server wire format.
pub fn render_json_export(records: &[&ScanRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Render records as CSV with a header row.
#[must_use]
pub fn render_csv_export(records: &[&ScanRecord]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{CSV_HEADER}");

    for record in records {
        let scan_count = record
            .scan_count
            .map(|count| count.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            output,
            "{},{},{},{},{},{}",
            record.id,
            csv_field(&record.data),
            csv_field(&record.code_type),
            csv_field(record.product_name.as_deref().unwrap_or("")),
            record.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            scan_count
        );
    }

    output
}

/// Render records based on selected export format.
pub fn render_scans_export(
    records: &[&ScanRecord],
    format: ExportFormat,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(records),
        ExportFormat::Csv => Ok(render_csv_export(records)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, at: NaiveDateTime) -> String {
    format!(
        "scanwatch-export-{}.{}",
        at.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
